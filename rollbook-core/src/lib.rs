//! Rollbook Core - Data types for the voter-roll document backend
//!
//! Defines the shared vocabulary of the system: workflow statuses, the
//! schemaless record type extracted from ingested roll PDFs, per-document
//! metadata, filter predicates, and the error taxonomy. Storage and API
//! crates build on these types.

pub mod error;
pub mod filter;
pub mod meta;
pub mod record;
pub mod status;

pub use error::{
    ConfigError, RollbookError, RollbookResult, StorageError, ValidationError,
};
pub use filter::{FieldFilter, Predicate};
pub use meta::{RollMeta, Task};
pub use record::{Record, RecordPatch, TableRef, IMMUTABLE_FIELDS, RESERVED_TABLES};
pub use status::WorkflowStatus;

/// Well-formed voter IDs are fixed-width codes of exactly this length.
pub const VOTER_ID_LEN: usize = 10;
