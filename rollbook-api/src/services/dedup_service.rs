//! Duplicate-aware update path.
//!
//! Wraps the plain document patch with a voter-id duplicate check. The check
//! is a read followed by a write with no lock held across them, so two
//! concurrent writers can both pass; the guard is best-effort, and the next
//! patch against the same table will see the duplication.

use crate::error::{ApiError, ApiResult};
use rollbook_core::{Predicate, RecordPatch, TableRef, VOTER_ID_LEN};
use rollbook_storage::RecordStore;

use super::filter_service;

/// Outcome of a guarded update. `Duplicate` is a success-shaped result, not
/// an error: the front end shows it as a review outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    Duplicate,
}

/// Patch a record, refusing to write a voter ID the table already holds on
/// two or more rows.
///
/// A count of zero or one passes: the row being patched may itself be the one
/// carrying the candidate ID, and the count does not exclude it. That means a
/// first collision is admitted and only flagged on the next write.
pub fn guarded_update(
    store: &dyn RecordStore,
    table: &TableRef,
    patch: &RecordPatch,
) -> ApiResult<UpdateOutcome> {
    if let Some(voter_id) = patch.voter_id() {
        if voter_id.chars().count() != VOTER_ID_LEN {
            return Err(ApiError::invalid_format(
                "voter_id",
                "exactly 10 characters",
            ));
        }

        let holders = store.count(
            table,
            &Predicate::all().with("voter_id", serde_json::json!(voter_id)),
        )?;
        if holders >= 2 {
            tracing::info!(table = %table, voter_id, holders, "Duplicate voter ID rejected");
            return Ok(UpdateOutcome::Duplicate);
        }
    }

    filter_service::update_document(store, table, patch)?;
    Ok(UpdateOutcome::Updated)
}


// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================
