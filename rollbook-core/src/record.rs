//! Schemaless voter records and table references
//!
//! Each ingested roll PDF becomes one dynamically-named record collection.
//! Rows carry whatever fields the extraction pipeline produced, so `Record`
//! is a thin newtype over a JSON object with typed accessors for the fields
//! the serving core relies on.

use crate::error::ValidationError;
use crate::status::WorkflowStatus;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// The four system collections that are never treated as document tables.
pub const RESERVED_TABLES: [&str; 4] =
    ["users", "employeedetail", "first_page_data", "task_detail"];

/// Identity and ingestion-provenance fields that a record patch may never
/// touch, regardless of what the caller submits.
pub const IMMUTABLE_FIELDS: [&str; 8] = [
    "serial_no",
    "pdf_name",
    "data_no",
    "page_no",
    "image_path",
    "text_data",
    "created_by",
    "created_on",
];

// ============================================================================
// TABLE REFERENCE
// ============================================================================

/// Validated name of one per-document record collection.
///
/// Reserved system table names are rejected at construction, so the rest of
/// the codebase never needs inline reserved-name checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(transparent)]
pub struct TableRef(String);

impl TableRef {
    /// Parse a caller-supplied collection name into a table reference.
    pub fn parse(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::RequiredFieldMissing {
                field: "pdf_name".to_string(),
            });
        }
        if RESERVED_TABLES.contains(&name.as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "pdf_name".to_string(),
                reason: format!("'{}' is a reserved system table", name),
            });
        }
        Ok(TableRef(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// RECORD
// ============================================================================

/// One structured row extracted from a source document.
///
/// Required identifying fields when well-formed: `serial_no` (unique within
/// its table), `voter_id` (semi-unique, 10 characters), `status`. Everything
/// else is free-form extraction output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(
    feature = "openapi",
    derive(utoipa::ToSchema),
    schema(value_type = Object)
)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Record(map)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.0.insert(field.into(), value);
    }

    fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// Row-local identifier, unique within a table.
    pub fn serial_no(&self) -> Option<&str> {
        self.get_str("serial_no")
    }

    /// Semi-unique cross-row identifier.
    pub fn voter_id(&self) -> Option<&str> {
        self.get_str("voter_id")
    }

    /// Workflow state, if present and well-formed.
    pub fn status(&self) -> Option<WorkflowStatus> {
        self.get_str("status").and_then(|s| s.parse().ok())
    }

    /// Whether this record appears in listing/export views.
    /// Records with a missing or malformed status are treated as visible:
    /// only an explicit `new` is hidden.
    pub fn is_visible(&self) -> bool {
        self.status().map(|s| s.is_visible()).unwrap_or(true)
    }
}

// ============================================================================
// RECORD PATCH
// ============================================================================

/// Caller-submitted partial record for an update.
///
/// The identity and ingestion-provenance fields in [`IMMUTABLE_FIELDS`] are
/// stripped server-side before the patch is applied; callers may submit them
/// but they never reach storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(
    feature = "openapi",
    derive(utoipa::ToSchema),
    schema(value_type = Object)
)]
#[serde(transparent)]
pub struct RecordPatch(Map<String, Value>);

impl RecordPatch {
    pub fn from_map(map: Map<String, Value>) -> Self {
        RecordPatch(map)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// The serial number identifying the row to patch. Required on every
    /// update path even though it is itself immutable.
    pub fn serial_no(&self) -> Option<&str> {
        self.0.get("serial_no").and_then(Value::as_str)
    }

    /// The candidate voter ID, if this patch touches it.
    pub fn voter_id(&self) -> Option<&str> {
        self.0.get("voter_id").and_then(Value::as_str)
    }

    /// The fields that may actually be written: everything the caller sent
    /// minus the immutable set.
    pub fn mutable_fields(&self) -> Map<String, Value> {
        self.0
            .iter()
            .filter(|(key, _)| !IMMUTABLE_FIELDS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Apply the mutable subset of this patch to a record in place.
    /// Returns the number of fields written.
    pub fn apply_to(&self, record: &mut Record) -> usize {
        let fields = self.mutable_fields();
        let written = fields.len();
        for (key, value) in fields {
            record.set(key, value);
        }
        written
    }
}

// ============================================================================
// TESTS
// ============================================================================


// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================
