//! Request and Response Types for the Rollbook API
//!
//! Wire-level DTOs shared by the route modules. Query structs deserialize
//! straight from URL parameters; response structs serialize the shapes the
//! front end consumes.

use rollbook_core::{Record, Task};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// COMMON RESPONSES
// ============================================================================

/// Generic success acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MessageResponse {
    /// Outcome marker, "success" on the happy path
    pub status: String,
    /// Human-readable detail
    pub detail: String,
}

impl MessageResponse {
    pub fn success(detail: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            detail: detail.into(),
        }
    }

    /// Duplicate marker for the guarded update path. Travels with HTTP 200
    /// so the front end treats it as an outcome, not a transport failure.
    pub fn duplicate() -> Self {
        Self {
            status: "duplicate".to_string(),
            detail: "Document is duplicate".to_string(),
        }
    }
}

// ============================================================================
// TABLE LISTING
// ============================================================================

/// Response for listing document tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ListTablesResponse {
    /// Registered table names, sorted, reserved names excluded
    pub collections: Vec<String>,
}

// ============================================================================
// RECORD QUERIES
// ============================================================================

/// Query selecting a single table.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct TableQuery {
    /// Name of the document table
    pub pdf_name: String,
}

/// Query for filtered record retrieval.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct StatusFilterQuery {
    /// Name of the document table
    pub pdf_name: String,
    /// Workflow status to match (optional)
    pub status: Option<String>,
    /// Exact voter identifier to match (optional)
    pub voter_id: Option<String>,
}

/// Query addressing a single record inside a table.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct DocumentQuery {
    /// Name of the document table
    pub pdf_name: String,
    /// Serial number of the record
    pub serial_no: String,
}

/// Matching records together with their count.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RecordSetResponse {
    /// Number of matching records
    pub count: usize,
    /// The matching records themselves
    pub data: Vec<Record>,
}

// ============================================================================
// AGGREGATE COUNTS
// ============================================================================

/// Corpus-wide document progress counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DocumentCountsResponse {
    /// Number of registered document tables
    pub processed_pdf: usize,
    /// Records marked completed across all tables
    pub completed_documents: usize,
    /// Records marked partially completed across all tables
    pub partially_completed_documents: usize,
}

// ============================================================================
// LOCATION ROLLUP
// ============================================================================

/// Query for the district rollup.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct DistrictQuery {
    /// District name to match
    pub district: String,
    /// Assembly constituency to narrow by (optional)
    pub assembly: Option<String>,
}

/// Per-table record count in a rollup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TableCount {
    /// Table name
    pub pdf_name: String,
    /// Number of records currently in the table
    pub data_count: usize,
}

/// Response for the district rollup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DistrictResponse {
    /// Per-table counts for the matched location
    pub counts: Vec<TableCount>,
    /// Table names in the same order as `counts`
    pub pdf_names: Vec<String>,
}

// ============================================================================
// EXPORT
// ============================================================================

/// Query for the tabular export.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct ExportQuery {
    /// Name of the document table
    pub pdf_name: String,
    /// Workflow status to narrow the export by (optional)
    pub status: Option<String>,
}

// ============================================================================
// TASKS
// ============================================================================

/// Query selecting an employee.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct EmployeeQuery {
    /// Employee identifier
    pub emp_id: Uuid,
}

/// Tables assigned to an employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct EmployeeTablesResponse {
    /// Employee identifier echoed back
    pub emp_id: Uuid,
    /// Distinct table names across the employee's tasks, sorted
    pub pdf_names: Vec<String>,
}

/// Task status tallies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TaskCounts {
    /// Total number of tasks considered
    pub total_tasks: usize,
    /// Tasks still in progress
    pub progress_count: usize,
    /// Tasks marked completed
    pub completed_count: usize,
}

/// All tasks plus their aggregate status counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TaskDetailsResponse {
    /// Aggregate tallies over `data`
    pub status_counts: TaskCounts,
    /// Every task on record
    pub data: Vec<Task>,
}
