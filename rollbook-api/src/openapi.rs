//! OpenAPI Specification for the Rollbook API
//!
//! Generates the OpenAPI document from the route annotations and the wire
//! types via utoipa.

use utoipa::OpenApi;

use crate::error::{ApiError, ErrorCode, FailureMarker};
use crate::routes::{filter, health, task};
use crate::types::{
    DistrictResponse, DocumentCountsResponse, EmployeeTablesResponse, ListTablesResponse,
    MessageResponse, RecordSetResponse, TableCount, TaskCounts, TaskDetailsResponse,
};

use rollbook_core::{Record, RecordPatch, RollMeta, Task, WorkflowStatus};

/// OpenAPI document for the Rollbook API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Rollbook API",
        version = "0.1.0",
        description = "Filtering, review, and export backend for digitized voter-roll documents",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
    ),
    servers(
        (url = "http://localhost:8000", description = "Local Development")
    ),
    tags(
        (name = "FilterDetails", description = "Document table listing, filtering, patching, and export"),
        (name = "Tasks", description = "Employee task assignments and tallies"),
        (name = "Health", description = "Service health checks")
    ),
    paths(
        // === Filter Routes ===
        filter::list_pdf,
        filter::all_pdf_data,
        filter::status_filter,
        filter::count,
        filter::get_document,
        filter::update_document,
        filter::update_document_db,
        filter::export,
        filter::district,

        // === Task Routes ===
        task::get_emp_pdf,
        task::emp_count,
        task::task_details,

        // === Health Routes ===
        health::ping,
        health::liveness,
        health::readiness,
    ),
    components(
        schemas(
            // Error types
            ApiError,
            ErrorCode,
            FailureMarker,

            // Wire types
            ListTablesResponse,
            RecordSetResponse,
            DocumentCountsResponse,
            MessageResponse,
            DistrictResponse,
            TableCount,
            EmployeeTablesResponse,
            TaskCounts,
            TaskDetailsResponse,

            // Domain types
            Record,
            RecordPatch,
            RollMeta,
            Task,
            WorkflowStatus,

            // Health types
            health::HealthResponse,
            health::HealthStatus,
            health::HealthDetails,
            health::ComponentHealth,
        )
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_generates() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("/api/filter_details/list_pdf"));
        assert!(json.contains("/api/filter_details/update_document_db"));
        assert!(json.contains("/api/task/emp_count"));
        assert!(json.contains("/health/ready"));
    }
}
