//! Document Filtering REST API Routes
//!
//! Axum route handlers for the voter-roll document tables: listing, status
//! filtering, single-record lookup, patching (with and without the duplicate
//! guard), the district rollup, and the CSV export.

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};
use std::sync::Arc;

use crate::{
    error::ApiResult,
    services::{dedup_service, dedup_service::UpdateOutcome, export_service, filter_service,
        rollup_service},
    types::{
        DistrictQuery, DistrictResponse, DocumentQuery, ExportQuery, ListTablesResponse,
        MessageResponse, RecordSetResponse, StatusFilterQuery, TableQuery,
    },
};
use rollbook_core::{RecordPatch, WorkflowStatus};
use rollbook_storage::RecordStore;

// ============================================================================
// SHARED STATE
// ============================================================================

/// Shared application state for filter routes.
#[derive(Clone)]
pub struct FilterState {
    pub store: Arc<dyn RecordStore>,
}

impl FilterState {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

fn parse_status_opt(raw: Option<&str>) -> ApiResult<Option<WorkflowStatus>> {
    raw.map(filter_service::parse_status).transpose()
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /api/filter_details/list_pdf - List registered document tables
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/filter_details/list_pdf",
    tag = "FilterDetails",
    responses(
        (status = 200, description = "Registered tables", body = ListTablesResponse),
    ),
))]
pub async fn list_pdf(State(state): State<Arc<FilterState>>) -> ApiResult<impl IntoResponse> {
    let collections = filter_service::list_tables(state.store.as_ref())?;
    Ok(Json(ListTablesResponse { collections }))
}

/// GET /api/filter_details/all_pdf_data - All visible records in a table
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/filter_details/all_pdf_data",
    tag = "FilterDetails",
    params(TableQuery),
    responses(
        (status = 200, description = "Visible records", body = RecordSetResponse),
        (status = 400, description = "Invalid table name", body = crate::error::ApiError),
    ),
))]
pub async fn all_pdf_data(
    State(state): State<Arc<FilterState>>,
    Query(params): Query<TableQuery>,
) -> ApiResult<impl IntoResponse> {
    let table = filter_service::parse_table(&params.pdf_name)?;
    let data = filter_service::visible_records(state.store.as_ref(), &table)?;
    Ok(Json(RecordSetResponse {
        count: data.len(),
        data,
    }))
}

/// GET /api/filter_details/status_filter - Records matching status/voter_id
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/filter_details/status_filter",
    tag = "FilterDetails",
    params(StatusFilterQuery),
    responses(
        (status = 200, description = "Matching records", body = RecordSetResponse),
        (status = 400, description = "Invalid table name or status", body = crate::error::ApiError),
    ),
))]
pub async fn status_filter(
    State(state): State<Arc<FilterState>>,
    Query(params): Query<StatusFilterQuery>,
) -> ApiResult<impl IntoResponse> {
    let table = filter_service::parse_table(&params.pdf_name)?;
    let status = parse_status_opt(params.status.as_deref())?;
    let data = filter_service::filtered_records(
        state.store.as_ref(),
        &table,
        status,
        params.voter_id.as_deref(),
    )?;
    Ok(Json(RecordSetResponse {
        count: data.len(),
        data,
    }))
}

/// GET /api/filter_details/count - Corpus-wide document progress counts
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/filter_details/count",
    tag = "FilterDetails",
    responses(
        (status = 200, description = "Document counts", body = crate::types::DocumentCountsResponse),
    ),
))]
pub async fn count(State(state): State<Arc<FilterState>>) -> ApiResult<impl IntoResponse> {
    let counts = filter_service::document_counts(state.store.as_ref())?;
    Ok(Json(counts))
}

/// GET /api/filter_details/get_document - Single record by serial number
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/filter_details/get_document",
    tag = "FilterDetails",
    params(DocumentQuery),
    responses(
        (status = 200, description = "The record", body = rollbook_core::Record),
        (status = 404, description = "Record not found", body = crate::error::ApiError),
    ),
))]
pub async fn get_document(
    State(state): State<Arc<FilterState>>,
    Query(params): Query<DocumentQuery>,
) -> ApiResult<impl IntoResponse> {
    let table = filter_service::parse_table(&params.pdf_name)?;
    let record = filter_service::get_document(state.store.as_ref(), &table, &params.serial_no)?;
    Ok(Json(record))
}

/// PATCH /api/filter_details/update_document - Patch a record
#[cfg_attr(feature = "openapi", utoipa::path(
    patch,
    path = "/api/filter_details/update_document",
    tag = "FilterDetails",
    params(TableQuery),
    request_body = RecordPatch,
    responses(
        (status = 200, description = "Record updated", body = MessageResponse),
        (status = 400, description = "Missing serial_no", body = crate::error::ApiError),
        (status = 404, description = "Record not found", body = crate::error::ApiError),
    ),
))]
pub async fn update_document(
    State(state): State<Arc<FilterState>>,
    Query(params): Query<TableQuery>,
    Json(patch): Json<RecordPatch>,
) -> ApiResult<impl IntoResponse> {
    let table = filter_service::parse_table(&params.pdf_name)?;
    filter_service::update_document(state.store.as_ref(), &table, &patch)?;
    Ok(Json(MessageResponse::success(
        "Document updated successfully",
    )))
}

/// PATCH /api/filter_details/update_document_db - Patch with duplicate guard
///
/// A rejected duplicate travels as HTTP 200 with `status: "duplicate"` so
/// the front end treats it as a review outcome rather than a failure.
#[cfg_attr(feature = "openapi", utoipa::path(
    patch,
    path = "/api/filter_details/update_document_db",
    tag = "FilterDetails",
    params(TableQuery),
    request_body = RecordPatch,
    responses(
        (status = 200, description = "Record updated, or duplicate marker", body = MessageResponse),
        (status = 400, description = "Invalid voter_id or missing serial_no", body = crate::error::ApiError),
        (status = 404, description = "Record not found", body = crate::error::ApiError),
    ),
))]
pub async fn update_document_db(
    State(state): State<Arc<FilterState>>,
    Query(params): Query<TableQuery>,
    Json(patch): Json<RecordPatch>,
) -> ApiResult<impl IntoResponse> {
    let table = filter_service::parse_table(&params.pdf_name)?;
    let response = match dedup_service::guarded_update(state.store.as_ref(), &table, &patch)? {
        UpdateOutcome::Updated => MessageResponse::success("Document updated successfully"),
        UpdateOutcome::Duplicate => MessageResponse::duplicate(),
    };
    Ok(Json(response))
}

/// GET /api/filter_details/export - CSV export of a table
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/filter_details/export",
    tag = "FilterDetails",
    params(ExportQuery),
    responses(
        (status = 200, description = "CSV download", body = String, content_type = "text/csv"),
        (status = 404, description = "No metadata or no matching records", body = crate::error::ApiError),
    ),
))]
pub async fn export(
    State(state): State<Arc<FilterState>>,
    Query(params): Query<ExportQuery>,
) -> ApiResult<impl IntoResponse> {
    let table = filter_service::parse_table(&params.pdf_name)?;
    let status = parse_status_opt(params.status.as_deref())?;
    let artifact = export_service::export_table(state.store.as_ref(), &table, status)?;

    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", artifact.file_name),
        ),
    ];
    Ok((headers, artifact.content))
}

/// GET /api/filter_details/district - Per-table counts for a district
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/filter_details/district",
    tag = "FilterDetails",
    params(DistrictQuery),
    responses(
        (status = 200, description = "Rollup counts", body = DistrictResponse),
        (status = 404, description = "Unknown district", body = crate::error::ApiError),
    ),
))]
pub async fn district(
    State(state): State<Arc<FilterState>>,
    Query(params): Query<DistrictQuery>,
) -> ApiResult<impl IntoResponse> {
    let counts = rollup_service::district_rollup(
        state.store.as_ref(),
        &params.district,
        params.assembly.as_deref(),
    )?;
    let pdf_names = counts.iter().map(|c| c.pdf_name.clone()).collect();
    Ok(Json(DistrictResponse { counts, pdf_names }))
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the filter_details router.
pub fn create_router(store: Arc<dyn RecordStore>) -> Router {
    let state = Arc::new(FilterState::new(store));

    Router::new()
        .route("/list_pdf", get(list_pdf))
        .route("/all_pdf_data", get(all_pdf_data))
        .route("/status_filter", get(status_filter))
        .route("/count", get(count))
        .route("/get_document", get(get_document))
        .route("/update_document", patch(update_document))
        .route("/update_document_db", patch(update_document_db))
        .route("/export", get(export))
        .route("/district", get(district))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_opt() {
        assert_eq!(parse_status_opt(None).unwrap(), None);
        assert_eq!(
            parse_status_opt(Some("completed")).unwrap(),
            Some(WorkflowStatus::Completed)
        );
        assert!(parse_status_opt(Some("bogus")).is_err());
    }
}
