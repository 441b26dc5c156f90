//! Task REST API Routes
//!
//! Read-side task endpoints: which tables an employee has been assigned,
//! their task status tallies, and the full task list with aggregate counts.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use crate::{
    error::ApiResult,
    services::rollup_service,
    types::{EmployeeQuery, EmployeeTablesResponse},
};
use rollbook_storage::RecordStore;

// ============================================================================
// SHARED STATE
// ============================================================================

/// Shared application state for task routes.
#[derive(Clone)]
pub struct TaskState {
    pub store: Arc<dyn RecordStore>,
}

impl TaskState {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// GET /api/task/get_emp_pdf - Tables assigned to an employee
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/task/get_emp_pdf",
    tag = "Tasks",
    params(EmployeeQuery),
    responses(
        (status = 200, description = "Assigned tables", body = EmployeeTablesResponse),
        (status = 404, description = "No tasks for this employee", body = crate::error::ApiError),
    ),
))]
pub async fn get_emp_pdf(
    State(state): State<Arc<TaskState>>,
    Query(params): Query<EmployeeQuery>,
) -> ApiResult<impl IntoResponse> {
    let pdf_names = rollup_service::employee_tables(state.store.as_ref(), params.emp_id)?;
    Ok(Json(EmployeeTablesResponse {
        emp_id: params.emp_id,
        pdf_names,
    }))
}

/// GET /api/task/emp_count - Task status tallies for an employee
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/task/emp_count",
    tag = "Tasks",
    params(EmployeeQuery),
    responses(
        (status = 200, description = "Status tallies", body = crate::types::TaskCounts),
    ),
))]
pub async fn emp_count(
    State(state): State<Arc<TaskState>>,
    Query(params): Query<EmployeeQuery>,
) -> ApiResult<impl IntoResponse> {
    let counts = rollup_service::employee_task_counts(state.store.as_ref(), params.emp_id)?;
    Ok(Json(counts))
}

/// GET /api/task/task_details - All tasks plus aggregate status counts
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/task/task_details",
    tag = "Tasks",
    responses(
        (status = 200, description = "Tasks and tallies", body = crate::types::TaskDetailsResponse),
    ),
))]
pub async fn task_details(State(state): State<Arc<TaskState>>) -> ApiResult<impl IntoResponse> {
    let details = rollup_service::task_details(state.store.as_ref())?;
    Ok(Json(details))
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the task router.
pub fn create_router(store: Arc<dyn RecordStore>) -> Router {
    let state = Arc::new(TaskState::new(store));

    Router::new()
        .route("/get_emp_pdf", get(get_emp_pdf))
        .route("/emp_count", get(emp_count))
        .route("/task_details", get(task_details))
        .with_state(state)
}
