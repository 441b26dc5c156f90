//! Document filtering and patching over the record store.

use crate::error::{ApiError, ApiResult};
use crate::types::DocumentCountsResponse;
use rollbook_core::{Predicate, Record, RecordPatch, TableRef, WorkflowStatus};
use rollbook_storage::RecordStore;
use serde_json::json;

/// Parse a raw table name from the query string.
pub fn parse_table(name: &str) -> ApiResult<TableRef> {
    TableRef::parse(name).map_err(ApiError::from)
}

/// Parse a raw status value from the query string.
pub fn parse_status(raw: &str) -> ApiResult<WorkflowStatus> {
    raw.parse().map_err(|_| {
        ApiError::invalid_format(
            "status",
            "one of: new, progress, completed, partially completed",
        )
    })
}

/// All registered document tables, sorted by name.
pub fn list_tables(store: &dyn RecordStore) -> ApiResult<Vec<String>> {
    let tables = store.list_tables()?;
    Ok(tables.into_iter().map(|t| t.as_str().to_string()).collect())
}

/// Every record in the table that has moved past ingestion.
pub fn visible_records(store: &dyn RecordStore, table: &TableRef) -> ApiResult<Vec<Record>> {
    let mut records = store.fetch(table, &Predicate::all())?;
    records.retain(Record::is_visible);
    Ok(records)
}

/// Records matching the optional status and voter-id clauses.
///
/// Unlike the listing view this does not hide `new` records: the caller asked
/// for an explicit slice and gets exactly what matches.
pub fn filtered_records(
    store: &dyn RecordStore,
    table: &TableRef,
    status: Option<WorkflowStatus>,
    voter_id: Option<&str>,
) -> ApiResult<Vec<Record>> {
    let predicate = Predicate::all()
        .with_opt("status", status.map(|s| s.as_str()))
        .with_opt("voter_id", voter_id);
    Ok(store.fetch(table, &predicate)?)
}

/// Single record lookup by serial number.
pub fn get_document(
    store: &dyn RecordStore,
    table: &TableRef,
    serial_no: &str,
) -> ApiResult<Record> {
    store
        .find_by_serial(table, serial_no)?
        .ok_or_else(|| ApiError::document_not_found(table.as_str(), serial_no))
}

/// Apply a patch to the record identified by the patch's own serial number.
///
/// A zero modified-count is reported as not-found. That folds the no-op patch
/// case into the missing-row case, matching the modified-count semantics of
/// the underlying store.
pub fn update_document(
    store: &dyn RecordStore,
    table: &TableRef,
    patch: &RecordPatch,
) -> ApiResult<()> {
    let serial_no = patch
        .serial_no()
        .ok_or_else(|| ApiError::missing_field("serial_no"))?;

    let modified = store.update_by_serial(table, serial_no, patch)?;
    if modified == 0 {
        return Err(ApiError::document_not_found(table.as_str(), serial_no));
    }

    tracing::debug!(table = %table, serial_no, modified, "Document updated");
    Ok(())
}

/// Number of records in a table holding the given status.
pub fn count_by_status(
    store: &dyn RecordStore,
    table: &TableRef,
    status: WorkflowStatus,
) -> ApiResult<usize> {
    let predicate = Predicate::all().with("status", json!(status.as_str()));
    Ok(store.count(table, &predicate)?)
}

/// Corpus-wide progress counts across every registered table.
pub fn document_counts(store: &dyn RecordStore) -> ApiResult<DocumentCountsResponse> {
    let tables = store.list_tables()?;

    let mut completed_documents = 0;
    let mut partially_completed_documents = 0;
    for table in &tables {
        completed_documents += count_by_status(store, table, WorkflowStatus::Completed)?;
        partially_completed_documents +=
            count_by_status(store, table, WorkflowStatus::PartiallyCompleted)?;
    }

    Ok(DocumentCountsResponse {
        processed_pdf: tables.len(),
        completed_documents,
        partially_completed_documents,
    })
}
