//! Tabular export composition.
//!
//! Joins a table's records with its roll metadata and renders a CSV
//! artifact. Column order is deterministic: the metadata columns first, then
//! `serial_no`, then the remaining record fields sorted by name. Internal
//! artifact paths and workflow bookkeeping fields never leave the service.

use crate::error::{ApiError, ApiResult};
use rollbook_core::{Predicate, Record, TableRef, WorkflowStatus};
use rollbook_storage::RecordStore;
use serde_json::Value;
use std::collections::BTreeSet;

/// Record fields stripped from every export row.
pub const EXPORT_EXCLUDED_FIELDS: [&str; 10] = [
    "cropped_image_path",
    "status",
    "image_path",
    "created_on",
    "data_no",
    "text_data",
    "text_path",
    "first_page_path",
    "modified_on",
    "modified_by",
];

/// Metadata columns prepended to every row.
const META_COLUMNS: [&str; 3] = ["pdf_name", "district", "assembly_constituency"];

/// A finished export ready to stream to the caller.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    /// Suggested download file name.
    pub file_name: String,
    /// CSV bytes, header row included.
    pub content: Vec<u8>,
    /// Number of data rows.
    pub rows: usize,
}

/// Compose the CSV export for one table.
///
/// Only visible records export; an explicit `status` narrows further. Missing
/// metadata or an empty result set is a 404, not an empty file.
pub fn export_table(
    store: &dyn RecordStore,
    table: &TableRef,
    status: Option<WorkflowStatus>,
) -> ApiResult<ExportArtifact> {
    let meta = store
        .meta_get(table.as_str())?
        .ok_or_else(|| ApiError::metadata_not_found(table.as_str()))?;

    let predicate = Predicate::all().with_opt("status", status.map(|s| s.as_str()));
    let mut records = store.fetch(table, &predicate)?;
    records.retain(Record::is_visible);
    if records.is_empty() {
        return Err(ApiError::no_data(format!(
            "No data found for export of '{}'",
            table
        )));
    }
    sort_by_serial(&mut records);

    let record_columns = collect_columns(&records);

    let mut writer = csv::Writer::from_writer(Vec::new());

    let header: Vec<&str> = META_COLUMNS
        .iter()
        .copied()
        .chain(record_columns.iter().map(String::as_str))
        .collect();
    writer
        .write_record(&header)
        .map_err(|e| ApiError::internal_error(format!("CSV write failed: {}", e)))?;

    let meta_cells = [
        meta.pdf_name.clone(),
        meta.district.clone(),
        meta.assembly_constituency.clone(),
    ];
    let rows = records.len();
    for record in &records {
        let row: Vec<String> = meta_cells
            .iter()
            .cloned()
            .chain(record_columns.iter().map(|col| cell(record, col)))
            .collect();
        writer
            .write_record(&row)
            .map_err(|e| ApiError::internal_error(format!("CSV write failed: {}", e)))?;
    }

    let content = writer
        .into_inner()
        .map_err(|e| ApiError::internal_error(format!("CSV flush failed: {}", e)))?;

    tracing::info!(table = %table, rows, "Export composed");
    Ok(ExportArtifact {
        file_name: format!("{}_export.csv", table),
        content,
        rows,
    })
}

/// Record columns in export order: `serial_no` first, the rest sorted.
fn collect_columns(records: &[Record]) -> Vec<String> {
    let mut names: BTreeSet<&str> = BTreeSet::new();
    for record in records {
        for key in record.as_map().keys() {
            if key != "serial_no" && !EXPORT_EXCLUDED_FIELDS.contains(&key.as_str()) {
                names.insert(key);
            }
        }
    }

    let mut columns = vec!["serial_no".to_string()];
    columns.extend(names.into_iter().map(String::from));
    columns
}

/// Serial numbers sort numerically when they parse; non-numeric ones sort
/// after, lexicographically.
fn sort_by_serial(records: &mut [Record]) {
    records.sort_by_key(|r| {
        let serial = r.serial_no().unwrap_or("").to_string();
        match serial.parse::<u64>() {
            Ok(n) => (0, n, serial),
            Err(_) => (1, 0, serial),
        }
    });
}

fn cell(record: &Record, column: &str) -> String {
    match record.get(column) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use rollbook_core::RollMeta;
    use rollbook_storage::InMemoryStore;
    use serde_json::json;

    fn table(name: &str) -> TableRef {
        TableRef::parse(name).unwrap()
    }

    fn record(fields: serde_json::Value) -> Record {
        serde_json::from_value(fields).unwrap()
    }

    fn seeded() -> (InMemoryStore, TableRef) {
        let store = InMemoryStore::new();
        let t = table("ward12");
        store
            .meta_insert(RollMeta::new("ward12", "Northfield", "AC-7"))
            .unwrap();
        store
            .insert(
                &t,
                record(json!({
                    "serial_no": "10",
                    "voter_id": "AAAAAAAAA1",
                    "name": "Asha",
                    "status": "completed",
                    "image_path": "/internal/10.png"
                })),
            )
            .unwrap();
        store
            .insert(
                &t,
                record(json!({
                    "serial_no": "2",
                    "voter_id": "BBBBBBBBB2",
                    "name": "Ravi",
                    "status": "progress",
                    "age": 44
                })),
            )
            .unwrap();
        store
            .insert(
                &t,
                record(json!({"serial_no": "3", "status": "new", "name": "Hidden"})),
            )
            .unwrap();
        (store, t)
    }

    fn lines(artifact: &ExportArtifact) -> Vec<String> {
        String::from_utf8(artifact.content.clone())
            .unwrap()
            .lines()
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_export_header_and_ordering() {
        let (store, t) = seeded();
        let artifact = export_table(&store, &t, None).unwrap();
        let lines = lines(&artifact);

        assert_eq!(
            lines[0],
            "pdf_name,district,assembly_constituency,serial_no,age,name,voter_id"
        );
        // Numeric serial order: 2 before 10. The `new` record is hidden.
        assert!(lines[1].starts_with("ward12,Northfield,AC-7,2,44,Ravi"));
        assert!(lines[2].starts_with("ward12,Northfield,AC-7,10,,Asha"));
        assert_eq!(artifact.rows, 2);
    }

    #[test]
    fn test_export_strips_internal_fields() {
        let (store, t) = seeded();
        let artifact = export_table(&store, &t, None).unwrap();
        let text = String::from_utf8(artifact.content).unwrap();
        assert!(!text.contains("image_path"));
        assert!(!text.contains("status"));
        assert!(!text.contains("/internal/10.png"));
    }

    #[test]
    fn test_export_narrowed_by_status() {
        let (store, t) = seeded();
        let artifact = export_table(&store, &t, Some(WorkflowStatus::Completed)).unwrap();
        assert_eq!(artifact.rows, 1);
        let text = String::from_utf8(artifact.content).unwrap();
        assert!(text.contains("Asha"));
        assert!(!text.contains("Ravi"));
    }

    #[test]
    fn test_export_missing_metadata_is_404() {
        let store = InMemoryStore::new();
        let t = table("ward99");
        store
            .insert(&t, record(json!({"serial_no": "1", "status": "completed"})))
            .unwrap();
        let err = export_table(&store, &t, None).unwrap_err();
        assert_eq!(err.code, ErrorCode::MetadataNotFound);
    }

    #[test]
    fn test_export_empty_result_is_404() {
        let (store, t) = seeded();
        let err = export_table(&store, &t, Some(WorkflowStatus::PartiallyCompleted)).unwrap_err();
        assert_eq!(err.code, ErrorCode::NoData);
    }

    #[test]
    fn test_export_file_name() {
        let (store, t) = seeded();
        let artifact = export_table(&store, &t, None).unwrap();
        assert_eq!(artifact.file_name, "ward12_export.csv");
    }

    #[test]
    fn test_non_numeric_serials_sort_after_numeric() {
        let (store, t) = seeded();
        store
            .insert(
                &t,
                record(json!({"serial_no": "A-1", "status": "progress", "name": "Tail"})),
            )
            .unwrap();
        let artifact = export_table(&store, &t, None).unwrap();
        let lines = lines(&artifact);
        assert!(lines.last().unwrap().contains("A-1"));
    }
}
