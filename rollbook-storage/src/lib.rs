//! Rollbook Storage - Record Store Trait and In-Memory Implementation
//!
//! Defines the storage abstraction for the per-document record tables, the
//! per-table metadata records, and the task assignments the serving core
//! reads. The registry maps table reference to a schemaless row store; the
//! four reserved system table names are excluded by construction because
//! only validated [`TableRef`]s can name a document table.
//!
//! All operations are blocking calls issued from independent request
//! handlers. No cross-request ordering is guaranteed beyond what the
//! per-table lock provides within a single call.

use std::collections::HashMap;
use std::sync::RwLock;

use rollbook_core::{
    Predicate, Record, RecordPatch, RollMeta, StorageError, TableRef, Task,
};
use uuid::Uuid;

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StorageError>;

// ============================================================================
// RECORD STORE TRAIT
// ============================================================================

/// Storage trait for document tables, metadata records, and tasks.
///
/// Implementations provide blocking persistence. A table reference that
/// names no existing table yields empty results, never an error: the caller
/// cannot distinguish "no table" from "empty table" on read paths, matching
/// the dynamic-collection semantics of the ingestion pipeline.
pub trait RecordStore: Send + Sync {
    // === Table Operations ===

    /// All document tables, sorted by name. Reserved system names cannot
    /// appear because they are rejected at [`TableRef`] construction.
    fn list_tables(&self) -> StoreResult<Vec<TableRef>>;

    /// Fetch every record in `table` matching `predicate`.
    fn fetch(&self, table: &TableRef, predicate: &Predicate) -> StoreResult<Vec<Record>>;

    /// Count records in `table` matching `predicate`. Same predicate
    /// semantics as [`RecordStore::fetch`].
    fn count(&self, table: &TableRef, predicate: &Predicate) -> StoreResult<usize>;

    /// Look up one record by its row-local serial number.
    fn find_by_serial(&self, table: &TableRef, serial_no: &str) -> StoreResult<Option<Record>>;

    /// Apply the mutable subset of `patch` to the record with `serial_no`.
    ///
    /// Returns the modified count: 0 when no row carries `serial_no` OR when
    /// the patch changed nothing. Callers treat 0 as not-found; a no-op
    /// patch is indistinguishable from a missing row by design.
    fn update_by_serial(
        &self,
        table: &TableRef,
        serial_no: &str,
        patch: &RecordPatch,
    ) -> StoreResult<u64>;

    /// Ingestion-side insert. Creates the table on first use.
    fn insert(&self, table: &TableRef, record: Record) -> StoreResult<()>;

    // === Metadata Operations ===

    /// The single metadata record for a table, if ingested.
    fn meta_get(&self, pdf_name: &str) -> StoreResult<Option<RollMeta>>;

    /// All metadata records for a district, optionally narrowed to one
    /// assembly constituency.
    fn meta_find(&self, district: &str, assembly: Option<&str>) -> StoreResult<Vec<RollMeta>>;

    /// Ingestion-side insert; at most one metadata record per table.
    fn meta_insert(&self, meta: RollMeta) -> StoreResult<()>;

    // === Task Operations ===

    /// Record a task assignment.
    fn task_insert(&self, task: Task) -> StoreResult<()>;

    /// All tasks assigned to one employee.
    fn tasks_by_employee(&self, emp_id: Uuid) -> StoreResult<Vec<Task>>;

    /// Every task, for cross-employee status aggregation.
    fn all_tasks(&self) -> StoreResult<Vec<Task>>;
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

/// In-memory record store.
///
/// Registry of table name to row vector behind a single `RwLock`, plus
/// metadata and task maps. Suitable for tests and single-process
/// deployments; the trait boundary is where a database-backed
/// implementation would slot in.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<HashMap<String, Vec<Record>>>,
    metadata: RwLock<HashMap<String, RollMeta>>,
    tasks: RwLock<HashMap<Uuid, Task>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for InMemoryStore {
    fn list_tables(&self) -> StoreResult<Vec<TableRef>> {
        let tables = self.tables.read().map_err(|_| StorageError::LockPoisoned)?;
        let mut names: Vec<TableRef> = tables
            .keys()
            .filter_map(|name| TableRef::parse(name.clone()).ok())
            .collect();
        names.sort();
        Ok(names)
    }

    fn fetch(&self, table: &TableRef, predicate: &Predicate) -> StoreResult<Vec<Record>> {
        let tables = self.tables.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(tables
            .get(table.as_str())
            .map(|rows| {
                rows.iter()
                    .filter(|row| predicate.matches(row))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn count(&self, table: &TableRef, predicate: &Predicate) -> StoreResult<usize> {
        let tables = self.tables.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(tables
            .get(table.as_str())
            .map(|rows| rows.iter().filter(|row| predicate.matches(row)).count())
            .unwrap_or(0))
    }

    fn find_by_serial(&self, table: &TableRef, serial_no: &str) -> StoreResult<Option<Record>> {
        let tables = self.tables.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(tables.get(table.as_str()).and_then(|rows| {
            rows.iter()
                .find(|row| row.serial_no() == Some(serial_no))
                .cloned()
        }))
    }

    fn update_by_serial(
        &self,
        table: &TableRef,
        serial_no: &str,
        patch: &RecordPatch,
    ) -> StoreResult<u64> {
        let mut tables = self.tables.write().map_err(|_| StorageError::LockPoisoned)?;
        let Some(rows) = tables.get_mut(table.as_str()) else {
            return Ok(0);
        };
        let Some(row) = rows.iter_mut().find(|row| row.serial_no() == Some(serial_no)) else {
            return Ok(0);
        };

        let mut updated = row.clone();
        patch.apply_to(&mut updated);
        if updated == *row {
            // No-op patch reports the same modified count as a missing row.
            return Ok(0);
        }
        *row = updated;
        Ok(1)
    }

    fn insert(&self, table: &TableRef, record: Record) -> StoreResult<()> {
        let mut tables = self.tables.write().map_err(|_| StorageError::LockPoisoned)?;
        tables
            .entry(table.as_str().to_string())
            .or_default()
            .push(record);
        Ok(())
    }

    fn meta_get(&self, pdf_name: &str) -> StoreResult<Option<RollMeta>> {
        let metadata = self.metadata.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(metadata.get(pdf_name).cloned())
    }

    fn meta_find(&self, district: &str, assembly: Option<&str>) -> StoreResult<Vec<RollMeta>> {
        let metadata = self.metadata.read().map_err(|_| StorageError::LockPoisoned)?;
        let mut found: Vec<RollMeta> = metadata
            .values()
            .filter(|meta| meta.district == district)
            .filter(|meta| {
                assembly
                    .map(|a| meta.assembly_constituency == a)
                    .unwrap_or(true)
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| a.pdf_name.cmp(&b.pdf_name));
        Ok(found)
    }

    fn meta_insert(&self, meta: RollMeta) -> StoreResult<()> {
        let mut metadata = self.metadata.write().map_err(|_| StorageError::LockPoisoned)?;
        if metadata.contains_key(&meta.pdf_name) {
            return Err(StorageError::AlreadyExists {
                entity: "Metadata record".to_string(),
                key: meta.pdf_name,
            });
        }
        metadata.insert(meta.pdf_name.clone(), meta);
        Ok(())
    }

    fn task_insert(&self, task: Task) -> StoreResult<()> {
        let mut tasks = self.tasks.write().map_err(|_| StorageError::LockPoisoned)?;
        if tasks.contains_key(&task.task_id) {
            return Err(StorageError::AlreadyExists {
                entity: "Task".to_string(),
                key: task.task_id.to_string(),
            });
        }
        tasks.insert(task.task_id, task);
        Ok(())
    }

    fn tasks_by_employee(&self, emp_id: Uuid) -> StoreResult<Vec<Task>> {
        let tasks = self.tasks.read().map_err(|_| StorageError::LockPoisoned)?;
        let mut found: Vec<Task> = tasks
            .values()
            .filter(|task| task.emp_id == emp_id)
            .cloned()
            .collect();
        found.sort_by_key(|task| task.created_on);
        Ok(found)
    }

    fn all_tasks(&self) -> StoreResult<Vec<Task>> {
        let tasks = self.tasks.read().map_err(|_| StorageError::LockPoisoned)?;
        let mut found: Vec<Task> = tasks.values().cloned().collect();
        found.sort_by_key(|task| task.created_on);
        Ok(found)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rollbook_core::WorkflowStatus;
    use serde_json::json;

    fn table(name: &str) -> TableRef {
        TableRef::parse(name).unwrap()
    }

    fn record(fields: serde_json::Value) -> Record {
        serde_json::from_value(fields).unwrap()
    }

    fn patch(fields: serde_json::Value) -> RecordPatch {
        serde_json::from_value(fields).unwrap()
    }

    fn seeded_store() -> InMemoryStore {
        let store = InMemoryStore::new();
        let ward = table("ward12");
        store
            .insert(&ward, record(json!({"serial_no": "1", "voter_id": "AAA1111111", "status": "new"})))
            .unwrap();
        store
            .insert(&ward, record(json!({"serial_no": "2", "voter_id": "BBB2222222", "status": "progress"})))
            .unwrap();
        store
            .insert(&ward, record(json!({"serial_no": "3", "voter_id": "CCC3333333", "status": "completed"})))
            .unwrap();
        store
    }

    #[test]
    fn test_insert_fetch_all() {
        let store = seeded_store();
        let rows = store.fetch(&table("ward12"), &Predicate::all()).unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_fetch_missing_table_is_empty_not_error() {
        let store = InMemoryStore::new();
        let rows = store.fetch(&table("nope"), &Predicate::all()).unwrap();
        assert!(rows.is_empty());
        assert_eq!(store.count(&table("nope"), &Predicate::all()).unwrap(), 0);
    }

    #[test]
    fn test_count_matches_fetch_len() {
        let store = seeded_store();
        let pred = Predicate::all().with("status", json!("progress"));
        let rows = store.fetch(&table("ward12"), &pred).unwrap();
        let count = store.count(&table("ward12"), &pred).unwrap();
        assert_eq!(rows.len(), count);
        assert_eq!(count, 1);
    }

    #[test]
    fn test_find_by_serial() {
        let store = seeded_store();
        let found = store.find_by_serial(&table("ward12"), "2").unwrap();
        assert_eq!(found.unwrap().voter_id(), Some("BBB2222222"));

        let missing = store.find_by_serial(&table("ward12"), "99").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_update_by_serial_modifies_row() {
        let store = seeded_store();
        let modified = store
            .update_by_serial(&table("ward12"), "2", &patch(json!({"status": "completed"})))
            .unwrap();
        assert_eq!(modified, 1);

        let row = store.find_by_serial(&table("ward12"), "2").unwrap().unwrap();
        assert_eq!(row.status(), Some(WorkflowStatus::Completed));
    }

    #[test]
    fn test_update_missing_row_reports_zero() {
        let store = seeded_store();
        let modified = store
            .update_by_serial(&table("ward12"), "99", &patch(json!({"status": "completed"})))
            .unwrap();
        assert_eq!(modified, 0);
    }

    #[test]
    fn test_noop_patch_reports_zero_like_missing_row() {
        let store = seeded_store();
        // Same status as already stored: no field changes, modified count 0.
        let modified = store
            .update_by_serial(&table("ward12"), "2", &patch(json!({"status": "progress"})))
            .unwrap();
        assert_eq!(modified, 0);
    }

    #[test]
    fn test_update_never_touches_immutable_fields() {
        let store = seeded_store();
        let modified = store
            .update_by_serial(
                &table("ward12"),
                "2",
                &patch(json!({"serial_no": "42", "created_by": "x", "status": "completed"})),
            )
            .unwrap();
        assert_eq!(modified, 1);

        let row = store.find_by_serial(&table("ward12"), "2").unwrap().unwrap();
        assert_eq!(row.serial_no(), Some("2"));
        assert!(row.get("created_by").is_none());
    }

    #[test]
    fn test_list_tables_sorted() {
        let store = InMemoryStore::new();
        store.insert(&table("ward2"), Record::new()).unwrap();
        store.insert(&table("ward1"), Record::new()).unwrap();

        let names: Vec<String> = store
            .list_tables()
            .unwrap()
            .iter()
            .map(|t| t.as_str().to_string())
            .collect();
        assert_eq!(names, vec!["ward1", "ward2"]);
    }

    #[test]
    fn test_meta_insert_get() {
        let store = InMemoryStore::new();
        store.meta_insert(RollMeta::new("ward12", "D1", "A1")).unwrap();

        let meta = store.meta_get("ward12").unwrap().unwrap();
        assert_eq!(meta.district, "D1");
        assert!(store.meta_get("ward13").unwrap().is_none());
    }

    #[test]
    fn test_meta_insert_duplicate_fails() {
        let store = InMemoryStore::new();
        store.meta_insert(RollMeta::new("ward12", "D1", "A1")).unwrap();
        let result = store.meta_insert(RollMeta::new("ward12", "D2", "A2"));
        assert!(matches!(result, Err(StorageError::AlreadyExists { .. })));
    }

    #[test]
    fn test_meta_find_by_district_and_assembly() {
        let store = InMemoryStore::new();
        store.meta_insert(RollMeta::new("ward1", "D1", "A1")).unwrap();
        store.meta_insert(RollMeta::new("ward2", "D1", "A2")).unwrap();
        store.meta_insert(RollMeta::new("ward3", "D2", "A1")).unwrap();

        let district_only = store.meta_find("D1", None).unwrap();
        assert_eq!(district_only.len(), 2);

        let narrowed = store.meta_find("D1", Some("A2")).unwrap();
        assert_eq!(narrowed.len(), 1);
        assert_eq!(narrowed[0].pdf_name, "ward2");

        assert!(store.meta_find("D9", None).unwrap().is_empty());
    }

    #[test]
    fn test_tasks_by_employee() {
        let store = InMemoryStore::new();
        let emp = Uuid::now_v7();
        let other = Uuid::now_v7();
        store
            .task_insert(Task::assigned(emp, vec!["ward1".to_string()]))
            .unwrap();
        store
            .task_insert(Task::assigned(emp, vec!["ward2".to_string()]))
            .unwrap();
        store
            .task_insert(Task::assigned(other, vec!["ward3".to_string()]))
            .unwrap();

        assert_eq!(store.tasks_by_employee(emp).unwrap().len(), 2);
        assert_eq!(store.tasks_by_employee(other).unwrap().len(), 1);
        assert_eq!(store.all_tasks().unwrap().len(), 3);
    }

    #[test]
    fn test_task_insert_duplicate_fails() {
        let store = InMemoryStore::new();
        let task = Task::assigned(Uuid::now_v7(), vec![]);
        store.task_insert(task.clone()).unwrap();
        assert!(matches!(
            store.task_insert(task),
            Err(StorageError::AlreadyExists { .. })
        ));
    }
}

// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn status_strategy() -> impl Strategy<Value = &'static str> {
        prop_oneof![
            Just("new"),
            Just("progress"),
            Just("completed"),
            Just("partially completed"),
        ]
    }

    fn store_with_rows(statuses: &[&str]) -> (InMemoryStore, TableRef) {
        let store = InMemoryStore::new();
        let table = TableRef::parse("ward_prop").unwrap();
        for (i, status) in statuses.iter().enumerate() {
            let record: Record = serde_json::from_value(json!({
                "serial_no": i.to_string(),
                "voter_id": format!("ID{:08}", i),
                "status": status,
            }))
            .unwrap();
            store.insert(&table, record).unwrap();
        }
        (store, table)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// For every table and predicate, the count a store reports equals
        /// the length of the fetched result set.
        #[test]
        fn prop_count_equals_fetch_len(
            statuses in prop::collection::vec(status_strategy(), 0..40),
            filter in prop::option::of(status_strategy()),
        ) {
            let (store, table) = store_with_rows(&statuses);
            let pred = Predicate::all().with_opt("status", filter);

            let rows = store.fetch(&table, &pred).unwrap();
            let count = store.count(&table, &pred).unwrap();
            prop_assert_eq!(rows.len(), count);
        }

        /// Updating a serial number that does not exist reports zero
        /// modified rows and leaves the table untouched.
        #[test]
        fn prop_update_missing_serial_is_zero(
            statuses in prop::collection::vec(status_strategy(), 0..20),
        ) {
            let (store, table) = store_with_rows(&statuses);
            let before = store.fetch(&table, &Predicate::all()).unwrap();

            let patch: RecordPatch =
                serde_json::from_value(json!({"status": "completed"})).unwrap();
            let modified = store.update_by_serial(&table, "no-such-serial", &patch).unwrap();

            prop_assert_eq!(modified, 0);
            prop_assert_eq!(before, store.fetch(&table, &Predicate::all()).unwrap());
        }

        /// A status round-trip: patch to completed, then it is found under
        /// the completed predicate and absent from its old one.
        #[test]
        fn prop_status_roundtrip(idx in 0usize..10) {
            let statuses = vec!["progress"; 10];
            let (store, table) = store_with_rows(&statuses);
            let serial = idx.to_string();

            let patch: RecordPatch =
                serde_json::from_value(json!({"status": "completed"})).unwrap();
            store.update_by_serial(&table, &serial, &patch).unwrap();

            let completed = store
                .fetch(&table, &Predicate::all().with("status", json!("completed")))
                .unwrap();
            let progress = store
                .fetch(&table, &Predicate::all().with("status", json!("progress")))
                .unwrap();

            prop_assert!(completed.iter().any(|r| r.serial_no() == Some(serial.as_str())));
            prop_assert!(progress.iter().all(|r| r.serial_no() != Some(serial.as_str())));
        }
    }
}
