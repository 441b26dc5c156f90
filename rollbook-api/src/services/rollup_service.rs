//! Location and task rollups.

use crate::error::{ApiError, ApiResult};
use crate::types::{TableCount, TaskCounts, TaskDetailsResponse};
use rollbook_core::{Predicate, TableRef, Task, WorkflowStatus};
use rollbook_storage::RecordStore;
use std::collections::BTreeSet;
use uuid::Uuid;

/// Per-table record counts for every roll registered under a district,
/// optionally narrowed to one assembly constituency.
///
/// Counting is live: each table is sized at request time rather than from a
/// stored figure, so the rollup reflects in-flight ingestion.
pub fn district_rollup(
    store: &dyn RecordStore,
    district: &str,
    assembly: Option<&str>,
) -> ApiResult<Vec<TableCount>> {
    let metas = store.meta_find(district, assembly)?;
    if metas.is_empty() {
        return Err(ApiError::no_data(format!(
            "No data found for district '{}'",
            district
        )));
    }

    let mut counts = Vec::with_capacity(metas.len());
    let mut seen = BTreeSet::new();
    for meta in metas {
        // Metadata is 1:1 with tables, but the store contract does not
        // forbid two rows naming the same table; count each table once.
        if !seen.insert(meta.pdf_name.clone()) {
            continue;
        }
        // Metadata rows are written by ingestion and should always carry a
        // registrable table name; a bad one is skipped rather than failing
        // the whole rollup.
        let table = match TableRef::parse(&meta.pdf_name) {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(pdf_name = %meta.pdf_name, error = %e, "Skipping metadata row");
                continue;
            }
        };
        let data_count = store.count(&table, &Predicate::all())?;
        counts.push(TableCount {
            pdf_name: meta.pdf_name,
            data_count,
        });
    }

    Ok(counts)
}

/// Distinct table names across all of an employee's tasks, sorted.
pub fn employee_tables(store: &dyn RecordStore, emp_id: Uuid) -> ApiResult<Vec<String>> {
    let tasks = store.tasks_by_employee(emp_id)?;
    if tasks.is_empty() {
        return Err(ApiError::no_data(format!(
            "No task found for employee '{}'",
            emp_id
        )));
    }

    let names: BTreeSet<String> = tasks
        .into_iter()
        .flat_map(|task| task.pdf_name)
        .collect();
    Ok(names.into_iter().collect())
}

/// Status tallies over one employee's tasks. An employee with no tasks gets
/// all-zero counts, not an error.
pub fn employee_task_counts(store: &dyn RecordStore, emp_id: Uuid) -> ApiResult<TaskCounts> {
    let tasks = store.tasks_by_employee(emp_id)?;
    Ok(tally(&tasks))
}

/// Every task on record plus aggregate status tallies.
pub fn task_details(store: &dyn RecordStore) -> ApiResult<TaskDetailsResponse> {
    let tasks = store.all_tasks()?;
    let status_counts = tally(&tasks);
    Ok(TaskDetailsResponse {
        status_counts,
        data: tasks,
    })
}

fn tally(tasks: &[Task]) -> TaskCounts {
    TaskCounts {
        total_tasks: tasks.len(),
        progress_count: tasks
            .iter()
            .filter(|t| t.status == WorkflowStatus::Progress)
            .count(),
        completed_count: tasks
            .iter()
            .filter(|t| t.status == WorkflowStatus::Completed)
            .count(),
    }
}
