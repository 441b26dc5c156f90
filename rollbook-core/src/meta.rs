//! Per-document metadata and task assignment types

use crate::status::WorkflowStatus;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// First-page metadata for one ingested roll PDF.
///
/// Exactly zero or one per table reference. Created by the ingestion
/// pipeline; read-only from the serving core's perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RollMeta {
    /// Table reference this metadata describes.
    pub pdf_name: String,
    /// District the roll covers.
    pub district: String,
    /// Assembly constituency within the district.
    pub assembly_constituency: String,
    /// Rendered first-page image, internal artifact path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_page_path: Option<String>,
    /// Extracted first-page text, internal artifact path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_path: Option<String>,
}

impl RollMeta {
    pub fn new(
        pdf_name: impl Into<String>,
        district: impl Into<String>,
        assembly_constituency: impl Into<String>,
    ) -> Self {
        Self {
            pdf_name: pdf_name.into(),
            district: district.into(),
            assembly_constituency: assembly_constituency.into(),
            first_page_path: None,
            text_path: None,
        }
    }
}

/// A review task assigning a set of document tables to one employee.
///
/// Owned by the task workflow; the serving core only reads tasks to resolve
/// which tables an employee has access to and to aggregate status counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Task {
    pub task_id: Uuid,
    pub emp_id: Uuid,
    /// Table references assigned by this task.
    pub pdf_name: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub status: WorkflowStatus,
    pub created_on: DateTime<Utc>,
}

impl Task {
    /// New task in the initial assigned state.
    pub fn assigned(emp_id: Uuid, pdf_name: Vec<String>) -> Self {
        Self {
            task_id: Uuid::now_v7(),
            emp_id,
            pdf_name,
            description: None,
            priority: None,
            due_date: None,
            status: WorkflowStatus::Progress,
            created_on: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roll_meta_serialization_skips_absent_paths() {
        let meta = RollMeta::new("ward12", "D1", "A1");
        let json = serde_json::to_string(&meta).unwrap();
        assert!(json.contains("\"district\":\"D1\""));
        assert!(!json.contains("first_page_path"));
        assert!(!json.contains("text_path"));
    }

    #[test]
    fn test_task_starts_in_progress() {
        let task = Task::assigned(Uuid::now_v7(), vec!["ward12".to_string()]);
        assert_eq!(task.status, WorkflowStatus::Progress);
        assert_eq!(task.pdf_name, vec!["ward12"]);
    }
}
