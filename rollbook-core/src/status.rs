//! Record and task workflow statuses

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a voter record (and of assigned tasks, which reuse
/// `Progress`/`Completed`).
///
/// Ingestion creates every record as `New`; the task workflow moves it
/// forward. There is deliberately no state-machine guard: any status may be
/// re-patched to any other, including `Completed` back to `New`. Listing and
/// export views hide `New` records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    /// Initial state assigned by ingestion; hidden from review views.
    New,
    /// Under review by an assigned employee.
    Progress,
    /// Review finished.
    Completed,
    /// Review finished with gaps.
    #[serde(rename = "partially completed")]
    PartiallyCompleted,
}

impl WorkflowStatus {
    /// Wire/storage representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStatus::New => "new",
            WorkflowStatus::Progress => "progress",
            WorkflowStatus::Completed => "completed",
            WorkflowStatus::PartiallyCompleted => "partially completed",
        }
    }

    /// Whether records in this state appear in listing and export views.
    pub fn is_visible(&self) -> bool {
        !matches!(self, WorkflowStatus::New)
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WorkflowStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" => Ok(WorkflowStatus::New),
            "progress" => Ok(WorkflowStatus::Progress),
            "completed" => Ok(WorkflowStatus::Completed),
            "partially completed" | "partially_completed" => {
                Ok(WorkflowStatus::PartiallyCompleted)
            }
            _ => Err(format!("Invalid WorkflowStatus: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            WorkflowStatus::New,
            WorkflowStatus::Progress,
            WorkflowStatus::Completed,
            WorkflowStatus::PartiallyCompleted,
        ] {
            let parsed: WorkflowStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_status_serde_wire_names() {
        let json = serde_json::to_string(&WorkflowStatus::PartiallyCompleted).unwrap();
        assert_eq!(json, "\"partially completed\"");

        let parsed: WorkflowStatus = serde_json::from_str("\"progress\"").unwrap();
        assert_eq!(parsed, WorkflowStatus::Progress);
    }

    #[test]
    fn test_only_new_is_hidden() {
        assert!(!WorkflowStatus::New.is_visible());
        assert!(WorkflowStatus::Progress.is_visible());
        assert!(WorkflowStatus::Completed.is_visible());
        assert!(WorkflowStatus::PartiallyCompleted.is_visible());
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("done".parse::<WorkflowStatus>().is_err());
        assert!("".parse::<WorkflowStatus>().is_err());
    }
}
