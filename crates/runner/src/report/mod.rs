//! Run Reporting
//!
//! Provides types and traits for run reporting, including:
//! - Static report types for completed runs
//! - A live reporter trait with terminal and no-op implementations

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub mod json;
pub mod terminal;

pub use terminal::{NoOpReporter, Reporter, TerminalReporter};

/// Final report for a completed matrix run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Report format version.
    pub version: String,
    /// Workflow name.
    pub workflow: String,
    /// Execution context (provider, event, etc.).
    pub context: ContextReport,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run completed.
    pub completed_at: Option<DateTime<Utc>>,
    /// Total duration in milliseconds.
    pub duration_ms: Option<u64>,
    /// Overall run status.
    pub status: RunStatus,
    /// Per-cell reports, in materialization order.
    pub cells: Vec<CellReport>,
}

impl RunReport {
    /// Get the number of failed cells.
    #[must_use]
    pub fn cell_failures(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| c.status == CellStatus::Failed)
            .count()
    }
}

/// Execution context information carried into reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextReport {
    /// Provider name (github, local).
    pub provider: String,
    /// Event kind (push, pull_request, manual).
    pub event: String,
    /// Branch the event concerns, if any.
    pub branch: Option<String>,
    /// Commit SHA under test.
    pub sha: String,
}

/// Report for one environment cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellReport {
    /// Cell display label (`axis=value` pairs in axis order).
    pub label: String,
    /// The cell's axis assignments.
    pub values: IndexMap<String, String>,
    /// Cell completion status.
    pub status: CellStatus,
    /// Execution duration in milliseconds.
    pub duration_ms: u64,
    /// Per-step reports, in declaration order.
    pub steps: Vec<StepReport>,
}

/// Report for one step within a cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepReport {
    /// Step identifier.
    pub id: String,
    /// Step display name.
    pub name: String,
    /// Step completion status.
    pub status: StepStatus,
    /// Process exit code (if the step ran).
    pub exit_code: Option<i32>,
    /// Execution duration in milliseconds.
    pub duration_ms: u64,
    /// Error message (if the step failed without an exit code).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Step completion status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Step completed successfully.
    Success,
    /// Step failed.
    Failed,
    /// Step was skipped (guard excluded it, or an earlier step failed).
    Skipped,
}

impl StepStatus {
    /// Get an icon representing this status.
    #[must_use]
    pub const fn icon(&self) -> &'static str {
        match self {
            Self::Success => "\u{2705}", // check mark
            Self::Failed => "\u{274c}",  // x
            Self::Skipped => "\u{23ed}", // skip forward
        }
    }
}

/// Cell completion status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CellStatus {
    /// Every step that ran succeeded.
    Success,
    /// A step failed.
    Failed,
    /// The cell never started (fail-fast stopped the run).
    Skipped,
}

/// Overall run status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Every cell succeeded.
    Success,
    /// At least one cell failed or was skipped.
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&RunStatus::Success).unwrap(),
            "\"success\""
        );
        assert_eq!(
            serde_json::to_string(&CellStatus::Skipped).unwrap(),
            "\"skipped\""
        );
        assert_eq!(
            serde_json::to_string(&StepStatus::Failed).unwrap(),
            "\"failed\""
        );
    }

    #[test]
    fn test_cell_failures_counts_failed_only() {
        let report = RunReport {
            version: "1".to_string(),
            workflow: "demo".to_string(),
            context: ContextReport {
                provider: "local".to_string(),
                event: "manual".to_string(),
                branch: None,
                sha: "current".to_string(),
            },
            started_at: Utc::now(),
            completed_at: None,
            duration_ms: None,
            status: RunStatus::Failed,
            cells: vec![
                CellReport {
                    label: "os=a".to_string(),
                    values: IndexMap::new(),
                    status: CellStatus::Success,
                    duration_ms: 1,
                    steps: vec![],
                },
                CellReport {
                    label: "os=b".to_string(),
                    values: IndexMap::new(),
                    status: CellStatus::Failed,
                    duration_ms: 1,
                    steps: vec![],
                },
                CellReport {
                    label: "os=c".to_string(),
                    values: IndexMap::new(),
                    status: CellStatus::Skipped,
                    duration_ms: 0,
                    steps: vec![],
                },
            ],
        };
        assert_eq!(report.cell_failures(), 1);
    }

    #[test]
    fn test_step_status_icons_are_distinct() {
        let icons = [
            StepStatus::Success.icon(),
            StepStatus::Failed.icon(),
            StepStatus::Skipped.icon(),
        ];
        let unique: std::collections::HashSet<_> = icons.iter().collect();
        assert_eq!(unique.len(), icons.len());
    }
}
