//! Live run reporters.
//!
//! Defines the interface for reporting run progress and a terminal
//! implementation that emits through tracing.

use async_trait::async_trait;

use super::{CellReport, CellStatus, RunReport, RunStatus, StepReport};

/// Trait for reporting run progress while cells execute.
#[async_trait]
pub trait Reporter: Send + Sync {
    /// Called when a run starts.
    async fn run_started(&self, workflow: &str, cell_count: usize);

    /// Called when a cell starts executing.
    async fn cell_started(&self, label: &str, step_count: usize);

    /// Called when a step reaches a terminal state.
    async fn step_completed(&self, cell_label: &str, step: &StepReport);

    /// Called when a cell completes.
    async fn cell_completed(&self, cell: &CellReport);

    /// Called when the run completes.
    async fn run_completed(&self, report: &RunReport);
}

/// No-op reporter for when progress reporting is disabled.
#[derive(Debug, Default)]
pub struct NoOpReporter;

#[async_trait]
impl Reporter for NoOpReporter {
    async fn run_started(&self, _workflow: &str, _cell_count: usize) {}
    async fn cell_started(&self, _label: &str, _step_count: usize) {}
    async fn step_completed(&self, _cell_label: &str, _step: &StepReport) {}
    async fn cell_completed(&self, _cell: &CellReport) {}
    async fn run_completed(&self, _report: &RunReport) {}
}

/// Terminal-based reporter.
///
/// Outputs progress to the terminal via tracing macros so it composes with
/// whatever subscriber the binary installed.
#[derive(Debug, Default)]
pub struct TerminalReporter;

impl TerminalReporter {
    /// Create a new terminal reporter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Format a step status line.
    fn format_step_line(step: &StepReport) -> String {
        #[allow(clippy::cast_precision_loss)]
        let secs = step.duration_ms as f64 / 1000.0;
        format!("{} {} ({secs:.2}s)", step.status.icon(), step.name)
    }
}

#[async_trait]
impl Reporter for TerminalReporter {
    async fn run_started(&self, workflow: &str, cell_count: usize) {
        tracing::info!(workflow = workflow, cells = cell_count, "Starting run");
    }

    async fn cell_started(&self, label: &str, step_count: usize) {
        tracing::info!(cell = label, steps = step_count, "Starting cell");
    }

    async fn step_completed(&self, cell_label: &str, step: &StepReport) {
        let line = Self::format_step_line(step);
        match step.status {
            super::StepStatus::Failed => {
                if let Some(error) = &step.error {
                    tracing::error!(cell = cell_label, step = %step.id, error = %error, "{}", line);
                } else {
                    tracing::error!(cell = cell_label, step = %step.id, "{}", line);
                }
            }
            _ => {
                tracing::info!(cell = cell_label, step = %step.id, "{}", line);
            }
        }
    }

    async fn cell_completed(&self, cell: &CellReport) {
        match cell.status {
            CellStatus::Failed => {
                tracing::error!(cell = %cell.label, duration_ms = cell.duration_ms, "Cell failed");
            }
            CellStatus::Skipped => {
                tracing::warn!(cell = %cell.label, "Cell skipped");
            }
            CellStatus::Success => {
                tracing::info!(cell = %cell.label, duration_ms = cell.duration_ms, "Cell passed");
            }
        }
    }

    #[allow(clippy::cast_precision_loss)] // u64 ms to f64 secs is fine for display
    async fn run_completed(&self, report: &RunReport) {
        let total = report.cells.len();
        let failed = report.cell_failures();
        let duration_secs = report.duration_ms.map_or(0.0, |ms| ms as f64 / 1000.0);

        if report.status == RunStatus::Success {
            tracing::info!(
                workflow = %report.workflow,
                cells = total,
                duration = format!("{duration_secs:.2}s"),
                "Run completed successfully"
            );
        } else {
            tracing::error!(
                workflow = %report.workflow,
                cells = total,
                failed = failed,
                duration = format!("{duration_secs:.2}s"),
                "Run failed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::StepStatus;

    fn make_step(status: StepStatus) -> StepReport {
        StepReport {
            id: "checkout".to_string(),
            name: "Check out source".to_string(),
            status,
            exit_code: Some(0),
            duration_ms: 1500,
            error: None,
        }
    }

    #[test]
    fn test_format_step_line() {
        let line = TerminalReporter::format_step_line(&make_step(StepStatus::Success));
        assert!(line.contains("Check out source"));
        assert!(line.contains("1.50s"));
    }

    #[tokio::test]
    async fn test_noop_reporter() {
        let reporter = NoOpReporter;
        reporter.run_started("demo", 4).await;
        reporter.cell_started("os=linux", 2).await;
        reporter
            .step_completed("os=linux", &make_step(StepStatus::Success))
            .await;
    }
}
