//! Per-cell step execution.
//!
//! A cell runs its step list strictly in order. A guard that excludes the
//! cell records the step as skipped and moves on; a failing step marks the
//! cell failed and every remaining step skipped without executing it.

use crate::exec::{ExecError, StepExecutor, StepOutput};
use crate::report::{CellReport, CellStatus, Reporter, StepReport, StepStatus};
use cellrun_core::{Cell, Step};
use indexmap::IndexMap;

/// Runs the step sequence of a single cell.
pub struct CellRunner<'a> {
    executor: &'a StepExecutor,
    dry_run: bool,
}

impl<'a> CellRunner<'a> {
    /// Create a runner over the given executor.
    #[must_use]
    pub fn new(executor: &'a StepExecutor, dry_run: bool) -> Self {
        Self { executor, dry_run }
    }

    /// Execute all steps in the cell and report each terminal state.
    ///
    /// Never returns an error: execution problems (spawn failure, timeout)
    /// are folded into the failing step's report.
    pub async fn run(&self, cell: &Cell, steps: &[Step], reporter: &dyn Reporter) -> CellReport {
        let label = cell.label();
        reporter.cell_started(&label, steps.len()).await;

        let start = std::time::Instant::now();
        let mut reports = Vec::with_capacity(steps.len());
        let mut failed = false;

        for step in steps {
            let report = if failed {
                skipped(step)
            } else if !step.runs_in(cell) {
                tracing::debug!(cell = %label, step = %step.id, "Guard excluded step");
                skipped(step)
            } else if self.dry_run {
                from_output(step, &StepOutput::dry_run(step.id.clone()))
            } else {
                match self.executor.execute(step, cell).await {
                    Ok(output) => from_output(step, &output),
                    Err(e) => from_exec_error(step, &e),
                }
            };

            if report.status == StepStatus::Failed {
                failed = true;
            }
            reporter.step_completed(&label, &report).await;
            reports.push(report);
        }

        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        let cell_report = CellReport {
            label,
            values: cell
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<IndexMap<_, _>>(),
            status: if failed {
                CellStatus::Failed
            } else {
                CellStatus::Success
            },
            duration_ms,
            steps: reports,
        };
        reporter.cell_completed(&cell_report).await;
        cell_report
    }
}

fn skipped(step: &Step) -> StepReport {
    StepReport {
        id: step.id.clone(),
        name: step.display_name().to_string(),
        status: StepStatus::Skipped,
        exit_code: None,
        duration_ms: 0,
        error: None,
    }
}

fn from_output(step: &Step, output: &StepOutput) -> StepReport {
    StepReport {
        id: step.id.clone(),
        name: step.display_name().to_string(),
        status: if output.success {
            StepStatus::Success
        } else {
            StepStatus::Failed
        },
        exit_code: Some(output.exit_code),
        duration_ms: output.duration_ms,
        error: None,
    }
}

fn from_exec_error(step: &Step, error: &ExecError) -> StepReport {
    StepReport {
        id: step.id.clone(),
        name: step.display_name().to_string(),
        status: StepStatus::Failed,
        exit_code: None,
        duration_ms: 0,
        error: Some(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::NoOpReporter;
    use cellrun_core::Guard;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn make_step(id: &str, run: Vec<&str>) -> Step {
        Step {
            id: id.to_string(),
            name: None,
            run: run.iter().map(|s| (*s).to_string()).collect(),
            shell: false,
            env: HashMap::new(),
            working_dir: None,
            only_if: None,
            timeout_secs: None,
        }
    }

    fn ubuntu_cell() -> Cell {
        Cell::from_pairs([("os", "ubuntu-latest"), ("python", "3.9")])
    }

    fn windows_cell() -> Cell {
        Cell::from_pairs([("os", "windows-latest"), ("python", "3.9")])
    }

    fn guarded(mut step: Step) -> Step {
        step.only_if = Some(Guard {
            axis: "os".to_string(),
            starts_with: Some("ubuntu".to_string()),
            equals: None,
        });
        step
    }

    #[tokio::test]
    async fn test_all_steps_succeed() {
        let tmp = TempDir::new().unwrap();
        let executor = StepExecutor::new(tmp.path().to_path_buf(), true);
        let runner = CellRunner::new(&executor, false);
        let steps = vec![make_step("a", vec!["true"]), make_step("b", vec!["true"])];

        let report = runner.run(&ubuntu_cell(), &steps, &NoOpReporter).await;

        assert_eq!(report.status, CellStatus::Success);
        assert_eq!(report.steps.len(), 2);
        assert!(
            report
                .steps
                .iter()
                .all(|s| s.status == StepStatus::Success)
        );
    }

    #[tokio::test]
    async fn test_failure_halts_remaining_steps() {
        let tmp = TempDir::new().unwrap();
        let executor = StepExecutor::new(tmp.path().to_path_buf(), true);
        let runner = CellRunner::new(&executor, false);
        // Step "c" writes a marker file; it must never run.
        let marker = tmp.path().join("marker");
        let steps = vec![
            make_step("a", vec!["true"]),
            make_step("b", vec!["false"]),
            make_step("c", vec!["touch", marker.to_str().unwrap()]),
        ];

        let report = runner.run(&ubuntu_cell(), &steps, &NoOpReporter).await;

        assert_eq!(report.status, CellStatus::Failed);
        assert_eq!(report.steps[0].status, StepStatus::Success);
        assert_eq!(report.steps[1].status, StepStatus::Failed);
        assert_eq!(report.steps[2].status, StepStatus::Skipped);
        assert!(!marker.exists());
    }

    #[tokio::test]
    async fn test_guard_skips_step_without_failing_cell() {
        let tmp = TempDir::new().unwrap();
        let executor = StepExecutor::new(tmp.path().to_path_buf(), true);
        let runner = CellRunner::new(&executor, false);
        let steps = vec![
            make_step("a", vec!["true"]),
            guarded(make_step("linux-only", vec!["true"])),
            make_step("b", vec!["true"]),
        ];

        let report = runner.run(&windows_cell(), &steps, &NoOpReporter).await;

        assert_eq!(report.status, CellStatus::Success);
        assert_eq!(report.steps[1].status, StepStatus::Skipped);
        assert_eq!(report.steps[2].status, StepStatus::Success);
    }

    #[tokio::test]
    async fn test_guard_runs_step_on_matching_cell() {
        let tmp = TempDir::new().unwrap();
        let executor = StepExecutor::new(tmp.path().to_path_buf(), true);
        let runner = CellRunner::new(&executor, false);
        let steps = vec![guarded(make_step("linux-only", vec!["true"]))];

        let report = runner.run(&ubuntu_cell(), &steps, &NoOpReporter).await;

        assert_eq!(report.steps[0].status, StepStatus::Success);
    }

    #[tokio::test]
    async fn test_spawn_failure_is_step_failure() {
        let tmp = TempDir::new().unwrap();
        let executor = StepExecutor::new(tmp.path().to_path_buf(), true);
        let runner = CellRunner::new(&executor, false);
        let steps = vec![
            make_step("ghost", vec!["definitely-not-a-real-binary"]),
            make_step("after", vec!["true"]),
        ];

        let report = runner.run(&ubuntu_cell(), &steps, &NoOpReporter).await;

        assert_eq!(report.status, CellStatus::Failed);
        assert_eq!(report.steps[0].status, StepStatus::Failed);
        assert!(report.steps[0].error.is_some());
        assert_eq!(report.steps[1].status, StepStatus::Skipped);
    }

    #[tokio::test]
    async fn test_dry_run_executes_nothing() {
        let tmp = TempDir::new().unwrap();
        let executor = StepExecutor::new(tmp.path().to_path_buf(), true);
        let runner = CellRunner::new(&executor, true);
        let marker = tmp.path().join("marker");
        let steps = vec![make_step("touch", vec!["touch", marker.to_str().unwrap()])];

        let report = runner.run(&ubuntu_cell(), &steps, &NoOpReporter).await;

        assert_eq!(report.status, CellStatus::Success);
        assert!(!marker.exists());
    }

    #[tokio::test]
    async fn test_report_carries_cell_values() {
        let tmp = TempDir::new().unwrap();
        let executor = StepExecutor::new(tmp.path().to_path_buf(), true);
        let runner = CellRunner::new(&executor, false);
        let steps = vec![make_step("a", vec!["true"])];

        let report = runner.run(&ubuntu_cell(), &steps, &NoOpReporter).await;

        assert_eq!(report.label, "os=ubuntu-latest, python=3.9");
        assert_eq!(report.values.get("os").map(String::as_str), Some("ubuntu-latest"));
    }
}
