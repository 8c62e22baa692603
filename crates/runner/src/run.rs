//! Matrix run orchestration.
//!
//! Materializes cells from the workflow matrix and drives a [`CellRunner`]
//! over each of them. Cells are independent: with fail-fast off (the
//! default) they run concurrently and every cell is observed regardless of
//! sibling outcomes; with fail-fast on they run sequentially and the first
//! failure marks the remaining cells skipped.

use crate::cell::CellRunner;
use crate::context::RunContext;
use crate::exec::StepExecutor;
use crate::report::{
    CellReport, CellStatus, ContextReport, Reporter, RunReport, RunStatus,
};
use cellrun_core::{Cell, Workflow};
use chrono::Utc;
use futures::future::join_all;
use indexmap::IndexMap;
use std::path::PathBuf;

/// Options controlling a matrix run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Workspace root the steps run in.
    pub workspace_root: PathBuf,
    /// Report steps as successful without executing anything.
    pub dry_run: bool,
    /// Capture step output instead of inheriting the terminal.
    pub capture_output: bool,
    /// Override the workflow's fail-fast strategy.
    pub fail_fast: Option<bool>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            workspace_root: PathBuf::from("."),
            dry_run: false,
            capture_output: false,
            fail_fast: None,
        }
    }
}

/// Run every cell of the workflow's matrix and assemble the run report.
///
/// Trigger evaluation is the caller's job; by the time a workflow reaches
/// here it has been selected.
pub async fn run_workflow(
    workflow: &Workflow,
    context: &RunContext,
    options: &RunOptions,
    reporter: &dyn Reporter,
) -> RunReport {
    let cells = workflow.matrix.cells();
    let fail_fast = options.fail_fast.unwrap_or(workflow.strategy.fail_fast);

    tracing::info!(
        workflow = workflow.display_name(),
        cells = cells.len(),
        fail_fast = fail_fast,
        "Materialized matrix"
    );
    reporter
        .run_started(workflow.display_name(), cells.len())
        .await;

    let started_at = Utc::now();
    let executor = StepExecutor::new(options.workspace_root.clone(), options.capture_output);
    let runner = CellRunner::new(&executor, options.dry_run);

    let cell_reports = if fail_fast {
        run_sequential(&runner, &cells, workflow, reporter).await
    } else {
        // Independent cells, no ordering dependency: run them concurrently.
        // Reports keep materialization order regardless of completion order.
        join_all(
            cells
                .iter()
                .map(|cell| runner.run(cell, &workflow.steps, reporter)),
        )
        .await
    };

    let completed_at = Utc::now();
    #[allow(clippy::cast_sign_loss)]
    let duration_ms = (completed_at - started_at).num_milliseconds() as u64;

    let status = if cell_reports
        .iter()
        .all(|c| c.status == CellStatus::Success)
    {
        RunStatus::Success
    } else {
        RunStatus::Failed
    };

    let report = RunReport {
        version: cellrun_core::VERSION.to_string(),
        workflow: workflow.display_name().to_string(),
        context: ContextReport {
            provider: context.provider.clone(),
            event: context.event.kind().to_string(),
            branch: context.event.branch().map(str::to_string),
            sha: context.sha.clone(),
        },
        started_at,
        completed_at: Some(completed_at),
        duration_ms: Some(duration_ms),
        status,
        cells: cell_reports,
    };

    reporter.run_completed(&report).await;
    report
}

/// Fail-fast path: cells run one at a time; after the first failure the
/// remaining cells are recorded as skipped without starting.
async fn run_sequential(
    runner: &CellRunner<'_>,
    cells: &[Cell],
    workflow: &Workflow,
    reporter: &dyn Reporter,
) -> Vec<CellReport> {
    let mut reports = Vec::with_capacity(cells.len());
    let mut halted = false;

    for cell in cells {
        if halted {
            let report = skipped_cell(cell);
            reporter.cell_completed(&report).await;
            reports.push(report);
            continue;
        }

        let report = runner.run(cell, &workflow.steps, reporter).await;
        if report.status == CellStatus::Failed {
            tracing::warn!(cell = %report.label, "Cell failed, skipping remaining cells");
            halted = true;
        }
        reports.push(report);
    }

    reports
}

fn skipped_cell(cell: &Cell) -> CellReport {
    CellReport {
        label: cell.label(),
        values: cell
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<IndexMap<_, _>>(),
        status: CellStatus::Skipped,
        duration_ms: 0,
        steps: Vec::new(),
    }
}
