//! `cellrun run` - execute the workflow across all matrix cells.

use crate::cli::EventKind;
use crate::commands::{EXIT_FAILED, EXIT_NOT_SELECTED, EXIT_OK};
use cellrun_core::validation::WorkflowValidator;
use cellrun_core::{Result, TriggerEvent, Workflow};
use cellrun_runner::report::json::write_report;
use cellrun_runner::report::{RunStatus, TerminalReporter};
use cellrun_runner::provider::detect_context;
use cellrun_runner::run::{RunOptions, run_workflow};
use std::path::PathBuf;

/// Arguments for the run command.
pub struct RunArgs {
    pub file: PathBuf,
    pub event: Option<EventKind>,
    pub branch: Option<String>,
    pub base_branch: Option<String>,
    pub dry_run: bool,
    pub fail_fast: bool,
    pub report_json: Option<PathBuf>,
    pub no_capture: bool,
}

/// Execute the run command, returning the process exit code.
///
/// # Errors
/// Returns error if the workflow file cannot be loaded or the report cannot
/// be written.
pub async fn execute(args: RunArgs) -> Result<i32> {
    let workflow = Workflow::load(&args.file)?;

    if let Err(errors) = WorkflowValidator::new(&workflow).validate() {
        for error in &errors {
            eprintln!("{error}");
        }
        return Ok(EXIT_FAILED);
    }

    let forced = forced_event(args.event, args.branch, args.base_branch)?;
    let context = detect_context(forced);
    tracing::info!(context = %context, "Resolved run context");

    if !workflow.should_trigger(&context.event) {
        eprintln!(
            "Workflow '{}' is not selected by event '{}'{}; use --event to force a run",
            workflow.display_name(),
            context.event.kind(),
            context
                .event
                .branch()
                .map(|b| format!(" on '{b}'"))
                .unwrap_or_default(),
        );
        return Ok(EXIT_NOT_SELECTED);
    }

    let options = RunOptions {
        workspace_root: PathBuf::from("."),
        dry_run: args.dry_run,
        capture_output: !args.no_capture,
        fail_fast: if args.fail_fast { Some(true) } else { None },
    };

    let report = run_workflow(&workflow, &context, &options, &TerminalReporter::new()).await;

    if let Some(path) = &args.report_json {
        write_report(&report, path)?;
        tracing::info!(path = %path.display(), "Report written");
    }

    Ok(if report.status == RunStatus::Success {
        EXIT_OK
    } else {
        EXIT_FAILED
    })
}

fn forced_event(
    event: Option<EventKind>,
    branch: Option<String>,
    base_branch: Option<String>,
) -> Result<Option<TriggerEvent>> {
    match event {
        None => Ok(None),
        Some(EventKind::Push) => {
            let branch = branch.ok_or_else(|| {
                cellrun_core::Error::workflow("--event push requires --branch")
            })?;
            Ok(Some(TriggerEvent::Push { branch }))
        }
        Some(EventKind::PullRequest) => {
            let base_branch = base_branch.ok_or_else(|| {
                cellrun_core::Error::workflow("--event pull-request requires --base-branch")
            })?;
            Ok(Some(TriggerEvent::PullRequest { base_branch }))
        }
    }
}
