//! `cellrun validate` - parse and validate a workflow file.

use crate::commands::{EXIT_FAILED, EXIT_OK};
use cellrun_core::validation::WorkflowValidator;
use cellrun_core::{Result, Workflow};
use std::path::Path;

/// Validate a workflow file, printing every problem found.
///
/// # Errors
/// Returns error if the workflow file cannot be loaded or parsed.
pub fn execute(file: &Path) -> Result<i32> {
    let workflow = Workflow::load(file)?;

    match WorkflowValidator::new(&workflow).validate() {
        Ok(()) => {
            println!(
                "{}: OK ({} cells, {} steps)",
                workflow.display_name(),
                workflow.matrix.cells().len(),
                workflow.steps.len()
            );
            Ok(EXIT_OK)
        }
        Err(errors) => {
            for error in &errors {
                eprintln!("{error}");
            }
            Ok(EXIT_FAILED)
        }
    }
}
