//! `cellrun cells` - list the materialized environment cells.

use crate::commands::EXIT_OK;
use cellrun_core::{Result, Workflow};
use std::path::Path;

/// Print the cells the workflow's matrix materializes, without running
/// anything.
///
/// # Errors
/// Returns error if the workflow file cannot be loaded.
pub fn execute(file: &Path) -> Result<i32> {
    let workflow = Workflow::load(file)?;
    let cells = workflow.matrix.cells();

    println!(
        "{}: {} cell{}",
        workflow.display_name(),
        cells.len(),
        if cells.len() == 1 { "" } else { "s" }
    );
    for cell in &cells {
        println!("  {cell}");
    }

    Ok(EXIT_OK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_execute_with_fixture() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "name: demo\nmatrix:\n  axes:\n    os: [a, b]\nsteps:\n  - id: ok\n    run: ['true']\n"
        )
        .unwrap();

        let code = execute(file.path()).unwrap();
        assert_eq!(code, EXIT_OK);
    }

    #[test]
    fn test_execute_missing_file_errors() {
        assert!(execute(Path::new("/nonexistent/wf.yml")).is_err());
    }
}
