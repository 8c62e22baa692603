//! Command execution modules.

pub mod cells;
pub mod run;
pub mod validate;

/// Exit code for a successful run.
pub const EXIT_OK: i32 = 0;
/// Exit code for a failed run or invalid workflow.
pub const EXIT_FAILED: i32 = 1;
/// Exit code when the trigger does not select the workflow.
pub const EXIT_NOT_SELECTED: i32 = 2;
