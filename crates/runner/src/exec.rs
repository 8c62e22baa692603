//! Step Executor
//!
//! Executes individual workflow steps with proper command handling,
//! environment injection, and output capture.

use cellrun_core::{Cell, Step};
use std::path::PathBuf;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;

/// Error types for step execution
#[derive(Debug, Error)]
pub enum ExecError {
    /// Step command is empty
    #[error("Step '{step}' has empty command")]
    EmptyCommand { step: String },

    /// Process spawn or wait failed
    #[error("Failed to run step '{step}': {source}")]
    ExecutionFailed {
        step: String,
        #[source]
        source: std::io::Error,
    },

    /// Step exceeded its declared time limit
    #[error("Step '{step}' timed out after {seconds} seconds")]
    Timeout { step: String, seconds: u64 },
}

/// Output from step execution
#[derive(Debug, Clone)]
pub struct StepOutput {
    /// Step ID
    pub step_id: String,
    /// Process exit code
    pub exit_code: i32,
    /// Captured stdout
    pub stdout: String,
    /// Captured stderr
    pub stderr: String,
    /// Whether the step succeeded
    pub success: bool,
    /// Execution duration in milliseconds
    pub duration_ms: u64,
}

impl StepOutput {
    /// Create a dry-run result (no actual execution)
    #[must_use]
    pub fn dry_run(step_id: String) -> Self {
        Self {
            step_id,
            exit_code: 0,
            stdout: String::new(),
            stderr: String::new(),
            success: true,
            duration_ms: 0,
        }
    }
}

/// Default shell path for shell-mode steps
pub const DEFAULT_SHELL: &str = "/bin/sh";

/// Environment variable prefix under which cell axis values are exported.
pub const CELL_ENV_PREFIX: &str = "CELLRUN_";

/// Runner for executing workflow steps inside a cell
pub struct StepExecutor {
    /// Workspace root; step working directories resolve against it
    workspace_root: PathBuf,
    /// Whether to capture output
    capture_output: bool,
    /// Shell path for shell-mode execution
    shell_path: String,
}

impl StepExecutor {
    /// Create a new executor with the default shell
    #[must_use]
    pub fn new(workspace_root: PathBuf, capture_output: bool) -> Self {
        Self {
            workspace_root,
            capture_output,
            shell_path: DEFAULT_SHELL.to_string(),
        }
    }

    /// Create a new executor with a custom shell path
    #[must_use]
    pub fn with_shell(
        workspace_root: PathBuf,
        capture_output: bool,
        shell_path: impl Into<String>,
    ) -> Self {
        Self {
            workspace_root,
            capture_output,
            shell_path: shell_path.into(),
        }
    }

    /// Execute a single step inside a cell.
    ///
    /// The child runs with a cleared environment plus PATH and HOME, the
    /// step's own `env` map, and one `CELLRUN_<AXIS>` variable per cell
    /// axis (axis names uppercased).
    ///
    /// # Errors
    /// Returns an error if the command is empty, the process cannot be
    /// spawned, or the step exceeds its declared timeout.
    #[tracing::instrument(
        name = "execute_step",
        fields(step_id = %step.id, cell = %cell.label(), shell = step.shell),
        skip(self, step, cell)
    )]
    pub async fn execute(&self, step: &Step, cell: &Cell) -> Result<StepOutput, ExecError> {
        if step.run.is_empty() {
            return Err(ExecError::EmptyCommand {
                step: step.id.clone(),
            });
        }

        let start = std::time::Instant::now();

        let mut cmd = if step.shell {
            let shell_cmd = step.run.join(" ");
            tracing::debug!(shell_cmd = %shell_cmd, shell = %self.shell_path, "Running in shell mode");

            let mut c = Command::new(&self.shell_path);
            c.arg("-c");
            c.arg(&shell_cmd);
            c
        } else {
            tracing::debug!(cmd = ?step.run, "Running in direct mode");

            let mut c = Command::new(&step.run[0]);
            if step.run.len() > 1 {
                c.args(&step.run[1..]);
            }
            c
        };

        let cwd = match &step.working_dir {
            Some(dir) => self.workspace_root.join(dir),
            None => self.workspace_root.clone(),
        };
        cmd.current_dir(&cwd);

        // Clear environment and inject our variables
        cmd.env_clear();
        for (k, v) in &step.env {
            cmd.env(k, v);
        }
        for (axis, value) in cell.iter() {
            cmd.env(format!("{CELL_ENV_PREFIX}{}", axis.to_uppercase()), value);
        }

        // Also inject essential env vars
        if let Ok(path) = std::env::var("PATH") {
            cmd.env("PATH", path);
        }
        if let Ok(home) = std::env::var("HOME") {
            cmd.env("HOME", home);
        }

        if self.capture_output {
            cmd.stdout(Stdio::piped());
            cmd.stderr(Stdio::piped());
        } else {
            cmd.stdout(Stdio::inherit());
            cmd.stderr(Stdio::inherit());
        }

        tracing::info!(step = %step.id, "Starting step");

        let output = match step.timeout_secs {
            Some(seconds) => {
                match tokio::time::timeout(std::time::Duration::from_secs(seconds), cmd.output())
                    .await
                {
                    Ok(result) => result,
                    Err(_) => {
                        return Err(ExecError::Timeout {
                            step: step.id.clone(),
                            seconds,
                        });
                    }
                }
            }
            None => cmd.output().await,
        }
        .map_err(|e| ExecError::ExecutionFailed {
            step: step.id.clone(),
            source: e,
        })?;

        let duration = start.elapsed();
        let exit_code = output.status.code().unwrap_or(-1);
        let success = output.status.success();

        let duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        tracing::info!(
            step = %step.id,
            exit_code = exit_code,
            success = success,
            duration_ms,
            "Step completed"
        );

        Ok(StepOutput {
            step_id: step.id.clone(),
            exit_code,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success,
            duration_ms,
        })
    }
}
