//! Run context: where a run came from and what triggered it.

use cellrun_core::TriggerEvent;
use std::fmt;

/// Context information about the environment a run was resolved from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    /// The provider name (e.g., "github", "local").
    pub provider: String,
    /// The event that triggered the run.
    pub event: TriggerEvent,
    /// The commit SHA under test, when the provider knows it.
    pub sha: String,
}

impl Default for RunContext {
    fn default() -> Self {
        Self {
            provider: String::from("local"),
            event: TriggerEvent::Manual,
            sha: String::from("current"),
        }
    }
}

impl fmt::Display for RunContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} on {} ({})",
            self.provider,
            self.event.kind(),
            self.event.branch().unwrap_or("-"),
            &self.sha.get(..7).unwrap_or(&self.sha)
        )
    }
}
