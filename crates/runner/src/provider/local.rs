//! Local fallback context.

use crate::context::RunContext;
use cellrun_core::TriggerEvent;

/// Always-available context for runs outside any recognized CI environment.
pub struct LocalContext;

impl LocalContext {
    /// Build a local context, optionally carrying a caller-forced event so
    /// CI triggers can be simulated off-CI.
    #[must_use]
    pub fn with_event(event: Option<TriggerEvent>) -> RunContext {
        RunContext {
            provider: "local".to_string(),
            event: event.unwrap_or(TriggerEvent::Manual),
            sha: "current".to_string(),
        }
    }
}
