//! Context providers.
//!
//! A provider resolves the [`RunContext`] from its environment. Detection
//! tries CI environments first and falls back to a local context, which is
//! always available.

use crate::context::RunContext;
use cellrun_core::TriggerEvent;

pub mod github;
pub mod local;

pub use github::GithubContext;
pub use local::LocalContext;

/// Resolve the run context for this process.
///
/// GitHub's environment wins when detected; otherwise a local context is
/// built. A caller-forced event overrides whatever the provider resolved,
/// so CI triggers can be simulated anywhere.
#[must_use]
pub fn detect_context(forced_event: Option<TriggerEvent>) -> RunContext {
    let mut ctx = GithubContext::detect().unwrap_or_else(|| LocalContext::with_event(None));
    if let Some(event) = forced_event {
        ctx.event = event;
    }
    ctx
}
