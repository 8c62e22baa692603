//! GitHub Actions context detection.

use crate::context::RunContext;
use cellrun_core::TriggerEvent;

/// Resolves a [`RunContext`] from the GitHub Actions environment.
pub struct GithubContext;

impl GithubContext {
    /// Detect whether this process runs inside GitHub Actions and, if so,
    /// build the context from the standard environment variables.
    ///
    /// Push events carry `GITHUB_REF_NAME` as the pushed branch;
    /// pull-request events carry `GITHUB_BASE_REF` as the target branch.
    /// Any other event name maps to a manual trigger.
    #[must_use]
    pub fn detect() -> Option<RunContext> {
        if std::env::var("GITHUB_ACTIONS").ok()? != "true" {
            return None;
        }

        let event_name = std::env::var("GITHUB_EVENT_NAME").unwrap_or_default();
        let event = match event_name.as_str() {
            "push" => TriggerEvent::Push {
                branch: std::env::var("GITHUB_REF_NAME").unwrap_or_default(),
            },
            "pull_request" | "pull_request_target" => TriggerEvent::PullRequest {
                base_branch: std::env::var("GITHUB_BASE_REF").unwrap_or_default(),
            },
            _ => TriggerEvent::Manual,
        };

        Some(RunContext {
            provider: "github".to_string(),
            event,
            sha: std::env::var("GITHUB_SHA").unwrap_or_default(),
        })
    }
}
