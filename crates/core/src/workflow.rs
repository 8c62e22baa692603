//! Workflow definition and trigger evaluation.
//!
//! A workflow file declares a trigger condition (`when`), an execution
//! strategy, a matrix, and an ordered step list. Loading is plain
//! serde_yaml; nothing here executes anything.

use crate::matrix::Matrix;
use crate::step::Step;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A declarative pipeline: trigger condition, strategy, matrix, and steps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    /// Workflow display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Trigger condition. Absent means the workflow never self-selects and
    /// must be forced from the CLI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub when: Option<TriggerCondition>,

    /// Cross-cell execution strategy.
    #[serde(default)]
    pub strategy: Strategy,

    /// Matrix whose cross product generates the environment cells.
    pub matrix: Matrix,

    /// Ordered step list; identical for every cell modulo guards.
    pub steps: Vec<Step>,
}

impl Workflow {
    /// Load a workflow definition from a YAML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or fails to parse.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a workflow definition from YAML text.
    ///
    /// # Errors
    /// Returns an error if the text is not a valid workflow document.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    /// Workflow display name, falling back to "workflow".
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("workflow")
    }

    /// Whether the given event selects this workflow.
    ///
    /// Push and pull-request events match when the trigger condition names
    /// the pushed branch or the pull request's target branch. Manual events
    /// never self-select; forcing a run is the caller's decision.
    #[must_use]
    pub fn should_trigger(&self, event: &TriggerEvent) -> bool {
        let Some(when) = &self.when else {
            return false;
        };

        match event {
            TriggerEvent::Push { branch } => when
                .push
                .as_ref()
                .is_some_and(|branches| branches.to_vec().iter().any(|b| b == branch)),
            TriggerEvent::PullRequest { base_branch } => when
                .pull_request
                .as_ref()
                .is_some_and(|branches| branches.to_vec().iter().any(|b| b == base_branch)),
            TriggerEvent::Manual => false,
        }
    }
}

/// Cross-cell execution strategy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Strategy {
    /// When true, the first failing cell marks all later cells skipped.
    /// Disabled by default: every cell is observed regardless of siblings.
    #[serde(default)]
    pub fail_fast: bool,
}

/// Trigger condition: which events, against which branches, select the
/// workflow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TriggerCondition {
    /// Branches whose pushes trigger the workflow.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push: Option<StringOrVec>,

    /// Target branches whose pull requests trigger the workflow.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<StringOrVec>,
}

/// The event a run was resolved from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerEvent {
    /// A push to a branch.
    Push {
        /// The pushed branch name.
        branch: String,
    },
    /// A pull request targeting a branch.
    PullRequest {
        /// The target branch name.
        base_branch: String,
    },
    /// A manual invocation (local run without a recognized CI event).
    Manual,
}

impl TriggerEvent {
    /// Event kind as a lowercase string for contexts and reports.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            TriggerEvent::Push { .. } => "push",
            TriggerEvent::PullRequest { .. } => "pull_request",
            TriggerEvent::Manual => "manual",
        }
    }

    /// The branch the event concerns, if any.
    #[must_use]
    pub fn branch(&self) -> Option<&str> {
        match self {
            TriggerEvent::Push { branch } => Some(branch),
            TriggerEvent::PullRequest { base_branch } => Some(base_branch),
            TriggerEvent::Manual => None,
        }
    }
}

/// A single string or a list of strings, accepted interchangeably in
/// workflow files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum StringOrVec {
    /// A single value.
    String(String),
    /// A list of values.
    Vec(Vec<String>),
}

impl StringOrVec {
    /// Convert to a vector of strings
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            StringOrVec::String(s) => vec![s.clone()],
            StringOrVec::Vec(v) => v.clone(),
        }
    }

    /// Get as a single string (first element if vec)
    #[must_use]
    pub fn as_single(&self) -> Option<&str> {
        match self {
            StringOrVec::String(s) => Some(s),
            StringOrVec::Vec(v) => v.first().map(String::as_str),
        }
    }
}
