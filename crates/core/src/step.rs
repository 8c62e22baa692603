//! Step and guard definitions.

use crate::matrix::Cell;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An ordered, named command group within a workflow.
///
/// Steps execute strictly in declared order within a cell. A step either
/// runs unconditionally or carries an `onlyIf` guard restricting it to a
/// subset of cells.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Unique step identifier (e.g., "install-requirements").
    pub id: String,

    /// Human-readable display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Command as argv. In shell mode the elements are joined and run under
    /// the shell; otherwise the first element is the program.
    pub run: Vec<String>,

    /// Wrap the command in a shell.
    #[serde(default)]
    pub shell: bool,

    /// Environment variables injected for this step.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub env: HashMap<String, String>,

    /// Directory the command runs in, relative to the workspace root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,

    /// Guard predicate: the step runs only in cells it matches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_if: Option<Guard>,

    /// Optional wall-clock limit; exceeding it fails the step.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Step {
    /// Display name, falling back to the id.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Whether this step runs in the given cell.
    #[must_use]
    pub fn runs_in(&self, cell: &Cell) -> bool {
        self.only_if.as_ref().is_none_or(|guard| guard.matches(cell))
    }
}

/// Condition restricting a step to a subset of cells, keyed on one axis.
///
/// All specified predicates must hold (AND logic). A guard over an axis the
/// cell does not carry never matches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Guard {
    /// Axis the predicates apply to (e.g., "os").
    pub axis: String,

    /// Matches when the axis value starts with this prefix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_with: Option<String>,

    /// Matches when the axis value equals this string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equals: Option<String>,
}

impl Guard {
    /// Evaluate the guard against a cell's axis values.
    #[must_use]
    pub fn matches(&self, cell: &Cell) -> bool {
        let Some(value) = cell.get(&self.axis) else {
            return false;
        };

        if let Some(prefix) = &self.starts_with
            && !value.starts_with(prefix.as_str())
        {
            return false;
        }
        if let Some(expected) = &self.equals
            && value != expected
        {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_step(id: &str, only_if: Option<Guard>) -> Step {
        Step {
            id: id.to_string(),
            name: None,
            run: vec!["echo".to_string()],
            shell: false,
            env: HashMap::new(),
            working_dir: None,
            only_if,
            timeout_secs: None,
        }
    }

    fn ubuntu_cell() -> Cell {
        Cell::from_pairs([("os", "ubuntu-latest"), ("python", "3.9")])
    }

    fn windows_cell() -> Cell {
        Cell::from_pairs([("os", "windows-latest"), ("python", "3.9")])
    }

    #[test]
    fn test_unguarded_step_runs_everywhere() {
        let step = make_step("checkout", None);
        assert!(step.runs_in(&ubuntu_cell()));
        assert!(step.runs_in(&windows_cell()));
    }

    #[test]
    fn test_starts_with_guard() {
        let guard = Guard {
            axis: "os".to_string(),
            starts_with: Some("ubuntu".to_string()),
            equals: None,
        };
        let step = make_step("install-neuron", Some(guard));
        assert!(step.runs_in(&ubuntu_cell()));
        assert!(!step.runs_in(&windows_cell()));
    }

    #[test]
    fn test_equals_guard() {
        let guard = Guard {
            axis: "python".to_string(),
            starts_with: None,
            equals: Some("3.9".to_string()),
        };
        let step = make_step("only-39", Some(guard));
        assert!(step.runs_in(&ubuntu_cell()));
        assert!(!step.runs_in(&Cell::from_pairs([("python", "3.8")])));
    }

    #[test]
    fn test_guard_on_missing_axis_never_matches() {
        let guard = Guard {
            axis: "arch".to_string(),
            starts_with: Some("x86".to_string()),
            equals: None,
        };
        assert!(!guard.matches(&ubuntu_cell()));
    }

    #[test]
    fn test_guard_combines_predicates() {
        let guard = Guard {
            axis: "os".to_string(),
            starts_with: Some("ubuntu".to_string()),
            equals: Some("ubuntu-latest".to_string()),
        };
        assert!(guard.matches(&ubuntu_cell()));
        assert!(!guard.matches(&Cell::from_pairs([("os", "ubuntu-22.04")])));
    }

    #[test]
    fn test_step_yaml_round_trip() {
        let yaml = r"
id: install-neuron
name: Install NEURON
run: [python, -m, pip, install, neuron]
onlyIf:
  axis: os
  startsWith: ubuntu
";
        let step: Step = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(step.id, "install-neuron");
        assert_eq!(step.display_name(), "Install NEURON");
        assert_eq!(step.run.len(), 5);
        assert!(!step.shell);
        let guard = step.only_if.as_ref().unwrap();
        assert_eq!(guard.axis, "os");
        assert_eq!(guard.starts_with.as_deref(), Some("ubuntu"));
    }

    #[test]
    fn test_display_name_falls_back_to_id() {
        let step = make_step("checkout", None);
        assert_eq!(step.display_name(), "checkout");
    }
}
