//! Workflow validation.
//!
//! Checks a parsed workflow for structural problems before any cell runs.

use crate::workflow::Workflow;
use std::collections::HashSet;
use thiserror::Error;

/// Validation errors for workflow documents
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Matrix declares no axes")]
    EmptyMatrix,

    #[error("Axis '{axis}' has no values")]
    EmptyAxis { axis: String },

    #[error("Duplicate step id '{id}'")]
    DuplicateStepId { id: String },

    #[error("Step '{step}' has empty command")]
    EmptyCommand { step: String },

    #[error("Step '{step}' guard references undeclared axis '{axis}'")]
    UnknownGuardAxis { step: String, axis: String },

    #[error("Step '{step}' guard declares no predicate")]
    EmptyGuard { step: String },

    #[error("Matrix exclusion references undeclared axis '{axis}'")]
    UnknownExcludeAxis { axis: String },

    #[error("Workflow declares no steps")]
    NoSteps,
}

/// Validator for workflow documents
pub struct WorkflowValidator<'a> {
    workflow: &'a Workflow,
}

impl<'a> WorkflowValidator<'a> {
    /// Create a new validator for the given workflow
    #[must_use]
    pub fn new(workflow: &'a Workflow) -> Self {
        Self { workflow }
    }

    /// Validate the entire workflow document
    ///
    /// # Errors
    /// Returns every problem found, not just the first.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.workflow.matrix.axes.is_empty() {
            errors.push(ValidationError::EmptyMatrix);
        }
        for (axis, values) in &self.workflow.matrix.axes {
            if values.is_empty() {
                errors.push(ValidationError::EmptyAxis { axis: axis.clone() });
            }
        }

        let declared_axes: HashSet<&str> = self
            .workflow
            .matrix
            .axes
            .keys()
            .map(String::as_str)
            .collect();

        for entry in &self.workflow.matrix.exclude {
            for axis in entry.keys() {
                if !declared_axes.contains(axis.as_str()) {
                    errors.push(ValidationError::UnknownExcludeAxis { axis: axis.clone() });
                }
            }
        }

        if self.workflow.steps.is_empty() {
            errors.push(ValidationError::NoSteps);
        }

        let mut seen_ids: HashSet<&str> = HashSet::new();
        for step in &self.workflow.steps {
            if !seen_ids.insert(step.id.as_str()) {
                errors.push(ValidationError::DuplicateStepId {
                    id: step.id.clone(),
                });
            }

            if step.run.is_empty() {
                errors.push(ValidationError::EmptyCommand {
                    step: step.id.clone(),
                });
            }

            if let Some(guard) = &step.only_if {
                if !declared_axes.contains(guard.axis.as_str()) {
                    errors.push(ValidationError::UnknownGuardAxis {
                        step: step.id.clone(),
                        axis: guard.axis.clone(),
                    });
                }
                if guard.starts_with.is_none() && guard.equals.is_none() {
                    errors.push(ValidationError::EmptyGuard {
                        step: step.id.clone(),
                    });
                }
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
