//! Core types for cellrun: workflow definitions, matrix expansion, and
//! validation.

use thiserror::Error;

pub mod matrix;
pub mod step;
pub mod validation;
pub mod workflow;

pub use matrix::{Cell, Matrix};
pub use step::{Guard, Step};
pub use workflow::{StringOrVec, TriggerCondition, TriggerEvent, Workflow};

/// Crate version, stamped into reports.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Main error type for cellrun operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Workflow error: {0}")]
    Workflow(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Timeout after {seconds} seconds")]
    Timeout { seconds: u64 },
}

impl Error {
    pub fn workflow(msg: impl Into<String>) -> Self {
        Error::Workflow(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }
}

/// Result type alias for cellrun operations
pub type Result<T> = std::result::Result<T, Error>;
