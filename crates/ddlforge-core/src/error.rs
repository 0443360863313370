//! Error types for ddlforge

use thiserror::Error;

/// Engine-wide error type for schema-change operations
#[derive(Error, Debug)]
pub enum EditError {
    /// A command failed pre-generation validation. Validation runs before
    /// any DDL is rendered, so one invalid edit aborts the whole batch.
    #[error("Validation failed for {object}: {message}")]
    Validation { object: String, message: String },

    #[error("DDL generation error: {0}")]
    Generation(String),

    #[error("Execution error: {0}")]
    Execution(String),

    #[error("Not supported: {0}")]
    NotSupported(String),

    #[error("Not connected: {0}")]
    NotConnected(String),

    #[error("Cancelled")]
    Cancelled,

    #[error("{0}")]
    Other(String),
}

impl EditError {
    /// Shorthand for a validation error against a named object.
    pub fn validation(object: impl Into<String>, message: impl Into<String>) -> Self {
        EditError::Validation {
            object: object.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for ddlforge operations
pub type Result<T> = std::result::Result<T, EditError>;
