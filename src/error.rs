//! Error types for quadro
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad input, unknown task, rejected import)
//! - 4: Operation failed (I/O, serialization, lock contention)

use std::path::PathBuf;

use thiserror::Error;

use crate::task::TaskId;

/// Exit codes for the quadro CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for board operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Task description cannot be empty")]
    EmptyDescription,

    #[error("Task description exceeds {limit} characters")]
    DescriptionTooLong { limit: usize },

    #[error("Invalid status '{0}': must be todo, progress, or done")]
    InvalidStatus(String),

    #[error("Invalid level '{0}': must be baixa, normal, or urgente")]
    InvalidLevel(String),

    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("Position {index} is out of range for a board of {len} task(s)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Import rejected: {0}")]
    MalformedImport(String),

    #[error("Drop target has no column status")]
    MissingDropTarget,

    #[error("No drag gesture in progress")]
    NoActiveGesture,

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),

    #[error("No data directory available for snapshots")]
    DataDirUnavailable,

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::EmptyDescription
            | Error::DescriptionTooLong { .. }
            | Error::InvalidStatus(_)
            | Error::InvalidLevel(_)
            | Error::TaskNotFound(_)
            | Error::IndexOutOfRange { .. }
            | Error::InvalidConfig(_)
            | Error::MalformedImport(_)
            | Error::MissingDropTarget
            | Error::NoActiveGesture => exit_codes::USER_ERROR,

            // Operation failures
            Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::LockFailed(_)
            | Error::DataDirUnavailable
            | Error::OperationFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Structured details for JSON error output, where a variant has any
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::IndexOutOfRange { index, len } => {
                Some(serde_json::json!({ "index": index, "len": len }))
            }
            Error::DescriptionTooLong { limit } => Some(serde_json::json!({ "limit": limit })),
            _ => None,
        }
    }
}

/// Result type alias for board operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            error: err.to_string(),
            code: err.exit_code(),
            details: err.details(),
        }
    }
}
