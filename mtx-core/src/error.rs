//! Error types for library changer operations.

use thiserror::Error;

/// Errors that can occur while driving a library changer.
#[derive(Error, Debug)]
pub enum MtxError {
    /// The changer program ran but reported failure.
    #[error("mtx failed ({status}): {stderr}")]
    Execution { status: String, stderr: String },

    /// Status text did not match the expected report format.
    #[error("status line {line}: {reason}")]
    Format { line: usize, reason: String },

    /// Malformed command invocation.
    #[error("Invalid argument: {0}")]
    Argument(String),

    /// A transfer precondition was violated.
    #[error("Unable to transfer volume: {0}")]
    Transfer(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MtxError {
    pub(crate) fn format(line: usize, reason: impl Into<String>) -> Self {
        MtxError::Format {
            line,
            reason: reason.into(),
        }
    }
}

/// Result type for changer operations.
pub type MtxResult<T> = Result<T, MtxError>;
