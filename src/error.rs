//! Error types for grading operations.
//!
//! Two layers of failure exist here:
//! - `ExecError`: structured faults from the measured command. These are
//!   caught and classified into a result record, never propagated.
//! - `GraderError`: faults of the grading run itself (setup command,
//!   input resolution, result publishing). These abort the invocation
//!   without producing a result record.

use std::time::Duration;

use thiserror::Error;

/// Structured fault from executing an external command.
///
/// The executor returns this instead of encoding failure in free text, so
/// the classifier can pattern-match on the fault kind rather than sniffing
/// strings. Raw text is only carried for faults the platform left opaque.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("command timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("unable to locate executable file: {command}")]
    NotFound { command: String },

    #[error("command exited with code {code}")]
    NonZeroExit { code: i32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that abort a grading run before a result can be published.
#[derive(Debug, Error)]
pub enum GraderError {
    #[error("setup command failed: {0}")]
    Setup(String),

    #[error("failed to publish result: {0}")]
    Publish(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
