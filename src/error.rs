//! Error types for homestead
//!
//! None of these are fatal. The repository logs and absorbs them on its
//! plain operations and only hands them back from the `try_*` forms.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for task persistence
#[derive(Error, Debug)]
pub enum Error {
    /// Remote credentials are missing or malformed. Detected once at startup.
    #[error("Remote store not configured: {0}")]
    Configuration(String),

    /// The remote backend could not be reached.
    #[error("Remote transport error: {0}")]
    RemoteTransport(#[from] reqwest::Error),

    /// The remote backend answered but rejected the request.
    #[error("Remote query failed ({status}): {message}")]
    RemoteQuery { status: u16, message: String },

    /// The local task file exists but could not be parsed.
    #[error("Local store at {path} is corrupt: {message}")]
    LocalCorruption { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid task: {0}")]
    InvalidTask(String),

    #[error("Diary entry is empty")]
    EmptyLog,
}

impl Error {
    /// Short stable class name, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Configuration(_) => "configuration",
            Error::RemoteTransport(_) => "remote_transport",
            Error::RemoteQuery { .. } => "remote_query",
            Error::LocalCorruption { .. } => "local_corruption",
            Error::Io(_) | Error::Json(_) => "local_io",
            Error::InvalidTask(_) | Error::EmptyLog => "invalid_input",
        }
    }

    /// Whether the failure happened on the way to or at the remote backend.
    pub fn is_remote(&self) -> bool {
        matches!(self, Error::RemoteTransport(_) | Error::RemoteQuery { .. })
    }
}

/// Result type alias for homestead operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_error_display() {
        let err = Error::RemoteQuery {
            status: 409,
            message: "duplicate key".into(),
        };
        assert_eq!(err.to_string(), "Remote query failed (409): duplicate key");
        assert_eq!(err.kind(), "remote_query");
        assert!(err.is_remote());
    }

    #[test]
    fn local_errors_are_not_remote() {
        let err = Error::InvalidTask("title must not be empty".into());
        assert!(!err.is_remote());
        assert_eq!(err.kind(), "invalid_input");
    }
}
