//! Error types for the diff crate.

use std::path::PathBuf;

/// Errors that can occur during diff operations.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// A file that must be normalized is not valid JSON.
    #[error("cannot parse {path} as JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The external diff executable could not be started.
    #[error("failed to run {exe}: {source}")]
    Spawn {
        exe: String,
        #[source]
        source: std::io::Error,
    },

    /// The external diff executable reported trouble (exit status above 1).
    #[error("{exe} failed ({status}): {stderr}")]
    Tool {
        exe: String,
        status: String,
        stderr: String,
    },

    /// I/O error reading inputs or writing artifacts.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
