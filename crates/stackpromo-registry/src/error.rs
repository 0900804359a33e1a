//! Error types for the registry crate.

/// Errors that can occur while querying the registry or resolving an image.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// No image matched the stack/group query.
    #[error("no image found for stack {stack:?} in group {group:?}")]
    NotFound { stack: String, group: String },

    /// `JOB_BOARD_IMAGES_URL` was not configured.
    #[error("image registry URL is not configured (set JOB_BOARD_IMAGES_URL)")]
    MissingImagesUrl,

    /// The configured registry URL cannot be parsed.
    #[error("invalid registry URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The HTTP executable could not be started.
    #[error("failed to run {exe}: {source}")]
    Spawn {
        exe: String,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP executable exited unsuccessfully.
    #[error("{exe} exited with {status}: {stderr}")]
    Http {
        exe: String,
        status: String,
        stderr: String,
    },

    /// The registry response was not the expected JSON document.
    #[error("invalid registry response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

/// Convenience alias for registry results.
pub type RegistryResult<T> = Result<T, RegistryError>;
