//! Error types for the metadata crate.

use std::path::PathBuf;

use stackpromo_types::ImageName;

/// Errors that can occur while retrieving or loading a metadata bundle.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// No archive exists for the image at the given location.
    #[error("no metadata archive for {image} at {location}")]
    ArchiveNotFound { image: ImageName, location: String },

    /// The download executable could not be started.
    #[error("failed to run {exe}: {source}")]
    Spawn {
        exe: String,
        #[source]
        source: std::io::Error,
    },

    /// The download executable exited unsuccessfully.
    #[error("downloading metadata for {image} with {exe} failed ({status}): {stderr}")]
    Download {
        image: ImageName,
        exe: String,
        status: String,
        stderr: String,
    },

    /// The archive could not be unpacked.
    #[error("failed to extract {archive}: {source}")]
    Extract {
        archive: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The archive carries no environment definition.
    #[error("metadata for {image} has no env definition")]
    MissingEnv { image: ImageName },

    /// The environment definition could not be parsed.
    #[error("invalid env definition for {image}: {source}")]
    InvalidEnv {
        image: ImageName,
        #[source]
        source: dotenvy::Error,
    },

    /// Walking the extracted tree failed.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// I/O error while reading or writing local files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for fetch results.
pub type FetchResult<T> = Result<T, FetchError>;
