use stackpromo_types::ImageName;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    /// An image's env lacks a source commit needed for a compare URL.
    #[error("{image} env has no {key}")]
    MissingSha { image: ImageName, key: &'static str },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ReportResult<T> = Result<T, ReportError>;
