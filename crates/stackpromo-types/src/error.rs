use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by type construction and configuration loading.
#[derive(Debug, Error)]
pub enum TypeError {
    #[error("image name must not be empty")]
    EmptyImageName,

    #[error("invalid character {ch:?} in image name {name:?}")]
    InvalidImageName { name: String, ch: char },

    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
