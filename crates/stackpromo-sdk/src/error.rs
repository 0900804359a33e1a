use stackpromo_types::Side;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("resolving the {side} image failed: {source}")]
    Resolve {
        side: Side,
        #[source]
        source: stackpromo_registry::RegistryError,
    },

    #[error("missing metadata for {}", sides_list(.sides))]
    MissingBundle { sides: Vec<Side> },

    #[error("registry error: {0}")]
    Registry(#[from] stackpromo_registry::RegistryError),

    #[error("metadata error: {0}")]
    Fetch(#[from] stackpromo_metadata::FetchError),

    #[error("diff error: {0}")]
    Diff(#[from] stackpromo_diff::DiffError),

    #[error("report error: {0}")]
    Report(#[from] stackpromo_report::ReportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn sides_list(sides: &[Side]) -> String {
    sides
        .iter()
        .map(|s| format!("{s} image"))
        .collect::<Vec<_>>()
        .join(" and ")
}

pub type SdkResult<T> = Result<T, SdkError>;
