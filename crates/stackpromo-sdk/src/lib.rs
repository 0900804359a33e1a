//! High-level API for stack promotion reports.
//!
//! Wires the resolver, metadata fetcher, diff engine and report writer into
//! one sequential pipeline. This is the main entry point for the CLI and for
//! anything embedding the report generation.

pub mod error;
pub mod promoter;

pub use error::{SdkError, SdkResult};
pub use promoter::{ConfiguredPromoter, PromotionOutcome, Promoter, ResolvedImages};

// Re-export key types
pub use stackpromo_types::{ImageName, MetadataFile, PromotionConfig, Side, StackPromotion};
pub use stackpromo_metadata::MetadataBundle;
pub use stackpromo_diff::{DiffArtifact, DiffOutcome, EnvChange, EnvDiff};
pub use stackpromo_report::{Report, ReportIndex};
