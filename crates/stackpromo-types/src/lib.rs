//! Foundation types for stack promotion reports.
//!
//! Every other `stackpromo` crate depends on `stackpromo-types`.
//!
//! # Key Types
//!
//! - [`ImageName`]: Validated name of a published machine image
//! - [`StackPromotion`]: Immutable request: stack plus current/next groups
//! - [`Side`]: Which half of a comparison something belongs to
//! - [`MetadataFile`]: The fixed set of metadata files that get diffed
//! - [`PromotionConfig`]: Explicit configuration with documented keys and defaults

pub mod config;
pub mod error;
pub mod image;
pub mod metadata_file;
pub mod promotion;

pub use config::PromotionConfig;
pub use error::TypeError;
pub use image::ImageName;
pub use metadata_file::MetadataFile;
pub use promotion::{Side, StackPromotion};
