//! Image metadata bundles.
//!
//! Every published image has a gzip'd tarball describing how it was built:
//! package manifests, provisioner attributes, system info, verification test
//! results and an environment definition. This crate retrieves that archive
//! (from a local directory or a download cache), extracts it into private
//! temporary storage and exposes it as a [`MetadataBundle`].
//!
//! # Archive Sources
//!
//! All sources implement the [`ArchiveSource`] trait:
//!
//! - [`DirectoryArchiveSource`] -- archives already on local disk
//! - [`CachedArchiveSource`] -- download cache backed by the configured HTTP executable

pub mod bundle;
pub mod env;
pub mod error;
pub mod fetcher;
pub mod source;

pub use bundle::MetadataBundle;
pub use env::{parse_env_dir, parse_env_file, EnvMap};
pub use error::{FetchError, FetchResult};
pub use fetcher::MetadataFetcher;
pub use source::{ArchiveSource, CachedArchiveSource, DirectoryArchiveSource};
