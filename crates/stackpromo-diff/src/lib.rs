//! Diff engine for stack promotion reports.
//!
//! Compares two metadata bundles file by file and writes labeled unified
//! diffs into an output directory, plus a diff of the two environments.
//!
//! # Key Types
//!
//! - [`DiffEngine`] -- produces the diff artifacts for a pair of bundles
//! - [`TextDiffer`] -- capability that writes a labeled unified diff of two files
//! - [`UnifiedDiffer`] / [`ExternalDiffer`] -- in-process and `diff -u` implementations
//! - [`EnvDiff`] / [`EnvChange`] -- key-level environment comparison
//! - [`DiffStats`] -- added/removed line counts of a unified diff

pub mod differ;
pub mod engine;
pub mod env_diff;
pub mod error;
pub mod normalize;
pub mod stats;

pub use differ::{differ_from_config, unified_diff, ExternalDiffer, TextDiffer, UnifiedDiffer};
pub use engine::{ArtifactKind, DiffArtifact, DiffEngine, DiffOutcome, ENV_DIFF_FILE};
pub use env_diff::{diff_env, render_env, EnvChange, EnvDiff};
pub use error::{DiffError, DiffResult};
pub use normalize::{normalize_rspec_results, sort_examples};
pub use stats::DiffStats;
