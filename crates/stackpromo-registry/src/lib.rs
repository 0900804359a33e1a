//! Image registry access for stack promotion reports.
//!
//! Finds the image currently tagged for a deployment group by querying the
//! image registry and picking the lexicographically last name. Image names
//! embed a monotonically increasing build identifier, so the last name is
//! taken to be the most recent build. That convention is load-bearing for
//! downstream consumers and is kept exactly as is.
//!
//! # Registry Backends
//!
//! All backends implement the [`RegistryClient`] trait:
//!
//! - [`CurlRegistryClient`] -- shells out to the configured HTTP executable
//! - [`InMemoryRegistry`] -- evaluates queries against registered records, for tests

pub mod curl;
pub mod error;
pub mod memory;
pub mod query;
pub mod resolver;
pub mod traits;

pub use curl::CurlRegistryClient;
pub use error::{RegistryError, RegistryResult};
pub use memory::{InMemoryRegistry, RegisteredImage};
pub use query::ImageQuery;
pub use resolver::ImageResolver;
pub use traits::RegistryClient;
