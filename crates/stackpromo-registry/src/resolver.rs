use stackpromo_types::{ImageName, PromotionConfig};
use tracing::{debug, warn};

use crate::error::{RegistryError, RegistryResult};
use crate::query::ImageQuery;
use crate::traits::RegistryClient;

/// Resolves `(stack, group)` to the most recent image tagged for that group.
pub struct ImageResolver<C> {
    client: C,
    prefix: String,
    infra: String,
}

impl<C: RegistryClient> ImageResolver<C> {
    pub fn new(client: C, config: &PromotionConfig) -> Self {
        Self {
            client,
            prefix: config.image_prefix.clone(),
            infra: config.infra.clone(),
        }
    }

    pub fn query(&self, stack: &str, group: &str) -> ImageQuery {
        ImageQuery::new(&self.prefix, stack, &self.infra, group)
    }

    /// The lexicographically last image name matching the query.
    ///
    /// Candidates that are not valid image names are skipped. An empty
    /// candidate set is [`RegistryError::NotFound`].
    pub fn resolve(&self, stack: &str, group: &str) -> RegistryResult<ImageName> {
        let query = self.query(stack, group);
        let names = self.client.image_names(&query)?;
        debug!(stack, group, candidates = names.len(), "registry answered");

        names
            .into_iter()
            .filter_map(|name| match ImageName::new(name) {
                Ok(image) => Some(image),
                Err(e) => {
                    warn!(stack, group, error = %e, "skipping invalid image name");
                    None
                }
            })
            .max()
            .ok_or_else(|| RegistryError::NotFound {
                stack: stack.to_string(),
                group: group.to_string(),
            })
    }

    pub fn client(&self) -> &C {
        &self.client
    }
}
