use std::sync::RwLock;

use crate::error::RegistryResult;
use crate::query::ImageQuery;
use crate::traits::RegistryClient;

/// One image known to an [`InMemoryRegistry`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisteredImage {
    pub name: String,
    pub infra: String,
    /// Full tags, e.g. `group_stable:true`.
    pub tags: Vec<String>,
}

/// In-memory registry that evaluates queries against registered images.
///
/// Intended for tests. Names are matched on the literal `<prefix>-<stack>`
/// prefix the registry's name pattern anchors on, and results come back in
/// registration order so callers cannot rely on the registry sorting for
/// them.
pub struct InMemoryRegistry {
    images: RwLock<Vec<RegisteredImage>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self {
            images: RwLock::new(Vec::new()),
        }
    }

    /// Register an image tagged `group_<group>:true` for each of `groups`.
    pub fn register(&self, name: &str, infra: &str, groups: &[&str]) {
        let image = RegisteredImage {
            name: name.to_string(),
            infra: infra.to_string(),
            tags: groups.iter().map(|g| format!("group_{g}:true")).collect(),
        };
        self.images.write().expect("lock poisoned").push(image);
    }

    pub fn len(&self) -> usize {
        self.images.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.read().expect("lock poisoned").is_empty()
    }
}

impl Default for InMemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryClient for InMemoryRegistry {
    fn image_names(&self, query: &ImageQuery) -> RegistryResult<Vec<String>> {
        let prefix = query.name_prefix();
        let tag = query.tag();
        let images = self.images.read().expect("lock poisoned");
        Ok(images
            .iter()
            .filter(|img| img.name.starts_with(&prefix))
            .filter(|img| img.infra == query.infra)
            .filter(|img| img.tags.iter().any(|t| *t == tag))
            .map(|img| img.name.clone())
            .collect())
    }
}
