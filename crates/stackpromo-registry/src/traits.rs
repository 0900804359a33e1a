use crate::error::RegistryResult;
use crate::query::ImageQuery;

/// Read access to an image registry.
///
/// Implementations return the raw candidate names in whatever order the
/// registry produced them; ordering and validation are the resolver's job.
pub trait RegistryClient: Send + Sync {
    /// Names of all images matching `query`. An empty result is not an error.
    fn image_names(&self, query: &ImageQuery) -> RegistryResult<Vec<String>>;
}

impl<T: RegistryClient + ?Sized> RegistryClient for &T {
    fn image_names(&self, query: &ImageQuery) -> RegistryResult<Vec<String>> {
        (**self).image_names(query)
    }
}

impl<T: RegistryClient + ?Sized> RegistryClient for Box<T> {
    fn image_names(&self, query: &ImageQuery) -> RegistryResult<Vec<String>> {
        (**self).image_names(query)
    }
}
