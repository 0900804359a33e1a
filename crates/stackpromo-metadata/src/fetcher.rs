use stackpromo_types::ImageName;
use tracing::{error, info};

use crate::bundle::MetadataBundle;
use crate::error::FetchResult;
use crate::source::ArchiveSource;

/// Retrieves and loads metadata bundles from an [`ArchiveSource`].
pub struct MetadataFetcher<S> {
    source: S,
}

impl<S: ArchiveSource> MetadataFetcher<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Retrieve, extract and parse the metadata of `image`.
    pub fn fetch(&self, image: &ImageName) -> FetchResult<MetadataBundle> {
        let archive = self.source.archive_path(image)?;
        let bundle = MetadataBundle::load(image.clone(), &archive)?;
        info!(%bundle, "loaded metadata");
        Ok(bundle)
    }

    /// Like [`fetch`](Self::fetch), but reports failure as an absent bundle
    /// after logging it.
    pub fn fetch_or_none(&self, image: &ImageName) -> Option<MetadataBundle> {
        match self.fetch(image) {
            Ok(bundle) => Some(bundle),
            Err(e) => {
                error!(image = %image, error = %e, "failed to fetch metadata");
                None
            }
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::DirectoryArchiveSource;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::fs::File;

    #[test]
    fn fetch_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = File::create(dir.path().join("img-1.tar.gz")).unwrap();
        let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
        let body = b"A=1\n";
        let mut header = tar::Header::new_gnu();
        header.set_size(body.len() as u64);
        header.set_mode(0o644);
        builder.append_data(&mut header, "env", &body[..]).unwrap();
        builder.into_inner().unwrap().finish().unwrap();

        let fetcher = MetadataFetcher::new(DirectoryArchiveSource::new(dir.path()));
        let bundle = fetcher.fetch(&ImageName::new("img-1").unwrap()).unwrap();
        assert_eq!(bundle.env_var("A"), Some("1"));
    }

    #[test]
    fn missing_archive_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = MetadataFetcher::new(DirectoryArchiveSource::new(dir.path()));
        assert!(fetcher.fetch_or_none(&ImageName::new("img-9").unwrap()).is_none());
    }
}
