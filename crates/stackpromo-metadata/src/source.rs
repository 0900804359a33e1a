//! Where metadata archives come from.

use std::path::{Path, PathBuf};
use std::process::Command;

use stackpromo_types::{ImageName, PromotionConfig};
use tracing::{debug, info};

use crate::error::{FetchError, FetchResult};

/// Produces the local path of an image's metadata archive.
pub trait ArchiveSource: Send + Sync {
    /// Path of a readable `<image>.tar.gz`, retrieving it first if needed.
    fn archive_path(&self, image: &ImageName) -> FetchResult<PathBuf>;
}

impl<T: ArchiveSource + ?Sized> ArchiveSource for &T {
    fn archive_path(&self, image: &ImageName) -> FetchResult<PathBuf> {
        (**self).archive_path(image)
    }
}

impl<T: ArchiveSource + ?Sized> ArchiveSource for Box<T> {
    fn archive_path(&self, image: &ImageName) -> FetchResult<PathBuf> {
        (**self).archive_path(image)
    }
}

/// Archives already present in a local directory.
#[derive(Clone, Debug)]
pub struct DirectoryArchiveSource {
    dir: PathBuf,
}

impl DirectoryArchiveSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ArchiveSource for DirectoryArchiveSource {
    fn archive_path(&self, image: &ImageName) -> FetchResult<PathBuf> {
        let path = self.dir.join(image.archive_file_name());
        if path.is_file() {
            Ok(path)
        } else {
            Err(FetchError::ArchiveNotFound {
                image: image.clone(),
                location: self.dir.display().to_string(),
            })
        }
    }
}

/// Download cache for archives published under a base URL.
///
/// A cached archive is returned without touching the network. On a miss the
/// archive is downloaded with `<curl> -f -s -o <tmp> <base>/<image>.tar.gz`
/// into a temporary file inside the cache directory and renamed into place
/// only once the download succeeded, so a failed download never leaves a
/// truncated archive behind.
#[derive(Clone, Debug)]
pub struct CachedArchiveSource {
    cache_dir: PathBuf,
    curl_exe: String,
    base_url: Option<String>,
}

impl CachedArchiveSource {
    pub fn new(
        cache_dir: impl Into<PathBuf>,
        curl_exe: impl Into<String>,
        base_url: Option<String>,
    ) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            curl_exe: curl_exe.into(),
            base_url,
        }
    }

    pub fn from_config(config: &PromotionConfig) -> Self {
        Self::new(
            config.metadata_cache_dir.clone(),
            config.curl_exe.clone(),
            config.metadata_url.clone(),
        )
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Where the archive for `image` lives once cached.
    pub fn cached_path(&self, image: &ImageName) -> PathBuf {
        self.cache_dir.join(image.archive_file_name())
    }

    fn download(&self, base_url: &str, image: &ImageName, dest: &Path) -> FetchResult<()> {
        std::fs::create_dir_all(&self.cache_dir)?;
        let tmp = tempfile::Builder::new()
            .prefix(".download-")
            .tempfile_in(&self.cache_dir)?;

        let url = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            image.archive_file_name()
        );
        debug!(exe = %self.curl_exe, %url, "downloading metadata archive");

        let output = Command::new(&self.curl_exe)
            .arg("-f")
            .arg("-s")
            .arg("-o")
            .arg(tmp.path())
            .arg(&url)
            .output()
            .map_err(|source| FetchError::Spawn {
                exe: self.curl_exe.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(FetchError::Download {
                image: image.clone(),
                exe: self.curl_exe.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        tmp.persist(dest).map_err(|e| FetchError::Io(e.error))?;
        info!(image = %image, path = %dest.display(), "cached metadata archive");
        Ok(())
    }
}

impl ArchiveSource for CachedArchiveSource {
    fn archive_path(&self, image: &ImageName) -> FetchResult<PathBuf> {
        let cached = self.cached_path(image);
        if cached.is_file() {
            debug!(image = %image, path = %cached.display(), "metadata cache hit");
            return Ok(cached);
        }

        let base_url = self
            .base_url
            .as_deref()
            .ok_or_else(|| FetchError::ArchiveNotFound {
                image: image.clone(),
                location: self.cache_dir.display().to_string(),
            })?;
        self.download(base_url, image, &cached)?;
        Ok(cached)
    }
}
