use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Image registry endpoint queried by the resolver.
pub const ENV_IMAGES_URL: &str = "JOB_BOARD_IMAGES_URL";
/// HTTP client executable used for registry queries and archive downloads.
pub const ENV_CURL_EXE: &str = "CURL_EXE";
/// Prefix shared by all image names.
pub const ENV_IMAGE_PREFIX: &str = "IMAGE_NAME_PREFIX";
/// Infrastructure filter passed to the registry.
pub const ENV_INFRA: &str = "IMAGE_INFRA";
/// Base URL metadata archives are downloaded from.
pub const ENV_METADATA_URL: &str = "IMAGE_METADATA_URL";
/// Local directory holding downloaded metadata archives.
pub const ENV_METADATA_CACHE_DIR: &str = "IMAGE_METADATA_CACHE_DIR";
/// External `diff` executable, or [`BUILTIN_DIFFER`] for in-process diffs.
pub const ENV_DIFF_EXE: &str = "DIFF_EXE";

/// `DIFF_EXE` value selecting the in-process differ instead of an executable.
pub const BUILTIN_DIFFER: &str = "builtin";

/// Configuration for one promotion run.
///
/// Resolved once (defaults, then an optional TOML file, then environment
/// variables) and handed to the resolver, fetcher and differ at
/// construction. Nothing in the pipeline reads the process environment
/// directly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromotionConfig {
    /// `JOB_BOARD_IMAGES_URL`; required for resolving images.
    pub images_url: Option<String>,
    /// `CURL_EXE`, default `curl`.
    pub curl_exe: String,
    /// `IMAGE_NAME_PREFIX`, default `travis-ci`.
    pub image_prefix: String,
    /// `IMAGE_INFRA`, default `gce`.
    pub infra: String,
    /// `IMAGE_METADATA_URL`; when unset only cached archives are used.
    pub metadata_url: Option<String>,
    /// `IMAGE_METADATA_CACHE_DIR`, default `<tmp>/stackpromo-metadata`.
    pub metadata_cache_dir: PathBuf,
    /// `DIFF_EXE`, default `diff`. [`BUILTIN_DIFFER`] selects the in-process
    /// differ.
    pub diff_exe: String,
}

impl Default for PromotionConfig {
    fn default() -> Self {
        Self {
            images_url: None,
            curl_exe: "curl".into(),
            image_prefix: "travis-ci".into(),
            infra: "gce".into(),
            metadata_url: None,
            metadata_cache_dir: std::env::temp_dir().join("stackpromo-metadata"),
            diff_exe: "diff".into(),
        }
    }
}

impl PromotionConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::default().with_overrides(lookup)
    }

    /// Load a TOML file. Missing keys keep their defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self, TypeError> {
        let raw = std::fs::read_to_string(path).map_err(|source| TypeError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| TypeError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply overrides from `lookup` on top of `self`. Empty values count as
    /// unset.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(v) = get(ENV_IMAGES_URL) {
            self.images_url = Some(v);
        }
        if let Some(v) = get(ENV_CURL_EXE) {
            self.curl_exe = v;
        }
        if let Some(v) = get(ENV_IMAGE_PREFIX) {
            self.image_prefix = v;
        }
        if let Some(v) = get(ENV_INFRA) {
            self.infra = v;
        }
        if let Some(v) = get(ENV_METADATA_URL) {
            self.metadata_url = Some(v);
        }
        if let Some(v) = get(ENV_METADATA_CACHE_DIR) {
            self.metadata_cache_dir = PathBuf::from(v);
        }
        if let Some(v) = get(ENV_DIFF_EXE) {
            self.diff_exe = v;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config() {
        let c = PromotionConfig::default();
        assert_eq!(c.curl_exe, "curl");
        assert_eq!(c.image_prefix, "travis-ci");
        assert_eq!(c.infra, "gce");
        assert!(c.images_url.is_none());
        assert!(c.metadata_url.is_none());
        assert_eq!(c.diff_exe, "diff");
    }

    #[test]
    fn lookup_overrides_defaults() {
        let c = PromotionConfig::from_lookup(lookup(&[
            (ENV_IMAGES_URL, "https://job-board.example/images"),
            (ENV_CURL_EXE, "/usr/local/bin/curl"),
            (ENV_METADATA_CACHE_DIR, "/var/cache/promo"),
        ]));
        assert_eq!(c.images_url.as_deref(), Some("https://job-board.example/images"));
        assert_eq!(c.curl_exe, "/usr/local/bin/curl");
        assert_eq!(c.metadata_cache_dir, PathBuf::from("/var/cache/promo"));
        assert_eq!(c.infra, "gce");
    }

    #[test]
    fn empty_values_fall_back() {
        let c = PromotionConfig::from_lookup(lookup(&[(ENV_CURL_EXE, "")]));
        assert_eq!(c.curl_exe, "curl");
    }

    #[test]
    fn toml_file_then_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("promo.toml");
        std::fs::write(&path, "infra = \"ec2\"\nimages_url = \"http://file/images\"\n").unwrap();

        let c = PromotionConfig::from_toml_file(&path)
            .unwrap()
            .with_overrides(lookup(&[(ENV_IMAGES_URL, "http://env/images")]));
        assert_eq!(c.infra, "ec2");
        assert_eq!(c.images_url.as_deref(), Some("http://env/images"));
        assert_eq!(c.curl_exe, "curl");
    }

    #[test]
    fn missing_toml_file_is_an_error() {
        let err =
            PromotionConfig::from_toml_file(Path::new("/nonexistent/promo.toml")).unwrap_err();
        assert!(matches!(err, TypeError::ConfigRead { .. }));
    }
}
