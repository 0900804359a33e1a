use serde::Serialize;
use stackpromo_metadata::MetadataBundle;

use crate::error::{ReportError, ReportResult};

pub const PACKER_TEMPLATES_COMPARE_BASE: &str = "https://github.com/travis-ci/packer-templates/compare";
pub const TRAVIS_COOKBOOKS_COMPARE_BASE: &str = "https://github.com/travis-ci/travis-cookbooks/compare";

/// Env var carrying the packer-templates commit an image was built from.
pub const PACKER_TEMPLATES_SHA_KEY: &str = "PACKER_TEMPLATES_SHA";
/// Env var carrying the travis-cookbooks commit an image was built from.
pub const TRAVIS_COOKBOOKS_SHA_KEY: &str = "TRAVIS_COOKBOOKS_SHA";

/// `<base>/<old>...<new>`.
pub fn compare_url(base: &str, old: &str, new: &str) -> String {
    format!("{}/{}...{}", base.trim_end_matches('/'), old, new)
}

/// Compare views of the two upstream repositories between the commits the
/// current and next images were built from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CompareUrls {
    pub packer_templates: String,
    pub travis_cookbooks: String,
}

impl CompareUrls {
    pub fn from_bundles(current: &MetadataBundle, next: &MetadataBundle) -> ReportResult<Self> {
        Ok(Self {
            packer_templates: compare_url(
                PACKER_TEMPLATES_COMPARE_BASE,
                sha(current, PACKER_TEMPLATES_SHA_KEY)?,
                sha(next, PACKER_TEMPLATES_SHA_KEY)?,
            ),
            travis_cookbooks: compare_url(
                TRAVIS_COOKBOOKS_COMPARE_BASE,
                sha(current, TRAVIS_COOKBOOKS_SHA_KEY)?,
                sha(next, TRAVIS_COOKBOOKS_SHA_KEY)?,
            ),
        })
    }
}

fn sha<'a>(bundle: &'a MetadataBundle, key: &'static str) -> ReportResult<&'a str> {
    bundle.env_var(key).ok_or_else(|| ReportError::MissingSha {
        image: bundle.image().clone(),
        key,
    })
}
