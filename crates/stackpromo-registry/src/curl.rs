//! Registry client backed by an external HTTP executable.

use std::process::Command;

use serde::Deserialize;
use stackpromo_types::PromotionConfig;
use tracing::debug;

use crate::error::{RegistryError, RegistryResult};
use crate::query::ImageQuery;
use crate::traits::RegistryClient;

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    data: Vec<ImageRecord>,
}

#[derive(Debug, Deserialize)]
struct ImageRecord {
    name: String,
}

/// Queries the registry by running `<curl> -f -s <url>?<query>`.
#[derive(Clone, Debug)]
pub struct CurlRegistryClient {
    curl_exe: String,
    images_url: String,
}

impl CurlRegistryClient {
    pub fn new(curl_exe: impl Into<String>, images_url: impl Into<String>) -> Self {
        Self {
            curl_exe: curl_exe.into(),
            images_url: images_url.into(),
        }
    }

    /// Build from configuration. Fails if no registry URL is configured.
    pub fn from_config(config: &PromotionConfig) -> RegistryResult<Self> {
        let images_url = config
            .images_url
            .clone()
            .ok_or(RegistryError::MissingImagesUrl)?;
        Ok(Self::new(config.curl_exe.clone(), images_url))
    }

    pub fn images_url(&self) -> &str {
        &self.images_url
    }
}

impl RegistryClient for CurlRegistryClient {
    fn image_names(&self, query: &ImageQuery) -> RegistryResult<Vec<String>> {
        let url = query.url(&self.images_url)?;
        debug!(exe = %self.curl_exe, %url, "querying image registry");

        let output = Command::new(&self.curl_exe)
            .args(["-f", "-s", url.as_str()])
            .output()
            .map_err(|source| RegistryError::Spawn {
                exe: self.curl_exe.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(RegistryError::Http {
                exe: self.curl_exe.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_response(&output.stdout)
    }
}

/// Extract image names from a registry response body.
pub fn parse_response(body: &[u8]) -> RegistryResult<Vec<String>> {
    let response: ImagesResponse = serde_json::from_slice(body)?;
    Ok(response.data.into_iter().map(|r| r.name).collect())
}
