//! Registry query construction.

use serde::Serialize;
use url::form_urlencoded;
use url::Url;

use crate::error::{RegistryError, RegistryResult};

/// A query for images of one stack carrying one group tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImageQuery {
    /// Prefix shared by all image names (e.g. `travis-ci`).
    pub prefix: String,
    pub stack: String,
    /// Infrastructure filter (e.g. `gce`).
    pub infra: String,
    pub group: String,
}

impl ImageQuery {
    pub fn new(
        prefix: impl Into<String>,
        stack: impl Into<String>,
        infra: impl Into<String>,
        group: impl Into<String>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            stack: stack.into(),
            infra: infra.into(),
            group: group.into(),
        }
    }

    /// Name pattern sent to the registry: `^<prefix>-<stack>.*`.
    pub fn name_pattern(&self) -> String {
        format!("^{}-{}.*", self.prefix, self.stack)
    }

    /// Literal name prefix the pattern anchors on.
    pub fn name_prefix(&self) -> String {
        format!("{}-{}", self.prefix, self.stack)
    }

    /// Tag filter: `group_<group>:true`.
    pub fn tag(&self) -> String {
        format!("group_{}:true", self.group)
    }

    /// Query parameters in request order.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name_pattern()),
            ("infra", self.infra.clone()),
            ("tags", self.tag()),
            ("fields[images]", "name".to_string()),
        ]
    }

    /// Form-encoded query string, without the leading `?`.
    pub fn query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params())
            .finish()
    }

    /// Full request URL against `base`. Parameters are appended to any query
    /// `base` already carries.
    pub fn url(&self, base: &str) -> RegistryResult<Url> {
        Url::parse_with_params(base, self.params()).map_err(|source| RegistryError::InvalidUrl {
            url: base.to_string(),
            source,
        })
    }
}
