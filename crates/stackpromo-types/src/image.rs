use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Name of a published machine image, e.g. `travis-ci-ubuntu-1604-1501234567`.
///
/// Image names are opaque to the pipeline but end up as path components
/// (`<image>.tar.gz`) and URL segments, so only ASCII alphanumerics, `.`,
/// `_` and `-` are accepted.
///
/// Ordering is plain lexicographic string ordering. The resolver relies on
/// it to pick the most recent build of a stack.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImageName(String);

impl ImageName {
    /// Validate and wrap an image name.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        if name.is_empty() {
            return Err(TypeError::EmptyImageName);
        }
        if let Some(ch) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
        {
            return Err(TypeError::InvalidImageName { name, ch });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Label used in diff headers: `<image>/<logical file>`.
    pub fn label(&self, file: &str) -> String {
        format!("{}/{}", self.0, file)
    }

    /// File name of this image's metadata archive.
    pub fn archive_file_name(&self) -> String {
        format!("{}.tar.gz", self.0)
    }
}

impl fmt::Debug for ImageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageName({})", self.0)
    }
}

impl fmt::Display for ImageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ImageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ImageName {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::str::FromStr for ImageName {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl From<ImageName> for String {
    fn from(value: ImageName) -> Self {
        value.0
    }
}
