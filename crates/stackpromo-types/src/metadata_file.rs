use std::fmt;

use serde::{Deserialize, Serialize};

/// The known metadata files shipped in every image metadata archive.
///
/// Only these files are indexed and diffed; anything else in an archive is
/// ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MetadataFile {
    /// Installed package manifest.
    DpkgManifest,
    /// Registration config consumed by the image registry.
    JobBoardRegister,
    /// Provisioner node attributes.
    NodeAttributes,
    /// System info dump.
    SystemInfo,
    /// Test results of the image verification suite.
    PackerTemplatesRspec,
}

impl MetadataFile {
    /// All known files, in diff order.
    pub const ALL: [MetadataFile; 5] = [
        MetadataFile::DpkgManifest,
        MetadataFile::JobBoardRegister,
        MetadataFile::NodeAttributes,
        MetadataFile::SystemInfo,
        MetadataFile::PackerTemplatesRspec,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            MetadataFile::DpkgManifest => "dpkg-manifest.json",
            MetadataFile::JobBoardRegister => "job-board-register.yml",
            MetadataFile::NodeAttributes => "node-attributes.yml",
            MetadataFile::SystemInfo => "system_info.json",
            MetadataFile::PackerTemplatesRspec => "travis_packer_templates_rspec.json",
        }
    }

    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.file_name() == name)
    }

    /// Name of the diff artifact written for this file.
    pub fn diff_file_name(self) -> String {
        format!("{}.diff", self.file_name())
    }

    /// Whether entry order in this file is nondeterministic and must be
    /// normalized before diffing.
    pub fn needs_normalization(self) -> bool {
        matches!(self, MetadataFile::PackerTemplatesRspec)
    }
}

impl fmt::Display for MetadataFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}
