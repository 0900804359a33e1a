use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use stackpromo_types::{ImageName, MetadataFile};
use tempfile::TempDir;
use walkdir::WalkDir;

use crate::env::{parse_env_dir, parse_env_file, EnvMap};
use crate::error::{FetchError, FetchResult};

/// Name of the environment definition inside an archive.
const ENV_ENTRY: &str = "env";

/// The extracted metadata of one image.
///
/// Owns the temporary directory the archive was extracted into; the
/// directory is removed when the bundle is dropped. Known files missing from
/// the archive are simply absent from [`files`](Self::files).
pub struct MetadataBundle {
    image: ImageName,
    files: BTreeMap<MetadataFile, PathBuf>,
    env: EnvMap,
    workdir: TempDir,
}

impl MetadataBundle {
    /// Extract a gzip'd tarball into a fresh temporary directory and load it.
    pub fn load(image: ImageName, archive: &Path) -> FetchResult<Self> {
        let workdir = tempfile::Builder::new()
            .prefix(&format!("stackpromo-{}-", image))
            .tempdir()?;

        let file = File::open(archive).map_err(|source| FetchError::Extract {
            archive: archive.to_path_buf(),
            source,
        })?;
        tar::Archive::new(GzDecoder::new(file))
            .unpack(workdir.path())
            .map_err(|source| FetchError::Extract {
                archive: archive.to_path_buf(),
                source,
            })?;

        Self::from_extracted(image, workdir)
    }

    /// Load from a directory that already holds the extracted archive.
    ///
    /// The tree is walked in file-name order; for each known file and for
    /// the env definition the first match wins, wherever it is nested.
    pub fn from_extracted(image: ImageName, workdir: TempDir) -> FetchResult<Self> {
        let mut files = BTreeMap::new();
        let mut env_entry: Option<PathBuf> = None;

        for entry in WalkDir::new(workdir.path()).min_depth(1).sort_by_file_name() {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy();

            if name == ENV_ENTRY {
                if env_entry.is_none() {
                    env_entry = Some(entry.path().to_path_buf());
                }
                continue;
            }
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(known) = MetadataFile::from_file_name(&name) {
                files
                    .entry(known)
                    .or_insert_with(|| entry.path().to_path_buf());
            }
        }

        let env_path = env_entry.ok_or_else(|| FetchError::MissingEnv {
            image: image.clone(),
        })?;
        let env = if env_path.is_dir() {
            parse_env_dir(&env_path)?
        } else {
            let file = std::fs::File::open(&env_path)?;
            parse_env_file(file).map_err(|source| FetchError::InvalidEnv {
                image: image.clone(),
                source,
            })?
        };

        Ok(Self {
            image,
            files,
            env,
            workdir,
        })
    }

    pub fn image(&self) -> &ImageName {
        &self.image
    }

    /// Known files present in this bundle, mapped to their extracted paths.
    pub fn files(&self) -> &BTreeMap<MetadataFile, PathBuf> {
        &self.files
    }

    pub fn file(&self, file: MetadataFile) -> Option<&Path> {
        self.files.get(&file).map(PathBuf::as_path)
    }

    pub fn env(&self) -> &EnvMap {
        &self.env
    }

    pub fn env_var(&self, key: &str) -> Option<&str> {
        self.env.get(key).map(String::as_str)
    }

    /// Root of the extracted archive.
    pub fn root(&self) -> &Path {
        self.workdir.path()
    }
}

impl fmt::Debug for MetadataBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataBundle")
            .field("image", &self.image)
            .field("files", &self.files)
            .field("env_vars", &self.env.len())
            .field("root", &self.workdir.path())
            .finish()
    }
}

impl fmt::Display for MetadataBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let files: Vec<&str> = self.files.keys().map(|k| k.file_name()).collect();
        write!(
            f,
            "image={} files=[{}] env={}",
            self.image,
            files.join(","),
            self.env.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;

    fn image(name: &str) -> ImageName {
        ImageName::new(name).unwrap()
    }

    fn write_archive(dir: &Path, name: &str, entries: &[(&str, &str)]) -> PathBuf {
        let path = dir.join(format!("{name}.tar.gz"));
        let file = File::create(&path).unwrap();
        let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
        for (entry_path, contents) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(contents.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, entry_path, contents.as_bytes())
                .unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
        path
    }

    #[test]
    fn load_indexes_known_files_and_env() {
        let dir = tempfile::tempdir().unwrap();
        let archive = write_archive(
            dir.path(),
            "travis-ci-ubuntu-1",
            &[
                ("image-metadata/env", "PACKER_TEMPLATES_SHA=abc\nA=1\n"),
                ("image-metadata/dpkg-manifest.json", "{}"),
                ("image-metadata/system_info.json", "{}"),
                ("image-metadata/README", "ignored"),
            ],
        );

        let bundle = MetadataBundle::load(image("travis-ci-ubuntu-1"), &archive).unwrap();
        assert_eq!(bundle.files().len(), 2);
        assert!(bundle.file(MetadataFile::DpkgManifest).unwrap().is_absolute());
        assert!(bundle.file(MetadataFile::SystemInfo).is_some());
        assert!(bundle.file(MetadataFile::NodeAttributes).is_none());
        assert_eq!(bundle.env_var("PACKER_TEMPLATES_SHA"), Some("abc"));
        assert_eq!(bundle.env().len(), 2);
        assert!(bundle
            .file(MetadataFile::DpkgManifest)
            .unwrap()
            .starts_with(bundle.root()));
    }

    #[test]
    fn workdir_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let archive = write_archive(dir.path(), "img", &[("env", "A=1\n")]);
        let bundle = MetadataBundle::load(image("img"), &archive).unwrap();
        let root = bundle.root().to_path_buf();
        assert!(root.exists());
        drop(bundle);
        assert!(!root.exists());
    }

    #[test]
    fn missing_env_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let archive = write_archive(dir.path(), "img", &[("system_info.json", "{}")]);
        let err = MetadataBundle::load(image("img"), &archive).unwrap_err();
        assert!(matches!(err, FetchError::MissingEnv { .. }));
    }

    #[test]
    fn malformed_env_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let archive = write_archive(dir.path(), "img", &[("env", "A=1\ngarbage\n")]);
        let err = MetadataBundle::load(image("img"), &archive).unwrap_err();
        assert!(matches!(
            err,
            FetchError::InvalidEnv {
                source: dotenvy::Error::LineParse(..),
                ..
            }
        ));
    }

    #[test]
    fn corrupt_archive_is_an_extract_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("img.tar.gz");
        std::fs::write(&path, b"definitely not gzip").unwrap();
        let err = MetadataBundle::load(image("img"), &path).unwrap_err();
        assert!(matches!(err, FetchError::Extract { .. }));
    }

    #[test]
    fn envdir_inside_archive() {
        let dir = tempfile::tempdir().unwrap();
        let archive = write_archive(
            dir.path(),
            "img",
            &[("meta/env/TRAVIS_COOKBOOKS_SHA", "def\n"), ("meta/node-attributes.yml", "---\n")],
        );
        let bundle = MetadataBundle::load(image("img"), &archive).unwrap();
        assert_eq!(bundle.env_var("TRAVIS_COOKBOOKS_SHA"), Some("def"));
        assert!(bundle.file(MetadataFile::NodeAttributes).is_some());
    }

    #[test]
    fn from_extracted_directory() {
        let workdir = tempfile::tempdir().unwrap();
        std::fs::write(workdir.path().join("env"), "B=2\n").unwrap();
        std::fs::write(workdir.path().join("job-board-register.yml"), "tags: {}\n").unwrap();
        let bundle = MetadataBundle::from_extracted(image("img"), workdir).unwrap();
        assert_eq!(bundle.to_string(), "image=img files=[job-board-register.yml] env=1");
    }
}
