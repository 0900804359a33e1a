use std::path::{Path, PathBuf};

use serde::Serialize;
use stackpromo_metadata::MetadataBundle;
use stackpromo_types::{MetadataFile, Side};
use tracing::{debug, info};

use crate::differ::TextDiffer;
use crate::env_diff::{diff_env, render_env, EnvDiff};
use crate::error::DiffResult;
use crate::normalize::normalize_rspec_results;
use crate::stats::DiffStats;

/// File name of the environment diff artifact.
pub const ENV_DIFF_FILE: &str = "env.diff";

/// What a diff artifact compares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    File(MetadataFile),
    Env,
}

/// A diff written to the output directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiffArtifact {
    /// Base name inside the output directory.
    pub name: String,
    pub path: PathBuf,
    pub kind: ArtifactKind,
    pub stats: DiffStats,
}

/// Everything one diff run produced, in generation order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiffOutcome {
    pub artifacts: Vec<DiffArtifact>,
    pub env: EnvDiff,
}

/// Produces the diff artifacts for a pair of metadata bundles.
pub struct DiffEngine<D> {
    differ: D,
}

impl<D: TextDiffer> DiffEngine<D> {
    pub fn new(differ: D) -> Self {
        Self { differ }
    }

    /// Diff every known file present in both bundles, then the environments.
    ///
    /// Files present on one side only are skipped. `env.diff` is always
    /// written, empty when the environments match.
    pub fn diff(
        &self,
        output_dir: &Path,
        current: &MetadataBundle,
        next: &MetadataBundle,
    ) -> DiffResult<DiffOutcome> {
        std::fs::create_dir_all(output_dir)?;

        let mut artifacts = Vec::new();
        for file in MetadataFile::ALL {
            if let Some(artifact) = self.diff_file(output_dir, file, current, next)? {
                artifacts.push(artifact);
            }
        }

        let (env_artifact, env) = self.diff_env(output_dir, current, next)?;
        artifacts.push(env_artifact);

        Ok(DiffOutcome { artifacts, env })
    }

    /// Diff one known file into `<output_dir>/<file>.diff`.
    ///
    /// Returns `Ok(None)` if either bundle lacks the file. The results file
    /// is normalized in both extracted copies first.
    pub fn diff_file(
        &self,
        output_dir: &Path,
        file: MetadataFile,
        current: &MetadataBundle,
        next: &MetadataBundle,
    ) -> DiffResult<Option<DiffArtifact>> {
        let (Some(old), Some(new)) = (current.file(file), next.file(file)) else {
            debug!(file = %file, "not present in both bundles, skipping");
            return Ok(None);
        };

        if file.needs_normalization() {
            normalize_rspec_results(old)?;
            normalize_rspec_results(new)?;
        }

        let name = file.diff_file_name();
        let target = output_dir.join(&name);
        info!(path = %target.display(), "writing");
        self.differ.diff_files(
            old,
            &current.image().label(file.file_name()),
            new,
            &next.image().label(file.file_name()),
            &target,
        )?;

        Ok(Some(DiffArtifact {
            stats: DiffStats::from_file(&target)?,
            name,
            path: target,
            kind: ArtifactKind::File(file),
        }))
    }

    /// Write both rendered env files and diff them into `env.diff`.
    pub fn diff_env(
        &self,
        output_dir: &Path,
        current: &MetadataBundle,
        next: &MetadataBundle,
    ) -> DiffResult<(DiffArtifact, EnvDiff)> {
        let current_env = output_dir.join(Side::Current.env_file_name());
        let next_env = output_dir.join(Side::Next.env_file_name());
        std::fs::write(&current_env, render_env(current.env()))?;
        std::fs::write(&next_env, render_env(next.env()))?;

        let target = output_dir.join(ENV_DIFF_FILE);
        info!(path = %target.display(), "writing");
        self.differ.diff_files(
            &current_env,
            &current.image().label("env"),
            &next_env,
            &next.image().label("env"),
            &target,
        )?;

        let env = diff_env(current.env(), next.env());
        debug!(
            added = env.additions(),
            removed = env.removals(),
            modified = env.modifications(),
            "env compared"
        );

        let artifact = DiffArtifact {
            stats: DiffStats::from_file(&target)?,
            name: ENV_DIFF_FILE.to_string(),
            path: target,
            kind: ArtifactKind::Env,
        };
        Ok((artifact, env))
    }

    pub fn differ(&self) -> &D {
        &self.differ
    }
}
