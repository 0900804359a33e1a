//! Unified diff generation.
//!
//! Artifacts are consumed directly by people and downstream tooling, so the
//! format is fixed: standard unified diff, `---`/`+++` headers carrying only
//! the given labels, three lines of context, and no output at all when the
//! inputs are identical.

use std::path::Path;
use std::process::Command;

use similar::TextDiff;
use stackpromo_types::config::BUILTIN_DIFFER;
use stackpromo_types::PromotionConfig;
use tracing::debug;

use crate::error::{DiffError, DiffResult};

/// Writes a labeled unified diff of two files.
pub trait TextDiffer: Send + Sync {
    /// Diff `old` against `new`, writing the result to `target`.
    fn diff_files(
        &self,
        old: &Path,
        old_label: &str,
        new: &Path,
        new_label: &str,
        target: &Path,
    ) -> DiffResult<()>;
}

impl<T: TextDiffer + ?Sized> TextDiffer for &T {
    fn diff_files(
        &self,
        old: &Path,
        old_label: &str,
        new: &Path,
        new_label: &str,
        target: &Path,
    ) -> DiffResult<()> {
        (**self).diff_files(old, old_label, new, new_label, target)
    }
}

impl<T: TextDiffer + ?Sized> TextDiffer for Box<T> {
    fn diff_files(
        &self,
        old: &Path,
        old_label: &str,
        new: &Path,
        new_label: &str,
        target: &Path,
    ) -> DiffResult<()> {
        (**self).diff_files(old, old_label, new, new_label, target)
    }
}

/// Unified diff of two strings in `diff -u --label` format.
pub fn unified_diff(
    old: &str,
    new: &str,
    old_label: &str,
    new_label: &str,
    context: usize,
) -> String {
    TextDiff::from_lines(old, new)
        .unified_diff()
        .context_radius(context)
        .header(old_label, new_label)
        .to_string()
}

/// In-process differ built on `similar` (Myers diff).
///
/// Hunks match GNU `diff -u` on simple edits but may pick a different edit
/// script on repetitive input.
#[derive(Clone, Copy, Debug)]
pub struct UnifiedDiffer {
    context: usize,
}

impl UnifiedDiffer {
    pub fn new() -> Self {
        Self { context: 3 }
    }

    pub fn with_context(context: usize) -> Self {
        Self { context }
    }
}

impl Default for UnifiedDiffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextDiffer for UnifiedDiffer {
    fn diff_files(
        &self,
        old: &Path,
        old_label: &str,
        new: &Path,
        new_label: &str,
        target: &Path,
    ) -> DiffResult<()> {
        let old_bytes = std::fs::read(old)?;
        let new_bytes = std::fs::read(new)?;
        let text = unified_diff(
            &String::from_utf8_lossy(&old_bytes),
            &String::from_utf8_lossy(&new_bytes),
            old_label,
            new_label,
            self.context,
        );
        std::fs::write(target, text)?;
        Ok(())
    }
}

/// Runs an external `diff -u --label A old --label B new`.
///
/// Exit status 0 (identical) and 1 (different) both succeed; anything else
/// is [`DiffError::Tool`].
#[derive(Clone, Debug)]
pub struct ExternalDiffer {
    exe: String,
}

impl ExternalDiffer {
    pub fn new(exe: impl Into<String>) -> Self {
        Self { exe: exe.into() }
    }

    pub fn exe(&self) -> &str {
        &self.exe
    }
}

impl TextDiffer for ExternalDiffer {
    fn diff_files(
        &self,
        old: &Path,
        old_label: &str,
        new: &Path,
        new_label: &str,
        target: &Path,
    ) -> DiffResult<()> {
        debug!(exe = %self.exe, old = %old.display(), new = %new.display(), "running diff");
        let output = Command::new(&self.exe)
            .arg("-u")
            .arg("--label")
            .arg(old_label)
            .arg(old)
            .arg("--label")
            .arg(new_label)
            .arg(new)
            .output()
            .map_err(|source| DiffError::Spawn {
                exe: self.exe.clone(),
                source,
            })?;

        match output.status.code() {
            Some(0) | Some(1) => {
                std::fs::write(target, &output.stdout)?;
                Ok(())
            }
            _ => Err(DiffError::Tool {
                exe: self.exe.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }),
        }
    }
}

/// The differ selected by configuration: the configured executable, or the
/// in-process differ when `diff_exe` is [`BUILTIN_DIFFER`].
pub fn differ_from_config(config: &PromotionConfig) -> Box<dyn TextDiffer> {
    if config.diff_exe == BUILTIN_DIFFER {
        debug!("using in-process differ");
        Box::new(UnifiedDiffer::new())
    } else {
        Box::new(ExternalDiffer::new(config.diff_exe.clone()))
    }
}
