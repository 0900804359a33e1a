//! Line statistics of unified diff text.

use std::path::Path;

use serde::Serialize;

/// Added and removed line counts of one unified diff.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DiffStats {
    pub additions: usize,
    pub deletions: usize,
}

impl DiffStats {
    /// Count `+`/`-` lines inside hunks. The `---`/`+++` file headers before
    /// the first `@@` are not counted.
    pub fn from_unified(text: &str) -> Self {
        let mut stats = Self::default();
        let mut in_hunk = false;
        for line in text.lines() {
            if line.starts_with("@@") {
                in_hunk = true;
                continue;
            }
            if !in_hunk {
                continue;
            }
            match line.as_bytes().first() {
                Some(b'+') => stats.additions += 1,
                Some(b'-') => stats.deletions += 1,
                _ => {}
            }
        }
        stats
    }

    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self::from_unified(&String::from_utf8_lossy(&bytes)))
    }

    /// Returns `true` if the diff changes nothing.
    pub fn is_empty(&self) -> bool {
        self.additions == 0 && self.deletions == 0
    }
}
