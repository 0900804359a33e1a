use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;
use walkdir::WalkDir;

use crate::error::ReportResult;
use crate::urls::CompareUrls;

pub const README_FILE: &str = "README.md";
pub const INDEX_FILE: &str = "index.json";

/// Machine-readable report index. Field order is the serialized key order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReportIndex {
    pub stack: String,
    pub packer_templates_diff_url: String,
    pub travis_cookbooks_diff_url: String,
    pub output_files: Vec<String>,
}

/// The written report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Report {
    pub readme: PathBuf,
    pub index_path: PathBuf,
    pub index: ReportIndex,
}

/// Sorted base names of every non-directory entry in `output_dir`, except
/// the report files themselves.
pub fn list_output_files(output_dir: &Path) -> ReportResult<Vec<String>> {
    let mut names = Vec::new();
    for entry in WalkDir::new(output_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name == README_FILE || name == INDEX_FILE {
            continue;
        }
        names.push(name);
    }
    names.sort();
    Ok(names)
}

/// Render the markdown summary.
pub fn render_readme(stack: &str, urls: &CompareUrls, output_files: &[String]) -> String {
    let mut out = format!(
        "# {stack} promotion report\n\n- [packer-templates diff]({})\n- [travis-cookbooks diff]({})\n",
        urls.packer_templates, urls.travis_cookbooks
    );
    if !output_files.is_empty() {
        out.push_str("\n## output files\n\n");
        for name in output_files {
            out.push_str(&format!("- [{name}](./{name})\n"));
        }
    }
    out
}

/// Writes `README.md` and `index.json` for one stack.
pub struct ReportWriter {
    stack: String,
}

impl ReportWriter {
    pub fn new(stack: impl Into<String>) -> Self {
        Self {
            stack: stack.into(),
        }
    }

    pub fn write(&self, output_dir: &Path, urls: &CompareUrls) -> ReportResult<Report> {
        let output_files = list_output_files(output_dir)?;

        let readme = output_dir.join(README_FILE);
        info!(path = %readme.display(), "writing");
        std::fs::write(&readme, render_readme(&self.stack, urls, &output_files))?;

        let index = ReportIndex {
            stack: self.stack.clone(),
            packer_templates_diff_url: urls.packer_templates.clone(),
            travis_cookbooks_diff_url: urls.travis_cookbooks.clone(),
            output_files,
        };
        let index_path = output_dir.join(INDEX_FILE);
        info!(path = %index_path.display(), "writing");
        let mut json = serde_json::to_string_pretty(&index)?;
        json.push('\n');
        std::fs::write(&index_path, json)?;

        Ok(Report {
            readme,
            index_path,
            index,
        })
    }

    pub fn stack(&self) -> &str {
        &self.stack
    }
}
