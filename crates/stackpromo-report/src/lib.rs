//! Report rendering for stack promotion reports.
//!
//! Writes `README.md` and `index.json` describing the artifacts found in an
//! output directory. The artifact list comes from a sorted directory listing
//! rather than from the diff engine, so the report always reflects exactly
//! what is on disk and regenerating it from the same directory is
//! byte-for-byte identical.

pub mod error;
pub mod urls;
pub mod writer;

pub use error::{ReportError, ReportResult};
pub use urls::{
    compare_url, CompareUrls, PACKER_TEMPLATES_COMPARE_BASE, PACKER_TEMPLATES_SHA_KEY,
    TRAVIS_COOKBOOKS_COMPARE_BASE, TRAVIS_COOKBOOKS_SHA_KEY,
};
pub use writer::{
    list_output_files, render_readme, Report, ReportIndex, ReportWriter, INDEX_FILE, README_FILE,
};
