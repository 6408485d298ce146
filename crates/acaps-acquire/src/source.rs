//! The acquisition seam consumed by the pipeline.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Retrieved file name mapped to its local path.
pub type FetchedFiles = BTreeMap<String, PathBuf>;

/// Fetches the latest version of a named dataset into a scratch directory.
pub trait DatasetSource {
    /// Download the dataset's files into `scratch_dir`.
    fn fetch(&self, dataset: &str, scratch_dir: &Path) -> Result<FetchedFiles>;
}

/// Pick the entry with the greatest file name.
///
/// Catalog file names are date-prefixed (`20200326 ACAPS - ...`), so the
/// lexicographic maximum is the newest release. Sources that name files
/// differently break this ordering.
pub fn select_latest(files: &FetchedFiles) -> Option<(&str, &Path)> {
    files
        .iter()
        .next_back()
        .map(|(name, path)| (name.as_str(), path.as_path()))
}
