//! Dated output directory layout.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use acaps_model::{OutputConfig, PathsConfig};
use chrono::NaiveDate;
use tracing::debug;

use crate::error::{OutputError, Result};

/// Where one run writes its datasets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    /// `<root>/<output dir>/<run date>`.
    pub dir: PathBuf,
    pub detail_file: String,
    pub summary_file: String,
}

impl OutputLayout {
    /// Resolve the layout for a run on `run_date`.
    pub fn for_run(
        root: &Path,
        paths: &PathsConfig,
        output: &OutputConfig,
        run_date: NaiveDate,
    ) -> Result<Self> {
        let stamp = format_date(run_date, &output.date_format)?;
        Ok(Self {
            dir: paths.output_path(root).join(stamp),
            detail_file: output.detail_file.clone(),
            summary_file: output.summary_file.clone(),
        })
    }

    pub fn detail_path(&self) -> PathBuf {
        self.dir.join(&self.detail_file)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.dir.join(&self.summary_file)
    }

    /// Create the output directory. An existing directory is not an error.
    pub fn create_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir).map_err(|source| OutputError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;
        debug!(dir = %self.dir.display(), "output directory ready");
        Ok(())
    }
}

/// Format `date` with a strftime pattern, rejecting invalid patterns.
fn format_date(date: NaiveDate, format: &str) -> Result<String> {
    let mut stamp = String::new();
    write!(stamp, "{}", date.format(format)).map_err(|_| OutputError::DateFormat {
        format: format.to_string(),
    })?;
    if stamp.is_empty() {
        return Err(OutputError::DateFormat {
            format: format.to_string(),
        });
    }
    Ok(stamp)
}
