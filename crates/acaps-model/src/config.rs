//! Run configuration.
//!
//! Every stage receives the pieces of [`PipelineConfig`] it needs instead of
//! reading global constants. The config is read from `acaps.toml` in the
//! crash move folder when present; every field has a default so a partial
//! file is valid.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// File name looked up in the crash move folder.
pub const CONFIG_FILE_NAME: &str = "acaps.toml";

/// Top-level configuration for one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub dataset: DatasetConfig,
    pub paths: PathsConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

impl PipelineConfig {
    /// Load `<root>/acaps.toml`, falling back to defaults when it is absent.
    pub fn load_or_default(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(Self::default());
        }
        Self::from_file(&path)
    }

    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ModelError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ModelError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Where the measures workbook comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Base URL of the CKAN-compatible catalog.
    pub catalog_url: String,
    /// Dataset identifier in the catalog.
    pub address: String,
    /// Only resources with this extension are downloaded.
    pub resource_extension: String,
    /// Workbook sheet holding the measures table.
    pub sheet: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            catalog_url: "https://data.humdata.org".to_string(),
            address: "acaps-covid19-government-measures-dataset".to_string(),
            resource_extension: "xlsx".to_string(),
            sheet: "Database".to_string(),
        }
    }
}

/// Crash move folder layout and scratch location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Download location for the catalog fetch. `None` uses the system
    /// temp dir.
    pub scratch_root: Option<PathBuf>,
    /// Reference data, relative to the crash move folder.
    pub input_dir: String,
    /// Acquired workbooks, relative to the crash move folder.
    pub active_dir: String,
    /// Dated output directories, relative to the crash move folder.
    pub output_dir: String,
    /// Boundary layer file inside `input_dir`.
    pub geography_file: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            scratch_root: None,
            input_dir: "input".to_string(),
            active_dir: "active".to_string(),
            output_dir: "output".to_string(),
            geography_file: "wrl_polbnda_int_1m_uncs.geojson".to_string(),
        }
    }
}

impl PathsConfig {
    /// Scratch directory used by the catalog fetch.
    pub fn scratch_dir(&self) -> PathBuf {
        self.scratch_root
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("covid19_acaps"))
    }

    pub fn geography_path(&self, root: &Path) -> PathBuf {
        root.join(&self.input_dir).join(&self.geography_file)
    }

    pub fn active_path(&self, root: &Path) -> PathBuf {
        root.join(&self.active_dir)
    }

    pub fn output_path(&self, root: &Path) -> PathBuf {
        root.join(&self.output_dir)
    }
}

/// Output artifact names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Point-geometry, per-measure dataset.
    pub detail_file: String,
    /// Polygon-geometry, aggregated dataset.
    pub summary_file: String,
    /// `chrono` format for the dated output directory.
    pub date_format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            detail_file: "acaps_measures_detail.geojson".to_string(),
            summary_file: "acaps_measures_summary.geojson".to_string(),
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}

/// Log level names accepted in the config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

/// Log output format names accepted in the config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormatSetting {
    #[default]
    Pretty,
    Compact,
    Json,
}

/// Logging section of the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormatSetting,
    pub timestamps: bool,
    /// Include the module path of each event.
    pub targets: bool,
    /// Emit an event when each pipeline span closes, with its timing.
    pub span_events: bool,
    /// Append logs to this file instead of stderr.
    pub file: Option<PathBuf>,
}
