//! Shared types for the ACAPS government measures pipeline.
//!
//! - [`MeasureRecord`]: one policy action from the ACAPS workbook
//! - [`GeoFrame`]: attribute table with per-row geometry
//! - [`PipelineConfig`]: explicit run configuration
//! - [`columns`]: source and output column names

pub mod columns;
pub mod config;
pub mod error;
pub mod geo_frame;
pub mod measure;

pub use config::{
    CONFIG_FILE_NAME, DatasetConfig, LogFormatSetting, LogLevel, LoggingConfig, OutputConfig,
    PathsConfig, PipelineConfig,
};
pub use error::{ModelError, Result};
pub use geo_frame::{ForeignMembers, GeoFrame};
pub use measure::{MeasureRecord, UNKNOWN, date_label, measures_frame, month_label};
