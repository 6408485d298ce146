//! Error types for dataset export.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while writing output datasets.
#[derive(Debug, Error)]
pub enum OutputError {
    /// The dated output directory could not be created.
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A dataset file could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A written temp file could not be renamed onto its target.
    #[error("failed to move {temp_path} to {path}: {source}")]
    Commit {
        temp_path: PathBuf,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A dataset could not be serialized.
    #[error("failed to serialize {path}: {message}")]
    Serialize { path: PathBuf, message: String },

    /// The configured date format is not a valid strftime pattern.
    #[error("invalid output date format '{format}'")]
    DateFormat { format: String },

    /// A column holds a value type with no GeoJSON property representation.
    #[error("column '{column}' has unsupported type {dtype}")]
    UnsupportedValue { column: String, dtype: String },
}

/// Result type for output operations.
pub type Result<T> = std::result::Result<T, OutputError>;
