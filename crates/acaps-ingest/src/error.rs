//! Error types for data ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading input files.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Workbook Errors ===
    /// calamine could not open or decode the workbook.
    #[error("failed to open workbook {path}: {message}")]
    Workbook { path: PathBuf, message: String },

    /// The workbook has no sheet with the expected name.
    #[error("sheet '{sheet}' not found in {path} (available: {available})")]
    SheetNotFound {
        sheet: String,
        path: PathBuf,
        available: String,
    },

    /// The sheet has no header row.
    #[error("sheet '{sheet}' in {path} is empty")]
    EmptySheet { sheet: String, path: PathBuf },

    /// Required column not found.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },

    // === Geography Errors ===
    /// Failed to parse GeoJSON.
    #[error("failed to parse GeoJSON {path}: {message}")]
    GeoJsonParse { path: PathBuf, message: String },

    /// GeoJSON document is not a FeatureCollection.
    #[error("expected a FeatureCollection in {path}, found {found}")]
    NotFeatureCollection { path: PathBuf, found: &'static str },

    /// Feature geometry could not be converted.
    #[error("invalid geometry in feature {feature} of {path}: {message}")]
    Geometry {
        path: PathBuf,
        feature: usize,
        message: String,
    },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl IngestError {
    /// Map an `io::Error` on `path` to `FileNotFound` or `FileRead`.
    pub(crate) fn from_io(path: &std::path::Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::FileRead {
                path: path.to_path_buf(),
                source: err,
            }
        }
    }
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

impl From<acaps_model::ModelError> for IngestError {
    fn from(err: acaps_model::ModelError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::MissingColumn {
            column: "REGION".to_string(),
            path: PathBuf::from("/data/acaps.xlsx"),
        };
        assert_eq!(
            err.to_string(),
            "required column 'REGION' not found in /data/acaps.xlsx"
        );
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("test".into());
        let ingest_err: IngestError = polars_err.into();
        assert!(matches!(ingest_err, IngestError::DataFrame { .. }));
    }

    #[test]
    fn test_not_found_io_error() {
        let io = std::io::Error::from(std::io::ErrorKind::NotFound);
        let err = IngestError::from_io(std::path::Path::new("missing.geojson"), io);
        assert!(matches!(err, IngestError::FileNotFound { .. }));
    }
}
