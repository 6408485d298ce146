//! Error types for dataset acquisition.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while fetching or locating the measures workbook.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AcquireError {
    /// Network request failed.
    #[error("network error: {0}")]
    Network(String),

    /// The catalog answered with a non-success HTTP status.
    #[error("catalog request to {url} failed with status {status}")]
    HttpStatus { url: String, status: u16 },

    /// The catalog answered but reported a failure or an unexpected body.
    #[error("catalog error for dataset '{dataset}': {message}")]
    Catalog { dataset: String, message: String },

    /// Failed to parse JSON response.
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// The dataset has no resource with the wanted extension.
    #[error("dataset '{dataset}' has no .{extension} resource")]
    NoResource { dataset: String, extension: String },

    /// Offline mode found nothing to reuse.
    #[error("no .{extension} file found in {dir}")]
    NoLocalFile { dir: PathBuf, extension: String },

    /// I/O error in the scratch or crash move folders.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AcquireError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for AcquireError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for AcquireError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonParse(err.to_string())
    }
}

/// Result type alias for acquisition operations.
pub type Result<T> = std::result::Result<T, AcquireError>;
