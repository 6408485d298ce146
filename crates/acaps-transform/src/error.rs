//! Error types for the transform stages.

use thiserror::Error;

/// Errors raised while aggregating, joining, or reducing frames.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A column an operation depends on is absent.
    #[error("column '{column}' not found in {frame} frame")]
    MissingColumn { column: String, frame: &'static str },

    /// A join key column is absent, so the join cannot run.
    #[error("join key '{column}' not found in {side} frame")]
    MissingJoinKey { column: String, side: &'static str },

    /// Renaming would overwrite an existing column.
    #[error("cannot rename '{from}' to '{to}': target column already exists")]
    RenameConflict { from: String, to: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for TransformError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

impl From<acaps_model::ModelError> for TransformError {
    fn from(err: acaps_model::ModelError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for transform operations.
pub type Result<T> = std::result::Result<T, TransformError>;
