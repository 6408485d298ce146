//! Per-(country, month, category) measure counts.

use acaps_model::columns;
use polars::prelude::{DataFrame, DataType, Expr, IntoLazy, col, len};
use tracing::info;

use crate::error::{Result, TransformError};

/// Count measures per (COUNTRY, REGION, ISO, MONTH, CATEGORY, LOG_TYPE).
///
/// Only observed combinations appear. Groups keep the order in which they
/// first occur in `measures`. The measure text, date, and ID do not survive
/// aggregation; the output columns are the six keys followed by `COUNT`.
pub fn aggregate_measures(measures: &DataFrame) -> Result<DataFrame> {
    for key in columns::AGGREGATE_KEYS {
        if measures.column(key).is_err() {
            return Err(TransformError::MissingColumn {
                column: key.to_string(),
                frame: "measures",
            });
        }
    }

    let keys: Vec<Expr> = columns::AGGREGATE_KEYS.iter().map(|key| col(*key)).collect();
    let aggregated = measures
        .clone()
        .lazy()
        .group_by_stable(keys)
        .agg([len().cast(DataType::Int64).alias(columns::COUNT)])
        .collect()?;

    info!(
        measures = measures.height(),
        groups = aggregated.height(),
        "measures aggregated"
    );
    Ok(aggregated)
}
