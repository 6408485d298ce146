//! Outer join of the boundary layer against measure tables.
//!
//! Geometry is not a Polars column, so each geography row is tagged with its
//! index before the join and the geometry vector is rebuilt from that tag
//! afterwards. Rows that only exist on the right side get no geometry.

use acaps_model::{GeoFrame, columns};
use polars::prelude::{
    DataFrame, DataType, IntoLazy, JoinArgs, JoinCoalesce, JoinType, SortMultipleOptions, col,
};
use tracing::{info, warn};

use crate::error::{Result, TransformError};

/// Row tag carrying the geography index through the join.
const GEOMETRY_ROW: &str = "__geometry_row";
/// Row tag marking rows contributed by the right side.
const RIGHT_ROW: &str = "__right_row";

/// Match statistics for one outer join.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinReport {
    /// Rows in the joined result.
    pub rows: usize,
    /// Rows with both a geography and a right-side match.
    pub matched: usize,
    /// Geography rows with no right-side match.
    pub unmatched_geography: usize,
    /// Right-side rows with no geography match.
    pub unmatched_right: usize,
    /// Geography rows whose key is null.
    pub null_geography_keys: usize,
    /// Right-side rows whose key is null.
    pub null_right_keys: usize,
}

impl JoinReport {
    /// Whether any row failed to find a partner or had no key.
    pub fn has_gaps(&self) -> bool {
        self.unmatched_geography > 0
            || self.unmatched_right > 0
            || self.null_geography_keys > 0
            || self.null_right_keys > 0
    }
}

/// Full outer join of `geography` with `right` on `ADM0_A3_IS = right_key`.
///
/// Every row of either side appears in the result; fields of the missing
/// side are null. Null keys never match. The right-side key column is
/// dropped so only the geography copy of the code remains. Rows are ordered
/// by geography row, then right row, with right-only rows last.
pub fn outer_join(
    geography: &GeoFrame,
    right: &DataFrame,
    right_key: &str,
) -> Result<(GeoFrame, JoinReport)> {
    let left_key = columns::ADMIN_ISO;
    let left_key_column =
        geography
            .data
            .column(left_key)
            .map_err(|_| TransformError::MissingJoinKey {
                column: left_key.to_string(),
                side: "geography",
            })?;
    let right_key_column = right
        .column(right_key)
        .map_err(|_| TransformError::MissingJoinKey {
            column: right_key.to_string(),
            side: "right",
        })?;
    let null_geography_keys = left_key_column.null_count();
    let null_right_keys = right_key_column.null_count();

    let left = geography
        .data
        .clone()
        .with_row_index(GEOMETRY_ROW.into(), None)?;
    let right_tagged = right.clone().with_row_index(RIGHT_ROW.into(), None)?;

    let mut joined = left
        .lazy()
        .join(
            right_tagged.lazy(),
            [col(left_key)],
            [col(right_key)],
            JoinArgs::new(JoinType::Full).with_coalesce(JoinCoalesce::KeepColumns),
        )
        .sort_by_exprs(
            [col(GEOMETRY_ROW), col(RIGHT_ROW)],
            SortMultipleOptions::default().with_nulls_last(true),
        )
        .collect()?;

    // Same-named keys get the right copy suffixed.
    let dropped_key = if right_key == left_key {
        format!("{right_key}_right")
    } else {
        right_key.to_string()
    };
    joined.drop_in_place(&dropped_key)?;

    let geometry_rows = joined.drop_in_place(GEOMETRY_ROW)?.cast(&DataType::UInt64)?;
    let right_rows = joined.drop_in_place(RIGHT_ROW)?;

    let mut geometry = Vec::with_capacity(joined.height());
    for row in geometry_rows.u64()?.into_iter() {
        let geom = row.and_then(|idx| geography.geometry.get(idx as usize).cloned().flatten());
        geometry.push(geom);
    }

    let unmatched_right = geometry_rows.null_count();
    let unmatched_geography = right_rows.null_count();
    let report = JoinReport {
        rows: joined.height(),
        matched: joined.height() - unmatched_right - unmatched_geography,
        unmatched_geography,
        unmatched_right,
        null_geography_keys,
        null_right_keys,
    };

    if report.null_geography_keys > 0 || report.null_right_keys > 0 {
        warn!(
            null_geography_keys = report.null_geography_keys,
            null_right_keys = report.null_right_keys,
            "join key missing on some rows"
        );
    }
    if report.unmatched_right > 0 {
        warn!(
            unmatched = report.unmatched_right,
            key = right_key,
            "rows without a matching country boundary"
        );
    }
    info!(
        rows = report.rows,
        matched = report.matched,
        unmatched_geography = report.unmatched_geography,
        unmatched_right = report.unmatched_right,
        "outer join complete"
    );

    let frame = GeoFrame::new(joined, geometry)?
        .with_foreign_members(geography.foreign_members.clone());
    Ok((frame, report))
}
