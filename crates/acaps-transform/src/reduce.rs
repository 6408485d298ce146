//! Point reduction and field renaming for the detail dataset.

use acaps_model::{GeoFrame, columns};
use geo::{Geometry, InteriorPoint};
use polars::prelude::DataFrame;
use tracing::{debug, info, warn};

use crate::error::{Result, TransformError};

/// Replace every geometry with an interior point and apply the detail renames.
///
/// The point comes from [`InteriorPoint`], so it lies inside the polygon
/// even for concave shapes and multipolygons where a centroid can fall
/// outside. Null geometry stays null, as does a geometry with no interior
/// point (an empty polygon). Running this on an already reduced frame
/// changes nothing.
pub fn reduce_to_points(frame: GeoFrame) -> Result<GeoFrame> {
    let GeoFrame {
        mut data,
        geometry,
        foreign_members,
    } = frame;

    let mut lost = 0usize;
    let points: Vec<Option<Geometry<f64>>> = geometry
        .into_iter()
        .map(|geom| {
            let geom = geom?;
            let point = representative_point(&geom);
            if point.is_none() {
                lost += 1;
            }
            point
        })
        .collect();
    if lost > 0 {
        warn!(lost, "geometries without an interior point set to null");
    }

    let renamed = rename_detail_columns(&mut data)?;
    info!(
        rows = data.height(),
        points = points.iter().filter(|p| p.is_some()).count(),
        renamed,
        "geometry reduced to points"
    );

    Ok(GeoFrame::new(data, points)?.with_foreign_members(foreign_members))
}

/// A point guaranteed to lie within `geometry`, as a point geometry.
pub fn representative_point(geometry: &Geometry<f64>) -> Option<Geometry<f64>> {
    match geometry {
        Geometry::Point(point) => Some(Geometry::Point(*point)),
        other => other.interior_point().map(Geometry::Point),
    }
}

/// Rename detail columns to names that fit the 10-character field limit.
///
/// A rename is skipped when its source column is absent, which makes the
/// operation idempotent. Returns the number of columns renamed.
pub fn rename_detail_columns(df: &mut DataFrame) -> Result<usize> {
    let mut renamed = 0usize;
    for (from, to) in columns::DETAIL_RENAMES {
        let has_from = df.column(from).is_ok();
        if !has_from {
            continue;
        }
        if df.column(to).is_ok() {
            return Err(TransformError::RenameConflict {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        df.rename(from, to.into())?;
        debug!(from, to, "renamed column");
        renamed += 1;
    }
    Ok(renamed)
}
