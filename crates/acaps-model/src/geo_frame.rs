//! Attribute table paired with per-row geometry.

use geo::Geometry;
use polars::prelude::DataFrame;
use serde_json::{Map, Value};

use crate::error::{ModelError, Result};

/// Dataset-level members carried alongside the features (e.g. legacy `crs`).
pub type ForeignMembers = Map<String, Value>;

/// A Polars DataFrame whose rows each own an optional geometry.
///
/// `geometry[i]` belongs to row `i` of `data`. Operations that reorder or
/// filter `data` must rebuild `geometry` in step; [`GeoFrame::new`] checks
/// the lengths agree.
#[derive(Debug, Clone)]
pub struct GeoFrame {
    /// Attribute columns.
    pub data: DataFrame,
    /// One entry per row; `None` for rows without geometry.
    pub geometry: Vec<Option<Geometry<f64>>>,
    /// Foreign members of the source collection, written back on export.
    pub foreign_members: Option<ForeignMembers>,
}

impl GeoFrame {
    pub fn new(data: DataFrame, geometry: Vec<Option<Geometry<f64>>>) -> Result<Self> {
        if data.height() != geometry.len() {
            return Err(ModelError::GeometryLength {
                rows: data.height(),
                geometries: geometry.len(),
            });
        }
        Ok(Self {
            data,
            geometry,
            foreign_members: None,
        })
    }

    #[must_use]
    pub fn with_foreign_members(mut self, members: Option<ForeignMembers>) -> Self {
        self.foreign_members = members;
        self
    }

    /// Returns the number of rows.
    pub fn height(&self) -> usize {
        self.data.height()
    }

    pub fn is_empty(&self) -> bool {
        self.data.height() == 0
    }

    /// Number of rows that carry a geometry.
    pub fn geometry_count(&self) -> usize {
        self.geometry.iter().filter(|g| g.is_some()).count()
    }

    /// The coordinate reference system declaration, if the source had one.
    pub fn crs(&self) -> Option<&Value> {
        self.foreign_members.as_ref().and_then(|m| m.get("crs"))
    }
}
