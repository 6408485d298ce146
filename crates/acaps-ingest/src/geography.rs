//! Country boundary reference layer loading.

use std::path::Path;

use acaps_model::{GeoFrame, columns};
use geo::Geometry;
use geojson::{Feature, FeatureCollection, GeoJson, JsonObject, JsonValue};
use polars::prelude::{Column, DataFrame, NamedFrom};
use tracing::{info, warn};

use crate::error::{IngestError, Result};

/// Load a GeoJSON FeatureCollection of country polygons.
///
/// Keeps the SOVEREIGNT, ADMIN, ADM0_A3_IS, Shape_Leng and Shape_Area
/// properties; the collection's foreign members (including a legacy `crs`)
/// are carried on the returned frame.
pub fn load_geography(path: &Path) -> Result<GeoFrame> {
    let text = std::fs::read_to_string(path).map_err(|e| IngestError::from_io(path, e))?;
    let geojson: GeoJson = text.parse().map_err(|e: geojson::Error| IngestError::GeoJsonParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let collection = match geojson {
        GeoJson::FeatureCollection(collection) => collection,
        GeoJson::Feature(_) => {
            return Err(IngestError::NotFeatureCollection {
                path: path.to_path_buf(),
                found: "Feature",
            });
        }
        GeoJson::Geometry(_) => {
            return Err(IngestError::NotFeatureCollection {
                path: path.to_path_buf(),
                found: "Geometry",
            });
        }
    };

    let frame = geography_from_collection(collection, path)?;
    info!(
        path = %path.display(),
        features = frame.height(),
        with_geometry = frame.geometry_count(),
        "geography loaded"
    );
    Ok(frame)
}

/// Build the geography frame from a parsed collection. `source` is used for
/// error messages only.
pub fn geography_from_collection(collection: FeatureCollection, source: &Path) -> Result<GeoFrame> {
    let has_key = collection
        .features
        .iter()
        .any(|f| f.properties.as_ref().is_some_and(|p| p.contains_key(columns::ADMIN_ISO)));
    if !has_key && !collection.features.is_empty() {
        return Err(IngestError::MissingColumn {
            column: columns::ADMIN_ISO.to_string(),
            path: source.to_path_buf(),
        });
    }

    let count = collection.features.len();
    let mut sovereignty = Vec::with_capacity(count);
    let mut admin = Vec::with_capacity(count);
    let mut iso = Vec::with_capacity(count);
    let mut length = Vec::with_capacity(count);
    let mut area = Vec::with_capacity(count);
    let mut geometry = Vec::with_capacity(count);

    for (index, feature) in collection.features.into_iter().enumerate() {
        let props = feature.properties.as_ref();
        sovereignty.push(property_text(props, columns::SOVEREIGNTY));
        admin.push(property_text(props, columns::ADMIN));
        iso.push(property_text(props, columns::ADMIN_ISO));
        length.push(property_number(props, columns::SHAPE_LENGTH));
        area.push(property_number(props, columns::SHAPE_AREA));
        geometry.push(feature_geometry(feature, index, source)?);
    }

    let data = DataFrame::new(vec![
        Column::new(columns::SOVEREIGNTY.into(), sovereignty),
        Column::new(columns::ADMIN.into(), admin),
        Column::new(columns::ADMIN_ISO.into(), iso),
        Column::new(columns::SHAPE_LENGTH.into(), length),
        Column::new(columns::SHAPE_AREA.into(), area),
    ])?;

    Ok(GeoFrame::new(data, geometry)?.with_foreign_members(collection.foreign_members))
}

fn feature_geometry(feature: Feature, index: usize, source: &Path) -> Result<Option<Geometry<f64>>> {
    let Some(geometry) = feature.geometry else {
        return Ok(None);
    };
    let converted =
        Geometry::<f64>::try_from(geometry).map_err(|e| IngestError::Geometry {
            path: source.to_path_buf(),
            feature: index,
            message: e.to_string(),
        })?;
    if !matches!(converted, Geometry::Polygon(_) | Geometry::MultiPolygon(_)) {
        warn!(feature = index, "boundary feature has a non-polygon geometry");
    }
    Ok(Some(converted))
}

/// Property as text. Numbers are stringified; null and empty strings are `None`.
fn property_text(props: Option<&JsonObject>, key: &str) -> Option<String> {
    match props?.get(key)? {
        JsonValue::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Property as a float. Numeric strings are accepted.
fn property_number(props: Option<&JsonObject>, key: &str) -> Option<f64> {
    match props?.get(key)? {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
