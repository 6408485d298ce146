//! Tests for boundary layer loading.

use acaps_ingest::{IngestError, load_geography};
use acaps_model::columns;
use geo::Geometry;
use tempfile::TempDir;

const BOUNDARIES: &str = r#"{
  "type": "FeatureCollection",
  "crs": { "type": "name", "properties": { "name": "urn:ogc:def:crs:OGC:1.3:CRS84" } },
  "features": [
    {
      "type": "Feature",
      "properties": {
        "SOVEREIGNT": "United States of America",
        "ADMIN": "United States of America",
        "ADM0_A3_IS": "USA",
        "Shape_Leng": 12.5,
        "Shape_Area": 4.0
      },
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0], [0.0, 0.0]]]
      }
    },
    {
      "type": "Feature",
      "properties": {
        "SOVEREIGNT": "France",
        "ADMIN": "France",
        "ADM0_A3_IS": "FRA",
        "Shape_Leng": 8.0,
        "Shape_Area": 1.0
      },
      "geometry": {
        "type": "MultiPolygon",
        "coordinates": [
          [[[10.0, 10.0], [11.0, 10.0], [11.0, 11.0], [10.0, 11.0], [10.0, 10.0]]],
          [[[20.0, 20.0], [21.0, 20.0], [21.0, 21.0], [20.0, 21.0], [20.0, 20.0]]]
        ]
      }
    },
    {
      "type": "Feature",
      "properties": { "ADMIN": "Nowhere", "ADM0_A3_IS": null },
      "geometry": null
    }
  ]
}"#;

fn write(dir: &TempDir, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn loads_attributes_geometry_and_crs() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "countries.geojson", BOUNDARIES);

    let frame = load_geography(&path).unwrap();

    assert_eq!(frame.height(), 3);
    assert_eq!(frame.geometry_count(), 2);
    assert!(matches!(frame.geometry[0], Some(Geometry::Polygon(_))));
    assert!(matches!(frame.geometry[1], Some(Geometry::MultiPolygon(_))));
    assert!(frame.geometry[2].is_none());

    let iso = frame.data.column(columns::ADMIN_ISO).unwrap().str().unwrap();
    assert_eq!(iso.get(0), Some("USA"));
    assert_eq!(iso.get(1), Some("FRA"));
    assert_eq!(iso.get(2), None);

    let area = frame.data.column(columns::SHAPE_AREA).unwrap().f64().unwrap();
    assert_eq!(area.get(0), Some(4.0));
    assert_eq!(area.get(2), None);

    let crs = frame.crs().unwrap();
    assert_eq!(crs["properties"]["name"], "urn:ogc:def:crs:OGC:1.3:CRS84");
}

#[test]
fn missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = load_geography(&dir.path().join("absent.geojson")).unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
}

#[test]
fn malformed_json_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "broken.geojson", "{ \"type\": \"FeatureCollection\", ");
    let err = load_geography(&path).unwrap_err();
    assert!(matches!(err, IngestError::GeoJsonParse { .. }));
}

#[test]
fn single_feature_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "feature.geojson",
        r#"{"type": "Feature", "properties": {"ADM0_A3_IS": "USA"}, "geometry": null}"#,
    );
    let err = load_geography(&path).unwrap_err();
    assert!(matches!(err, IngestError::NotFeatureCollection { found: "Feature", .. }));
}

#[test]
fn missing_key_property_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "nokey.geojson",
        r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"ADMIN": "France"}, "geometry": null}
        ]}"#,
    );
    let err = load_geography(&path).unwrap_err();
    match err {
        IngestError::MissingColumn { column, .. } => assert_eq!(column, columns::ADMIN_ISO),
        other => panic!("unexpected error: {other}"),
    }
}
