//! End-to-end tests for the measures pipeline.

use std::path::{Path, PathBuf};

use acaps_acquire::{AcquireError, Acquisition, DatasetSource, FetchedFiles};
use acaps_cli::pipeline::{process_measures, run};
use acaps_cli::summary::summary_table;
use acaps_ingest::LoadedMeasures;
use acaps_model::{MeasureRecord, PathsConfig, PipelineConfig};
use chrono::NaiveDate;
use serde_json::Value;
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
        "Shape_Leng": 8.0,
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
        "Shape_Leng": 4.0,
        "Shape_Area": 1.0
      },
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[10.0, 10.0], [11.0, 10.0], [11.0, 11.0], [10.0, 11.0], [10.0, 10.0]]]
      }
    }
  ]
}"#;

fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 3, 26).unwrap()
}

/// Crash move folder with the boundary layer in place.
fn crash_move_folder() -> TempDir {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input");
    std::fs::create_dir_all(&input).unwrap();
    std::fs::write(
        input.join(PathsConfig::default().geography_file),
        BOUNDARIES,
    )
    .unwrap();
    dir
}

fn config(root: &Path) -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.paths.scratch_root = Some(root.join("scratch"));
    config
}

fn measure(iso: &str, country: &str, day: u32, id: i64) -> MeasureRecord {
    MeasureRecord {
        region: "Americas".to_string(),
        country: Some(country.to_string()),
        iso: Some(iso.to_string()),
        category: Some("Lockdown".to_string()),
        measure: Some("Partial lockdown".to_string()),
        date_implemented: NaiveDate::from_ymd_opt(2020, 3, day),
        id: Some(id),
        log_type: Some("Introduction / extension of measures".to_string()),
    }
}

fn loaded(records: Vec<MeasureRecord>) -> LoadedMeasures {
    LoadedMeasures {
        rows_read: records.len(),
        records,
        dropped_without_region: 0,
        undated: 0,
    }
}

fn read_features(path: &Path) -> Vec<Value> {
    let value: Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    value["features"].as_array().unwrap().clone()
}

#[test]
fn test_usa_france_detail_and_summary() {
    let root = crash_move_folder();
    let config = config(root.path());
    let measures = loaded(vec![
        measure("USA", "United States of America", 1, 10),
        measure("USA", "United States of America", 20, 11),
        measure("DEU", "Germany", 16, 12),
    ]);

    let result = process_measures(root.path(), &config, &measures, run_date()).unwrap();

    assert_eq!(result.aggregates, 2);
    assert_eq!(result.geography_features, 2);
    assert!(result.export.dir.ends_with("output/2020-03-26"));
    assert!(result.export.detail.path.is_file());
    assert!(result.export.summary.path.is_file());

    // Detail: two USA measures, France without measures, Germany without a boundary.
    assert_eq!(result.export.detail.records, 4);
    assert_eq!(result.detail_join.matched, 2);
    assert_eq!(result.detail_join.unmatched_geography, 1);
    assert_eq!(result.detail_join.unmatched_right, 1);

    let detail = read_features(&result.export.detail.path);
    let usa = &detail[0];
    assert_eq!(usa["geometry"]["type"], "Point");
    assert_eq!(usa["properties"]["ADM0_ISO"], "USA");
    assert_eq!(usa["properties"]["SOV"], "United States of America");
    assert_eq!(usa["properties"]["CAT"], "Lockdown");
    assert_eq!(usa["properties"]["DATE_IMPL"], "2020-03-01");
    assert_eq!(usa["properties"]["ORIG_FID"], 10);
    assert_eq!(usa["properties"]["SHP_AREA"], 4.0);
    assert_eq!(usa["properties"]["MONTH"], "March");
    let coords = usa["geometry"]["coordinates"].as_array().unwrap();
    let (x, y) = (coords[0].as_f64().unwrap(), coords[1].as_f64().unwrap());
    assert!((0.0..=2.0).contains(&x) && (0.0..=2.0).contains(&y));

    let france = &detail[2];
    assert_eq!(france["properties"]["ADM0_ISO"], "FRA");
    assert!(france["properties"]["CAT"].is_null());
    assert!(france["properties"]["DATE_IMPL"].is_null());
    assert!(france["properties"]["MONTH"].is_null());
    assert_eq!(france["geometry"]["type"], "Point");

    let germany = &detail[3];
    assert!(germany["geometry"].is_null());
    assert!(germany["properties"]["ADM0_ISO"].is_null());
    assert_eq!(germany["properties"]["COUNTRY"], "Germany");

    // Summary keeps polygons and the original field names.
    assert_eq!(result.export.summary.records, 3);
    let summary = read_features(&result.export.summary.path);
    assert_eq!(summary[0]["geometry"]["type"], "Polygon");
    assert_eq!(summary[0]["properties"]["ADM0_A3_IS"], "USA");
    assert_eq!(summary[0]["properties"]["CATEGORY"], "Lockdown");
    assert_eq!(summary[0]["properties"]["COUNT"], 2);
    assert!(summary[1]["properties"]["COUNT"].is_null());
    assert_eq!(summary[2]["properties"]["COUNT"], 1);
    assert!(summary[2]["geometry"].is_null());
}

#[test]
fn test_missing_geography_fails() {
    let root = TempDir::new().unwrap();
    let config = config(root.path());
    let measures = loaded(vec![measure("USA", "United States of America", 1, 10)]);

    let err = process_measures(root.path(), &config, &measures, run_date()).unwrap_err();

    assert!(format!("{err:#}").contains("load geography"));
    assert!(!root.path().join("output").exists());
}

#[test]
fn test_offline_without_workbook_fails() {
    let root = crash_move_folder();
    let config = config(root.path());

    let err = run(root.path(), &config, Acquisition::Offline, run_date()).unwrap_err();

    assert!(format!("{err:#}").contains("acquire measures workbook"));
}

/// Source that "downloads" fixed files into the scratch directory.
struct StubSource {
    files: Vec<(&'static str, &'static [u8])>,
}

impl DatasetSource for StubSource {
    fn fetch(&self, _dataset: &str, scratch_dir: &Path) -> Result<FetchedFiles, AcquireError> {
        std::fs::create_dir_all(scratch_dir).unwrap();
        let mut fetched = FetchedFiles::new();
        for (name, body) in &self.files {
            let path: PathBuf = scratch_dir.join(name);
            std::fs::write(&path, body).unwrap();
            fetched.insert((*name).to_string(), path);
        }
        Ok(fetched)
    }
}

#[test]
fn test_remote_run_copies_newest_workbook_before_loading() {
    let root = crash_move_folder();
    let config = config(root.path());
    let source = StubSource {
        files: vec![
            ("20200319 ACAPS measures.xlsx", b"old"),
            ("20200326 ACAPS measures.xlsx", b"not a workbook"),
        ],
    };

    let err = run(root.path(), &config, Acquisition::Remote(&source), run_date()).unwrap_err();

    // The newest file is acquired into active/ and then rejected by the loader.
    let active = root.path().join("active").join("20200326 ACAPS measures.xlsx");
    assert!(active.is_file());
    assert!(!root.path().join("active").join("20200319 ACAPS measures.xlsx").exists());
    assert!(format!("{err:#}").contains("load measures"));
}

#[test]
fn test_summary_table_lists_outputs() {
    let root = crash_move_folder();
    let config = config(root.path());
    let measures = loaded(vec![measure("USA", "United States of America", 1, 10)]);
    let processed = process_measures(root.path(), &config, &measures, run_date()).unwrap();
    let result = acaps_cli::pipeline::RunResult {
        workbook: root.path().join("active").join("20200326.xlsx"),
        measures: (&measures).into(),
        processed,
    };

    let rendered = summary_table(&result).to_string();

    assert!(rendered.contains("Detail"));
    assert!(rendered.contains("Summary"));
    assert!(rendered.contains("acaps_measures_detail.geojson"));
}
