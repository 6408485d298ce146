//! GeoFrame to GeoJSON FeatureCollection conversion and writing.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use acaps_model::GeoFrame;
use chrono::{Duration, NaiveDate};
use geojson::{Feature, FeatureCollection, JsonObject, JsonValue};
use polars::prelude::{AnyValue, Column};
use tracing::{debug, warn};

use crate::error::{OutputError, Result};

/// A dataset serialized in memory, not yet on disk.
#[derive(Debug, Clone)]
pub struct EncodedDataset {
    /// Final location of the dataset.
    pub path: PathBuf,
    pub records: usize,
    bytes: Vec<u8>,
}

/// Convert and serialize `frame` for writing at `path`.
pub fn encode_dataset(frame: &GeoFrame, path: &Path) -> Result<EncodedDataset> {
    let collection = frame_to_collection(frame)?;
    let records = collection.features.len();
    let bytes = serde_json::to_vec(&collection).map_err(|e| OutputError::Serialize {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(EncodedDataset {
        path: path.to_path_buf(),
        records,
        bytes,
    })
}

/// Write every dataset or none of them.
///
/// Each dataset goes to a temp file beside its target first; the temp files
/// are renamed into place only once all of them are written. On failure the
/// temp files and any already renamed targets are removed, while files from
/// an earlier run are left untouched unless they were already replaced.
pub fn write_datasets(datasets: &[EncodedDataset]) -> Result<()> {
    let mut staged: Vec<PathBuf> = Vec::with_capacity(datasets.len());
    for dataset in datasets {
        match stage(dataset) {
            Ok(temp_path) => staged.push(temp_path),
            Err(err) => {
                discard(&staged);
                return Err(err);
            }
        }
    }

    for (index, (dataset, temp_path)) in datasets.iter().zip(&staged).enumerate() {
        if let Err(source) = fs::rename(temp_path, &dataset.path) {
            discard(&staged[index..]);
            let committed: Vec<PathBuf> = datasets[..index]
                .iter()
                .map(|d| d.path.clone())
                .collect();
            discard(&committed);
            return Err(OutputError::Commit {
                temp_path: temp_path.clone(),
                path: dataset.path.clone(),
                source,
            });
        }
        debug!(
            path = %dataset.path.display(),
            features = dataset.records,
            "feature collection written"
        );
    }
    Ok(())
}

/// Temp file beside `path`: `detail.geojson` stages as `detail.geojson.tmp`.
pub fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn stage(dataset: &EncodedDataset) -> Result<PathBuf> {
    let temp_path = staging_path(&dataset.path);
    let written = File::create(&temp_path).and_then(|mut file| {
        file.write_all(&dataset.bytes)?;
        file.sync_all()
    });
    if let Err(source) = written {
        discard(std::slice::from_ref(&temp_path));
        return Err(OutputError::Write {
            path: temp_path,
            source,
        });
    }
    Ok(temp_path)
}

fn discard(paths: &[PathBuf]) {
    for path in paths {
        match fs::remove_file(path) {
            Ok(()) => {}
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
            Err(error) => {
                warn!(path = %path.display(), %error, "failed to remove partial output");
            }
        }
    }
}

/// Convert a frame to a FeatureCollection. Every column becomes a feature
/// property; null geometry gives a feature with `"geometry": null`. The
/// frame's foreign members (e.g. `crs`) are written on the collection.
pub fn frame_to_collection(frame: &GeoFrame) -> Result<FeatureCollection> {
    let columns = frame.data.get_columns();
    let mut features = Vec::with_capacity(frame.height());

    for (row, geometry) in frame.geometry.iter().enumerate() {
        let mut properties = JsonObject::new();
        for column in columns {
            properties.insert(column.name().to_string(), cell_json(column, row)?);
        }
        features.push(Feature {
            bbox: None,
            geometry: geometry
                .as_ref()
                .map(|g| geojson::Geometry::new(geojson::Value::from(g))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        });
    }

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: frame.foreign_members.clone(),
    })
}

fn cell_json(column: &Column, row: usize) -> Result<JsonValue> {
    let value = column.get(row).unwrap_or(AnyValue::Null);
    any_to_json(&value).ok_or_else(|| OutputError::UnsupportedValue {
        column: column.name().to_string(),
        dtype: value.dtype().to_string(),
    })
}

/// JSON form of a scalar cell. Non-finite floats become null; `None` means
/// the type has no property representation.
pub fn any_to_json(value: &AnyValue) -> Option<JsonValue> {
    let json = match value {
        AnyValue::Null => JsonValue::Null,
        AnyValue::Boolean(v) => JsonValue::Bool(*v),
        AnyValue::String(v) => JsonValue::String((*v).to_string()),
        AnyValue::StringOwned(v) => JsonValue::String(v.to_string()),
        AnyValue::Int8(v) => JsonValue::from(*v),
        AnyValue::Int16(v) => JsonValue::from(*v),
        AnyValue::Int32(v) => JsonValue::from(*v),
        AnyValue::Int64(v) => JsonValue::from(*v),
        AnyValue::UInt8(v) => JsonValue::from(*v),
        AnyValue::UInt16(v) => JsonValue::from(*v),
        AnyValue::UInt32(v) => JsonValue::from(*v),
        AnyValue::UInt64(v) => JsonValue::from(*v),
        AnyValue::Float32(v) => float_json(f64::from(*v)),
        AnyValue::Float64(v) => float_json(*v),
        AnyValue::Date(days) => date_json(*days)?,
        _ => return None,
    };
    Some(json)
}

fn float_json(v: f64) -> JsonValue {
    serde_json::Number::from_f64(v).map_or(JsonValue::Null, JsonValue::Number)
}

/// Polars dates are days since the Unix epoch.
fn date_json(days: i32) -> Option<JsonValue> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)?;
    let date = epoch.checked_add_signed(Duration::days(i64::from(days)))?;
    Some(JsonValue::String(date.format("%Y-%m-%d").to_string()))
}
