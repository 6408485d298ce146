//! Dataset export for the ACAPS measures pipeline.
//!
//! Writes the point-geometry detail dataset and the polygon-geometry summary
//! dataset as GeoJSON FeatureCollections into a dated output directory.

pub mod error;
pub mod layout;
pub mod writer;

use std::path::PathBuf;

use acaps_model::GeoFrame;
use tracing::info;

pub use error::{OutputError, Result};
pub use layout::OutputLayout;
pub use writer::{
    EncodedDataset, any_to_json, encode_dataset, frame_to_collection, staging_path, write_datasets,
};

/// One written dataset file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenDataset {
    pub path: PathBuf,
    pub records: usize,
}

/// Files written by one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResult {
    pub dir: PathBuf,
    pub detail: WrittenDataset,
    pub summary: WrittenDataset,
}

/// Write both datasets into the layout's directory, creating it if needed.
///
/// Both datasets are converted before the directory is touched, so a value
/// that cannot be exported leaves no output behind. Files from an earlier
/// run on the same date are replaced.
pub fn export(detail: &GeoFrame, summary: &GeoFrame, layout: &OutputLayout) -> Result<ExportResult> {
    let datasets = [
        encode_dataset(detail, &layout.detail_path())?,
        encode_dataset(summary, &layout.summary_path())?,
    ];

    layout.create_dir()?;
    write_datasets(&datasets)?;
    let [detail, summary] = datasets;

    info!(
        dir = %layout.dir.display(),
        detail = detail.records,
        summary = summary.records,
        "datasets exported"
    );

    Ok(ExportResult {
        dir: layout.dir.clone(),
        detail: WrittenDataset {
            path: detail.path,
            records: detail.records,
        },
        summary: WrittenDataset {
            path: summary.path,
            records: summary.records,
        },
    })
}
