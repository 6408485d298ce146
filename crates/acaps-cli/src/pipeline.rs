//! Measures ETL pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Acquire**: Fetch the workbook from HDX, or reuse the newest local one
//! 2. **Load**: Read measure records from the workbook
//! 3. **Aggregate**: Count measures per country, month, category, and log type
//! 4. **Geography**: Read the country boundary layer
//! 5. **Join**: Outer join measures and aggregates onto the boundaries
//! 6. **Reduce**: Replace detail polygons with interior points, rename fields
//! 7. **Export**: Write the dated detail and summary datasets
//!
//! Each stage takes the output of the previous stage and returns typed results.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{info, info_span};

use acaps_acquire::{Acquisition, acquire_workbook};
use acaps_ingest::{LoadedMeasures, load_geography, load_measures};
use acaps_model::{PipelineConfig, columns, measures_frame};
use acaps_output::{ExportResult, OutputLayout, export};
use acaps_transform::{JoinReport, aggregate_measures, outer_join, reduce_to_points};

/// Counts from the load stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Non-empty data rows in the sheet.
    pub rows_read: usize,
    /// Records kept after dropping rows without a region.
    pub records: usize,
    pub dropped_without_region: usize,
    pub undated: usize,
}

impl From<&LoadedMeasures> for LoadStats {
    fn from(loaded: &LoadedMeasures) -> Self {
        Self {
            rows_read: loaded.rows_read,
            records: loaded.records.len(),
            dropped_without_region: loaded.dropped_without_region,
            undated: loaded.undated,
        }
    }
}

/// Result of the stages after loading.
#[derive(Debug, Clone)]
pub struct ProcessResult {
    /// Measure groups in the summary.
    pub aggregates: usize,
    /// Features in the boundary layer.
    pub geography_features: usize,
    pub detail_join: JoinReport,
    pub summary_join: JoinReport,
    pub export: ExportResult,
}

/// Result of a full run.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Workbook the run read.
    pub workbook: PathBuf,
    pub measures: LoadStats,
    pub processed: ProcessResult,
}

/// Run every stage for the crash move folder at `root`.
pub fn run(
    root: &Path,
    config: &PipelineConfig,
    acquisition: Acquisition<'_>,
    run_date: NaiveDate,
) -> Result<RunResult> {
    let run_span = info_span!("run", root = %root.display(), %run_date);
    let _run_guard = run_span.enter();
    let run_start = Instant::now();

    let workbook = info_span!("acquire").in_scope(|| -> Result<PathBuf> {
        let start = Instant::now();
        let path = acquire_workbook(acquisition, &config.dataset, &config.paths, root)
            .context("acquire measures workbook")?;
        info!(
            path = %path.display(),
            duration_ms = start.elapsed().as_millis(),
            "acquire complete"
        );
        Ok(path)
    })?;

    let loaded = info_span!("load").in_scope(|| -> Result<LoadedMeasures> {
        let start = Instant::now();
        let loaded = load_measures(&workbook, &config.dataset.sheet)
            .with_context(|| format!("load measures from {}", workbook.display()))?;
        info!(
            records = loaded.records.len(),
            duration_ms = start.elapsed().as_millis(),
            "load complete"
        );
        Ok(loaded)
    })?;

    let processed = process_measures(root, config, &loaded, run_date)?;

    info!(
        duration_ms = run_start.elapsed().as_millis(),
        "run complete"
    );
    Ok(RunResult {
        workbook,
        measures: LoadStats::from(&loaded),
        processed,
    })
}

/// Run the stages after loading: aggregate, join, reduce, and export.
pub fn process_measures(
    root: &Path,
    config: &PipelineConfig,
    loaded: &LoadedMeasures,
    run_date: NaiveDate,
) -> Result<ProcessResult> {
    let (measures, aggregated) = info_span!("aggregate").in_scope(|| -> Result<_> {
        let start = Instant::now();
        let measures = measures_frame(&loaded.records).context("build measures frame")?;
        let aggregated = aggregate_measures(&measures).context("aggregate measures")?;
        info!(
            measures = measures.height(),
            groups = aggregated.height(),
            duration_ms = start.elapsed().as_millis(),
            "aggregate complete"
        );
        Ok((measures, aggregated))
    })?;

    let geography_path = config.paths.geography_path(root);
    let geography = info_span!("geography").in_scope(|| -> Result<_> {
        let start = Instant::now();
        let geography = load_geography(&geography_path)
            .with_context(|| format!("load geography from {}", geography_path.display()))?;
        info!(
            features = geography.height(),
            duration_ms = start.elapsed().as_millis(),
            "geography complete"
        );
        Ok(geography)
    })?;

    let (detail, detail_join, summary, summary_join) =
        info_span!("join").in_scope(|| -> Result<_> {
            let start = Instant::now();
            let (detail, detail_join) =
                outer_join(&geography, &measures, columns::ISO).context("join measures")?;
            let (summary, summary_join) =
                outer_join(&geography, &aggregated, columns::ISO).context("join aggregates")?;
            info!(
                detail = detail.height(),
                summary = summary.height(),
                duration_ms = start.elapsed().as_millis(),
                "join complete"
            );
            Ok((detail, detail_join, summary, summary_join))
        })?;

    let detail = info_span!("reduce").in_scope(|| -> Result<_> {
        let start = Instant::now();
        let detail = reduce_to_points(detail).context("reduce detail geometry")?;
        info!(
            points = detail.geometry_count(),
            duration_ms = start.elapsed().as_millis(),
            "reduce complete"
        );
        Ok(detail)
    })?;

    let exported = info_span!("export").in_scope(|| -> Result<_> {
        let start = Instant::now();
        let layout = OutputLayout::for_run(root, &config.paths, &config.output, run_date)
            .context("resolve output layout")?;
        let written = export(&detail, &summary, &layout)
            .with_context(|| format!("export to {}", layout.dir.display()))?;
        info!(
            dir = %written.dir.display(),
            duration_ms = start.elapsed().as_millis(),
            "export complete"
        );
        Ok(written)
    })?;

    Ok(ProcessResult {
        aggregates: aggregated.height(),
        geography_features: geography.height(),
        detail_join,
        summary_join,
        export: exported,
    })
}
