use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use tracing::info;

use acaps_acquire::{Acquisition, HdxClient};
use acaps_model::{CONFIG_FILE_NAME, PipelineConfig};

use crate::pipeline::{RunResult, run};

/// Load `acaps.toml` from the crash move folder, or defaults when absent.
pub fn load_config(root: &Path) -> Result<PipelineConfig> {
    if !root.is_dir() {
        bail!("crash move folder not found: {}", root.display());
    }
    PipelineConfig::load_or_default(root)
        .with_context(|| format!("load {}", root.join(CONFIG_FILE_NAME).display()))
}

/// Run the measures ETL for `root`. Offline runs never touch the network.
pub fn run_measures(
    root: &Path,
    offline: bool,
    config: &PipelineConfig,
    run_date: NaiveDate,
) -> Result<RunResult> {
    if offline {
        info!("offline mode");
        return run(root, config, Acquisition::Offline, run_date);
    }
    let client = HdxClient::new(
        &config.dataset.catalog_url,
        &config.dataset.resource_extension,
    )
    .context("create HDX client")?;
    run(root, config, Acquisition::Remote(&client), run_date)
}
