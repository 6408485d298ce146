//! CLI argument definitions for the ACAPS measures ETL.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "acaps-measures",
    version,
    about = "ACAPS COVID-19 government measures ETL",
    long_about = "Fetch the ACAPS COVID-19 government measures workbook from HDX, \
                  aggregate it per country and month, join it to country boundaries, \
                  and export dated detail and summary GeoJSON datasets.\n\n\
                  Settings are read from acaps.toml in the crash move folder when present."
)]
pub struct Cli {
    /// Crash move folder holding the input/, active/ and output/ directories.
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Offline mode: skip the download and use the newest workbook in active/.
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,
}
