//! ACAPS COVID-19 government measures ETL.

use clap::Parser;

use acaps_cli::cli::Cli;
use acaps_cli::commands::{load_config, run_measures};
use acaps_cli::logging::{LogConfig, init_logging};
use acaps_cli::summary::print_summary;

fn main() {
    let cli = Cli::parse();
    let config = match load_config(&cli.root) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("error: {error:#}");
            std::process::exit(1);
        }
    };
    let log_config = LogConfig::from_settings(&config.logging, &cli.root);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let run_date = chrono::Local::now().date_naive();
    let exit_code = match run_measures(&cli.root, cli.debug, &config, run_date) {
        Ok(result) => {
            print_summary(&result);
            0
        }
        Err(error) => {
            tracing::error!("{error:#}");
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}
