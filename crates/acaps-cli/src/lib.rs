//! CLI library components for the ACAPS measures ETL.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod pipeline;
pub mod summary;
