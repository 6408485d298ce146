//! Input loading for the ACAPS measures pipeline.
//!
//! This crate reads the two inputs of a run into typed records and frames.
//!
//! # Features
//!
//! - **Measures**: Read the `Database` sheet of the ACAPS workbook, select the
//!   source columns, drop rows without a region, and parse implementation dates
//! - **Geography**: Read the country boundary layer (GeoJSON) into a [`GeoFrame`]
//!   keyed by `ADM0_A3_IS`
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use acaps_ingest::{load_geography, load_measures};
//!
//! let measures = load_measures(Path::new("active/20200326 ACAPS.xlsx"), "Database")?;
//! let geography = load_geography(Path::new("input/wrl_polbnda_int_1m_uncs.geojson"))?;
//! ```
//!
//! [`GeoFrame`]: acaps_model::GeoFrame

mod error;
mod geography;
mod measures;

// === Error Types ===
pub use error::{IngestError, Result};

// === Measures Workbook ===
pub use measures::{LoadedMeasures, load_measures, parse_measures};

// === Boundary Layer ===
pub use geography::{geography_from_collection, load_geography};
