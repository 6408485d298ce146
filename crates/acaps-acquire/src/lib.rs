//! Dataset acquisition for the ACAPS measures pipeline.
//!
//! The pipeline only needs one thing from this crate: a local path to the
//! newest measures workbook. Online runs fetch it from the HDX catalog into a
//! scratch directory and copy it into the crash move folder's `active`
//! directory; offline runs reuse the newest workbook already there.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use acaps_acquire::{DatasetSource, HdxClient, select_latest};
//!
//! let client = HdxClient::new("https://data.humdata.org", "xlsx")?;
//! let files = client.fetch("acaps-covid19-government-measures-dataset", Path::new("/tmp/acaps"))?;
//! let (name, path) = select_latest(&files).expect("at least one file");
//! println!("{name}: {}", path.display());
//! # Ok::<(), acaps_acquire::AcquireError>(())
//! ```

mod error;
mod fs;
mod hdx;
mod source;
mod workbook;

// === Error Types ===
pub use error::{AcquireError, Result};

// === Catalog ===
pub use hdx::{HdxClient, Resource, parse_package_show};
pub use source::{DatasetSource, FetchedFiles, select_latest};
pub use workbook::{Acquisition, acquire_workbook};

// === Crash Move Folder ===
pub use fs::{copy_into, ensure_dir, latest_file, list_files};
