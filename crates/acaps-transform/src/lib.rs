//! Transform stages of the ACAPS measures pipeline.
//!
//! - **aggregate**: measure counts per country, month, category, and log type
//! - **join**: full outer join of measure tables onto the boundary layer
//! - **reduce**: interior-point reduction and field renaming for export

pub mod aggregate;
pub mod error;
pub mod join;
pub mod reduce;

pub use aggregate::aggregate_measures;
pub use error::{Result, TransformError};
pub use join::{JoinReport, outer_join};
pub use reduce::{reduce_to_points, rename_detail_columns, representative_point};
