//! Column names shared across pipeline stages.
//!
//! Source names follow the ACAPS `Database` sheet and the country boundary
//! reference layer. Output names are limited to 10 characters so the files
//! stay convertible to DBF-backed formats without truncation.

// === Measures workbook ===
pub const REGION: &str = "REGION";
pub const COUNTRY: &str = "COUNTRY";
pub const ISO: &str = "ISO";
pub const CATEGORY: &str = "CATEGORY";
pub const MEASURE: &str = "MEASURE";
pub const DATE_IMPLEMENTED: &str = "DATE_IMPLEMENTED";
pub const ID: &str = "ID";
pub const LOG_TYPE: &str = "LOG_TYPE";

/// Columns that must be present in the workbook header.
pub const REQUIRED_MEASURE_COLUMNS: [&str; 8] = [
    REGION,
    COUNTRY,
    ISO,
    CATEGORY,
    MEASURE,
    DATE_IMPLEMENTED,
    ID,
    LOG_TYPE,
];

// === Derived ===
pub const MONTH: &str = "MONTH";
pub const COUNT: &str = "COUNT";

/// Grouping key of the aggregate summary, in output column order.
pub const AGGREGATE_KEYS: [&str; 6] = [COUNTRY, REGION, ISO, MONTH, CATEGORY, LOG_TYPE];

// === Geography reference layer ===
pub const SOVEREIGNTY: &str = "SOVEREIGNT";
pub const ADMIN: &str = "ADMIN";
pub const ADMIN_ISO: &str = "ADM0_A3_IS";
pub const SHAPE_LENGTH: &str = "Shape_Leng";
pub const SHAPE_AREA: &str = "Shape_Area";

/// Attribute columns read from each boundary feature.
pub const GEOGRAPHY_COLUMNS: [&str; 5] = [SOVEREIGNTY, ADMIN, ADMIN_ISO, SHAPE_LENGTH, SHAPE_AREA];

/// Maximum field name length accepted by DBF-backed vector formats.
pub const MAX_FIELD_NAME_LEN: usize = 10;

/// Renames applied to the detail dataset before export.
pub const DETAIL_RENAMES: [(&str, &str); 7] = [
    (CATEGORY, "CAT"),
    (DATE_IMPLEMENTED, "DATE_IMPL"),
    (ADMIN_ISO, "ADM0_ISO"),
    (SHAPE_LENGTH, "SHP_LEN"),
    (SHAPE_AREA, "SHP_AREA"),
    (SOVEREIGNTY, "SOV"),
    (ID, "ORIG_FID"),
];
