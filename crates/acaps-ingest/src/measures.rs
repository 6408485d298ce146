//! Measures workbook loading.
//!
//! Reads the ACAPS `Database` sheet with calamine, selects the eight source
//! columns by header name, drops rows without a region, and parses the
//! implementation date. Month and date labels are derived from the parsed
//! date by [`MeasureRecord`].

use std::collections::BTreeMap;
use std::path::Path;

use acaps_model::{MeasureRecord, columns};
use calamine::{Data, Range, Reader, open_workbook_auto};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use tracing::{debug, info};

use crate::error::{IngestError, Result};

/// Text formats accepted for dates stored as strings.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Largest serial Excel can represent (9999-12-31).
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// Measures read from one workbook, with load diagnostics.
#[derive(Debug, Clone)]
pub struct LoadedMeasures {
    pub records: Vec<MeasureRecord>,
    /// Non-empty data rows in the sheet.
    pub rows_read: usize,
    /// Rows excluded for an empty or missing region.
    pub dropped_without_region: usize,
    /// Kept rows whose implementation date is missing or unparsable.
    pub undated: usize,
}

/// Load measure records from `sheet` of the workbook at `path`.
///
/// Fails without a partial result when the file cannot be opened, the sheet
/// is missing, or any required column is absent from the header row.
pub fn load_measures(path: &Path, sheet: &str) -> Result<LoadedMeasures> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut workbook = open_workbook_auto(path).map_err(|e| IngestError::Workbook {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let sheet_names = workbook.sheet_names();
    if !sheet_names.iter().any(|name| name == sheet) {
        return Err(IngestError::SheetNotFound {
            sheet: sheet.to_string(),
            path: path.to_path_buf(),
            available: sheet_names.join(", "),
        });
    }

    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| IngestError::Workbook {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let loaded = parse_measures(&range, sheet, path)?;
    info!(
        path = %path.display(),
        rows = loaded.rows_read,
        records = loaded.records.len(),
        dropped_without_region = loaded.dropped_without_region,
        undated = loaded.undated,
        "measures loaded"
    );
    Ok(loaded)
}

/// Build measure records from an in-memory sheet range.
///
/// The first row is the header. `sheet` and `source` are used for error
/// messages only.
pub fn parse_measures(range: &Range<Data>, sheet: &str, source: &Path) -> Result<LoadedMeasures> {
    let mut rows = range.rows();
    let header = rows.next().ok_or_else(|| IngestError::EmptySheet {
        sheet: sheet.to_string(),
        path: source.to_path_buf(),
    })?;
    let layout = ColumnLayout::from_header(header, source)?;

    let mut records = Vec::new();
    let mut rows_read = 0usize;
    let mut dropped_without_region = 0usize;
    let mut undated = 0usize;

    for row in rows {
        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }
        rows_read += 1;

        let Some(region) = layout.text(row, columns::REGION) else {
            dropped_without_region += 1;
            continue;
        };

        let date_implemented = layout.cell(row, columns::DATE_IMPLEMENTED).and_then(cell_date);
        if date_implemented.is_none() {
            undated += 1;
        }

        records.push(MeasureRecord {
            region,
            country: layout.text(row, columns::COUNTRY),
            iso: layout.text(row, columns::ISO),
            category: layout.text(row, columns::CATEGORY),
            measure: layout.text(row, columns::MEASURE),
            date_implemented,
            id: layout.cell(row, columns::ID).and_then(cell_integer),
            log_type: layout.text(row, columns::LOG_TYPE),
        });
    }

    if dropped_without_region > 0 {
        debug!(dropped_without_region, "dropped rows without region");
    }

    Ok(LoadedMeasures {
        records,
        rows_read,
        dropped_without_region,
        undated,
    })
}

/// Positions of the required columns within the header row.
struct ColumnLayout {
    positions: BTreeMap<&'static str, usize>,
}

impl ColumnLayout {
    fn from_header(header: &[Data], source: &Path) -> Result<Self> {
        let mut positions = BTreeMap::new();
        for required in columns::REQUIRED_MEASURE_COLUMNS {
            let position = header.iter().position(|cell| match cell {
                Data::String(name) => name.trim().eq_ignore_ascii_case(required),
                _ => false,
            });
            match position {
                Some(idx) => {
                    positions.insert(required, idx);
                }
                None => {
                    return Err(IngestError::MissingColumn {
                        column: required.to_string(),
                        path: source.to_path_buf(),
                    });
                }
            }
        }
        Ok(Self { positions })
    }

    fn cell<'a>(&self, row: &'a [Data], column: &str) -> Option<&'a Data> {
        self.positions.get(column).and_then(|&idx| row.get(idx))
    }

    fn text(&self, row: &[Data], column: &str) -> Option<String> {
        self.cell(row, column).and_then(cell_text)
    }
}

/// Cell as trimmed, non-empty text.
fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Int(v) => v.to_string(),
        Data::Float(v) => format_numeric(*v),
        Data::Bool(v) => v.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => value.date().format("%Y-%m-%d").to_string(),
            None => dt.as_f64().to_string(),
        },
        _ => return None,
    };
    if text.is_empty() { None } else { Some(text) }
}

/// Formats a floating-point number without a trailing `.0` for whole values.
fn format_numeric(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}

/// Cell as an integer ID.
fn cell_integer(cell: &Data) -> Option<i64> {
    match cell {
        Data::Int(v) => Some(*v),
        Data::Float(v) if v.is_finite() && v.fract() == 0.0 => Some(*v as i64),
        Data::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Cell as a calendar date. Unparsable values are `None`.
pub(crate) fn cell_date(cell: &Data) -> Option<NaiveDate> {
    match cell {
        Data::DateTime(dt) => dt.as_datetime().map(|value| value.date()),
        Data::DateTimeIso(s) | Data::String(s) => parse_date_text(s),
        Data::Float(v) => excel_serial_date(*v),
        Data::Int(v) => excel_serial_date(*v as f64),
        _ => None,
    }
}

/// Parse a date written as text.
pub(crate) fn parse_date_text(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed.date());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

/// Convert an Excel serial day number (1900 date system) to a date.
fn excel_serial_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 || serial > MAX_EXCEL_SERIAL {
        return None;
    }
    // Serial 60 is the phantom 1900-02-29; the 1899-12-30 epoch absorbs it
    // for every date after February 1900.
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.trunc() as i64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_text_formats() {
        let expected = NaiveDate::from_ymd_opt(2020, 3, 15);
        assert_eq!(parse_date_text("2020-03-15"), expected);
        assert_eq!(parse_date_text(" 2020-03-15 00:00:00 "), expected);
        assert_eq!(parse_date_text("2020-03-15T08:30:00"), expected);
        assert_eq!(parse_date_text("15/03/2020"), expected);
    }

    #[test]
    fn test_parse_date_text_rejects_garbage() {
        assert_eq!(parse_date_text(""), None);
        assert_eq!(parse_date_text("not a date"), None);
        assert_eq!(parse_date_text("2020-13-45"), None);
    }

    #[test]
    fn test_excel_serial_date() {
        // 43905 is 2020-03-15 in the 1900 date system.
        assert_eq!(
            cell_date(&Data::Float(43905.0)),
            NaiveDate::from_ymd_opt(2020, 3, 15)
        );
        assert_eq!(
            cell_date(&Data::Int(43905)),
            NaiveDate::from_ymd_opt(2020, 3, 15)
        );
        assert_eq!(cell_date(&Data::Float(-3.0)), None);
        assert_eq!(cell_date(&Data::Float(f64::NAN)), None);
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::String("  Asia ".to_string())), Some("Asia".to_string()));
        assert_eq!(cell_text(&Data::String("   ".to_string())), None);
        assert_eq!(cell_text(&Data::Empty), None);
        assert_eq!(cell_text(&Data::Float(12.0)), Some("12".to_string()));
        assert_eq!(cell_text(&Data::Float(1.5)), Some("1.5".to_string()));
    }

    #[test]
    fn test_cell_integer() {
        assert_eq!(cell_integer(&Data::Float(7.0)), Some(7));
        assert_eq!(cell_integer(&Data::Int(9)), Some(9));
        assert_eq!(cell_integer(&Data::String(" 11 ".to_string())), Some(11));
        assert_eq!(cell_integer(&Data::Float(7.5)), None);
        assert_eq!(cell_integer(&Data::Empty), None);
    }
}
