//! Government measure records loaded from the ACAPS workbook.

use chrono::NaiveDate;
use polars::prelude::{Column, DataFrame, NamedFrom, PolarsResult};
use serde::{Deserialize, Serialize};

use crate::columns;

/// Sentinel written for a missing implementation date and its month label.
pub const UNKNOWN: &str = "Unknown";

/// One government policy action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasureRecord {
    /// Never empty; rows without a region are dropped at load time.
    pub region: String,
    pub country: Option<String>,
    /// ISO 3166-1 alpha-3 code, the join key against the boundary layer.
    pub iso: Option<String>,
    pub category: Option<String>,
    pub measure: Option<String>,
    pub date_implemented: Option<NaiveDate>,
    /// Source record ID from the workbook.
    pub id: Option<i64>,
    /// e.g. "Introduction / extension of measures" or "Phase-out measure".
    pub log_type: Option<String>,
}

impl MeasureRecord {
    /// Full English month name of the implementation date, or [`UNKNOWN`].
    pub fn month_label(&self) -> String {
        month_label(self.date_implemented)
    }

    /// Implementation date as `YYYY-MM-DD`, or [`UNKNOWN`].
    pub fn date_label(&self) -> String {
        date_label(self.date_implemented)
    }
}

/// Full English month name for a date (`March`), or [`UNKNOWN`] when absent.
pub fn month_label(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.format("%B").to_string(),
        None => UNKNOWN.to_string(),
    }
}

/// ISO-8601 calendar date string, or [`UNKNOWN`] when absent.
pub fn date_label(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => UNKNOWN.to_string(),
    }
}

/// Build the measures DataFrame used by the aggregate and join stages.
///
/// Column order: REGION, COUNTRY, ISO, CATEGORY, MEASURE, DATE_IMPLEMENTED,
/// ID, LOG_TYPE, MONTH. Dates are rendered through [`date_label`] so the
/// column never holds nulls.
pub fn measures_frame(records: &[MeasureRecord]) -> PolarsResult<DataFrame> {
    let region: Vec<&str> = records.iter().map(|r| r.region.as_str()).collect();
    let country: Vec<Option<&str>> = records.iter().map(|r| r.country.as_deref()).collect();
    let iso: Vec<Option<&str>> = records.iter().map(|r| r.iso.as_deref()).collect();
    let category: Vec<Option<&str>> = records.iter().map(|r| r.category.as_deref()).collect();
    let measure: Vec<Option<&str>> = records.iter().map(|r| r.measure.as_deref()).collect();
    let date: Vec<String> = records.iter().map(MeasureRecord::date_label).collect();
    let id: Vec<Option<i64>> = records.iter().map(|r| r.id).collect();
    let log_type: Vec<Option<&str>> = records.iter().map(|r| r.log_type.as_deref()).collect();
    let month: Vec<String> = records.iter().map(MeasureRecord::month_label).collect();

    DataFrame::new(vec![
        Column::new(columns::REGION.into(), region),
        Column::new(columns::COUNTRY.into(), country),
        Column::new(columns::ISO.into(), iso),
        Column::new(columns::CATEGORY.into(), category),
        Column::new(columns::MEASURE.into(), measure),
        Column::new(columns::DATE_IMPLEMENTED.into(), date),
        Column::new(columns::ID.into(), id),
        Column::new(columns::LOG_TYPE.into(), log_type),
        Column::new(columns::MONTH.into(), month),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: Option<NaiveDate>) -> MeasureRecord {
        MeasureRecord {
            region: "Americas".to_string(),
            country: Some("United States of America".to_string()),
            iso: Some("USA".to_string()),
            category: Some("Lockdown".to_string()),
            measure: Some("Partial lockdown".to_string()),
            date_implemented: date,
            id: Some(42),
            log_type: Some("Introduction / extension of measures".to_string()),
        }
    }

    #[test]
    fn labels_for_dated_record() {
        let rec = record(NaiveDate::from_ymd_opt(2020, 3, 15));
        assert_eq!(rec.month_label(), "March");
        assert_eq!(rec.date_label(), "2020-03-15");
    }

    #[test]
    fn labels_for_undated_record() {
        let rec = record(None);
        assert_eq!(rec.month_label(), UNKNOWN);
        assert_eq!(rec.date_label(), UNKNOWN);
    }

    #[test]
    fn frame_has_one_row_per_record() {
        let df = measures_frame(&[record(None), record(NaiveDate::from_ymd_opt(2020, 4, 1))])
            .unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 9);
        let months = df.column(columns::MONTH).unwrap().str().unwrap();
        assert_eq!(months.get(0), Some(UNKNOWN));
        assert_eq!(months.get(1), Some("April"));
    }
}
