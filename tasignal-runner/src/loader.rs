//! CSV bar loading.
//!
//! Expects a header row with a `Date` (or `Timestamp`) column plus any of
//! `Open, High, Low, Close, Volume` (case as written by common data
//! exporters, or lowercase). A file without a date column is rejected.
//! Extra columns are ignored. Rows with an empty or NaN value in any present
//! column are dropped and logged; row order is kept as is, so an unsorted file
//! surfaces later as a validation error.
//!
//! Timestamps are `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` or
//! `YYYY-MM-DDTHH:MM:SS`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use tasignal_core::{BarSeries, Field};
use tracing::{debug, warn};

use crate::error::RunnerError;

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date", alias = "date", alias = "Timestamp", alias = "timestamp")]
    date: Option<String>,
    #[serde(rename = "Open", alias = "open")]
    open: Option<f64>,
    #[serde(rename = "High", alias = "high")]
    high: Option<f64>,
    #[serde(rename = "Low", alias = "low")]
    low: Option<f64>,
    #[serde(rename = "Close", alias = "close")]
    close: Option<f64>,
    #[serde(rename = "Volume", alias = "volume")]
    volume: Option<f64>,
}

impl CsvRow {
    fn get(&self, field: Field) -> Option<f64> {
        match field {
            Field::Open => self.open,
            Field::High => self.high,
            Field::Low => self.low,
            Field::Close => self.close,
            Field::Volume => self.volume,
        }
        .filter(|v| !v.is_nan())
    }
}

/// A loaded series and how many rows were dropped on the way.
#[derive(Debug, Clone)]
pub struct LoadedSeries {
    pub series: BarSeries,
    pub dropped_rows: usize,
}

pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// Load a CSV file from disk.
pub fn load_csv(path: &Path) -> Result<LoadedSeries, RunnerError> {
    let file = File::open(path).map_err(|source| RunnerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let loaded = read_csv(file)?;
    debug!(
        path = %path.display(),
        bars = loaded.series.len(),
        dropped = loaded.dropped_rows,
        "loaded csv"
    );
    Ok(loaded)
}

/// Read bars from any CSV source.
pub fn read_csv<R: Read>(reader: R) -> Result<LoadedSeries, RunnerError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = rdr.headers()?.clone();
    if !headers.iter().any(|h| DATE_HEADERS.contains(&h)) {
        return Err(RunnerError::MissingDateColumn {
            expected: DATE_HEADERS,
        });
    }
    let present: Vec<Field> = Field::ALL
        .into_iter()
        .filter(|&f| headers.iter().any(|h| header_names(f).contains(&h)))
        .collect();

    let mut timestamps = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); present.len()];
    let mut dropped_rows = 0;

    for (row, record) in rdr.deserialize::<CsvRow>().enumerate() {
        let record = record?;
        let values: Option<Vec<f64>> = present.iter().map(|&f| record.get(f)).collect();
        let (Some(date), Some(values)) = (record.date.as_deref(), values) else {
            warn!(row, "dropping csv row with missing values");
            dropped_rows += 1;
            continue;
        };
        let timestamp = parse_timestamp(date).ok_or_else(|| RunnerError::InvalidTimestamp {
            row,
            value: date.to_string(),
        })?;

        timestamps.push(timestamp);
        for (column, value) in columns.iter_mut().zip(values) {
            column.push(value);
        }
    }

    let mut series = BarSeries::new(timestamps);
    for (field, values) in present.into_iter().zip(columns) {
        series = series.with_column(field, values)?;
    }

    if present_all(&series) {
        for i in 0..series.len() {
            if let Some(bar) = series.bar(i).filter(|b| !b.is_sane()) {
                warn!(row = i, timestamp = %bar.timestamp, "bar outside its own high/low range");
            }
        }
    }

    Ok(LoadedSeries {
        series,
        dropped_rows,
    })
}

/// Header spellings accepted for the time axis; kept in step with `CsvRow`.
const DATE_HEADERS: &[&str] = &["Date", "date", "Timestamp", "timestamp"];

/// Header spellings accepted for a field; kept in step with `CsvRow`.
fn header_names(field: Field) -> [&'static str; 2] {
    match field {
        Field::Open => ["Open", "open"],
        Field::High => ["High", "high"],
        Field::Low => ["Low", "low"],
        Field::Close => ["Close", "close"],
        Field::Volume => ["Volume", "volume"],
    }
}

fn present_all(series: &BarSeries) -> bool {
    Field::ALL.iter().all(|&f| series.has(f))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Date,Open,High,Low,Close,Adj Close,Volume
2024-01-02,10.0,11.0,9.0,10.5,10.5,1000
2024-01-03,10.5,12.0,10.0,11.5,11.5,1200
2024-01-04,11.5,12.5,,12.0,12.0,900
2024-01-05,12.0,13.0,11.0,12.5,12.5,1100
";

    #[test]
    fn reads_standard_layout_and_drops_incomplete_rows() {
        let loaded = read_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(loaded.dropped_rows, 1);
        let series = loaded.series;
        assert_eq!(series.len(), 3);
        assert_eq!(series.column(Field::Close).unwrap(), &[10.5, 11.5, 12.5]);
        assert_eq!(series.column(Field::Volume).unwrap(), &[1000.0, 1200.0, 1100.0]);
        assert_eq!(
            series.timestamps()[2],
            NaiveDate::from_ymd_opt(2024, 1, 5)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn absent_columns_stay_absent() {
        let csv = "date,close\n2024-01-02 09:30:00,1.0\n2024-01-02 10:30:00,2.0\n";
        let series = read_csv(csv.as_bytes()).unwrap().series;
        assert_eq!(series.len(), 2);
        assert!(series.has(Field::Close));
        assert!(!series.has(Field::High));
        assert!(!series.has(Field::Volume));
    }

    #[test]
    fn file_without_date_column_is_rejected() {
        let csv = "Day,Close\n2024-01-02,1.0\n2024-01-03,2.0\n";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, RunnerError::MissingDateColumn { .. }));
        assert!(err.to_string().contains("no date column"));
    }

    #[test]
    fn timestamp_header_names_the_time_axis() {
        let csv = "Timestamp,Close\n2024-01-02 09:30:00,1.0\n";
        let loaded = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(loaded.series.len(), 1);
        assert_eq!(loaded.dropped_rows, 0);
    }

    #[test]
    fn nan_cells_count_as_missing() {
        let csv = "Date,Close\n2024-01-02,NaN\n2024-01-03,2.0\n";
        let loaded = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(loaded.dropped_rows, 1);
        assert_eq!(loaded.series.column(Field::Close).unwrap(), &[2.0]);
    }

    #[test]
    fn bad_timestamp_is_reported_with_row() {
        let csv = "Date,Close\n2024-01-02,1.0\n01/03/2024,2.0\n";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            RunnerError::InvalidTimestamp { row: 1, ref value } if value == "01/03/2024"
        ));
    }

    #[test]
    fn timestamp_formats() {
        let midnight = parse_timestamp("2024-03-04").unwrap();
        assert_eq!(midnight.to_string(), "2024-03-04 00:00:00");
        assert_eq!(
            parse_timestamp("2024-03-04 15:30:00").unwrap().to_string(),
            "2024-03-04 15:30:00"
        );
        assert_eq!(
            parse_timestamp("2024-03-04T15:30:00").unwrap().to_string(),
            "2024-03-04 15:30:00"
        );
        assert!(parse_timestamp("yesterday").is_none());
    }

    proptest::proptest! {
        /// Every data row is either kept or counted as dropped.
        #[test]
        fn rows_are_kept_or_dropped(closes in proptest::collection::vec(
            proptest::option::of(-1e6..1e6_f64), 0..60,
        )) {
            let mut text = String::from("Date,Close\n");
            for (i, close) in closes.iter().enumerate() {
                let cell = close.map(|c| c.to_string()).unwrap_or_default();
                text.push_str(&format!("2024-01-01 00:{:02}:00,{cell}\n", i));
            }
            let loaded = read_csv(text.as_bytes()).unwrap();
            let kept: Vec<f64> = closes.iter().flatten().copied().collect();
            proptest::prop_assert_eq!(loaded.dropped_rows, closes.len() - kept.len());
            proptest::prop_assert_eq!(loaded.series.column(Field::Close).unwrap(), &kept[..]);
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_csv(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, RunnerError::Io { .. }));
    }
}
