//! Polars adapter: `DataFrame` in, `DataFrame` out.
//!
//! Input frames need a temporal `timestamp` or `date` column; price columns
//! are matched to [`Field`] names case-insensitively (`Close`, `close`,
//! `CLOSE`). Columns that don't match a field are ignored. Nulls become NaN
//! and are reported by validation as missing values.

use chrono::{DateTime, NaiveDateTime, Utc};
use polars::prelude::*;

use crate::domain::{BarSeries, Field};
use crate::error::{Result, SignalError};
use crate::indicator::{AugmentedSeries, ColumnValues, Indicator};

const TIME_COLUMNS: [&str; 2] = ["timestamp", "date"];

fn find_column<'a>(df: &'a DataFrame, name: &str) -> Option<&'a Column> {
    df.get_columns()
        .iter()
        .find(|c| c.name().eq_ignore_ascii_case(name))
}

fn time_axis(df: &DataFrame) -> Result<Vec<NaiveDateTime>> {
    let column = TIME_COLUMNS
        .iter()
        .find_map(|name| find_column(df, name))
        .ok_or_else(|| PolarsError::ColumnNotFound("timestamp or date".into()))?;

    let millis = column
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
        .cast(&DataType::Int64)?;
    let millis = millis.i64()?;

    millis
        .into_iter()
        .enumerate()
        .map(|(row, ms)| {
            ms.and_then(DateTime::<Utc>::from_timestamp_millis)
                .map(|dt| dt.naive_utc())
                .ok_or_else(|| {
                    SignalError::from(PolarsError::ComputeError(
                        format!("invalid timestamp at row {row}").into(),
                    ))
                })
        })
        .collect()
}

/// Build a [`BarSeries`] from a frame.
pub fn series_from_frame(df: &DataFrame) -> Result<BarSeries> {
    let mut series = BarSeries::new(time_axis(df)?);
    for field in Field::ALL {
        let Some(column) = find_column(df, field.name()) else {
            continue;
        };
        let values = column.cast(&DataType::Float64)?;
        let values: Vec<f64> = values
            .f64()?
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect();
        series = series.with_column(field, values)?;
    }
    Ok(series)
}

/// Output table as a frame: `timestamp`, the indicator's columns in order,
/// then `signal`.
pub fn to_frame(output: &AugmentedSeries) -> Result<DataFrame> {
    let millis: Vec<i64> = output
        .timestamps()
        .iter()
        .map(|t| t.and_utc().timestamp_millis())
        .collect();

    let mut columns = Vec::with_capacity(output.columns().len() + 2);
    columns.push(
        Column::new("timestamp".into(), millis)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?,
    );
    for column in output.columns() {
        columns.push(match &column.values {
            ColumnValues::Float(values) => Column::new(column.name.into(), values.as_slice()),
            ColumnValues::Int(values) => Column::new(column.name.into(), values.as_slice()),
        });
    }
    let signal: Vec<i64> = output.signal().iter().map(|s| i64::from(s.value())).collect();
    columns.push(Column::new("signal".into(), signal));

    Ok(DataFrame::new(columns)?)
}

/// Run an indicator over a frame and return the augmented frame.
pub fn run_frame(indicator: &dyn Indicator, df: &DataFrame) -> Result<DataFrame> {
    let series = series_from_frame(df)?;
    to_frame(&indicator.run(&series)?)
}
