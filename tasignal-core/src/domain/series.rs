//! BarSeries: a columnar, position-indexed sequence of bars.
//!
//! The time axis is mandatory. Each price/volume field is an optional column
//! so that an input lacking, say, `volume` can still feed a close-only
//! indicator, and a PSAR run over it fails with `MissingColumn`.

use chrono::NaiveDateTime;

use super::bar::{Bar, Field};
use crate::error::{Result, SignalError};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarSeries {
    timestamps: Vec<NaiveDateTime>,
    columns: [Option<Vec<f64>>; 5],
}

impl BarSeries {
    /// Series with a time axis and no value columns yet.
    pub fn new(timestamps: Vec<NaiveDateTime>) -> Self {
        Self {
            timestamps,
            columns: Default::default(),
        }
    }

    /// Attach (or replace) a value column. Its length must match the time axis.
    pub fn with_column(mut self, field: Field, values: Vec<f64>) -> Result<Self> {
        if values.len() != self.timestamps.len() {
            return Err(SignalError::LengthMismatch {
                field,
                expected: self.timestamps.len(),
                actual: values.len(),
            });
        }
        self.columns[field.slot()] = Some(values);
        Ok(self)
    }

    /// Series with every field present, in the given order.
    pub fn from_bars(bars: &[Bar]) -> Self {
        let mut columns: [Option<Vec<f64>>; 5] = Default::default();
        for field in Field::ALL {
            columns[field.slot()] = Some(bars.iter().map(|b| b.get(field)).collect());
        }
        Self {
            timestamps: bars.iter().map(|b| b.timestamp).collect(),
            columns,
        }
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn column(&self, field: Field) -> Option<&[f64]> {
        self.columns[field.slot()].as_deref()
    }

    pub fn has(&self, field: Field) -> bool {
        self.columns[field.slot()].is_some()
    }

    /// First `n` positions (or the whole series if shorter).
    pub fn head(&self, n: usize) -> Self {
        let n = n.min(self.len());
        Self {
            timestamps: self.timestamps[..n].to_vec(),
            columns: self.columns.clone().map(|col| {
                col.map(|mut values| {
                    values.truncate(n);
                    values
                })
            }),
        }
    }

    /// Bar at position `index`; absent columns read as NaN.
    pub fn bar(&self, index: usize) -> Option<Bar> {
        let timestamp = *self.timestamps.get(index)?;
        let value = |field: Field| {
            self.column(field)
                .and_then(|col| col.get(index).copied())
                .unwrap_or(f64::NAN)
        };
        Some(Bar {
            timestamp,
            open: value(Field::Open),
            high: value(Field::High),
            low: value(Field::Low),
            close: value(Field::Close),
            volume: value(Field::Volume),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::ts;

    #[test]
    fn with_column_rejects_length_mismatch() {
        let series = BarSeries::new(vec![ts(0), ts(1), ts(2)]);
        let err = series.with_column(Field::Close, vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            SignalError::LengthMismatch {
                field: Field::Close,
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn absent_columns_read_as_nan() {
        let series = BarSeries::new(vec![ts(0)])
            .with_column(Field::Close, vec![10.0])
            .unwrap();
        assert!(series.has(Field::Close));
        assert!(!series.has(Field::High));
        let bar = series.bar(0).unwrap();
        assert_eq!(bar.close, 10.0);
        assert!(bar.high.is_nan());
        assert!(series.bar(1).is_none());
    }

    #[test]
    fn head_truncates_every_column() {
        let series = BarSeries::new(vec![ts(0), ts(1), ts(2)])
            .with_column(Field::Close, vec![1.0, 2.0, 3.0])
            .unwrap()
            .with_column(Field::Volume, vec![5.0, 6.0, 7.0])
            .unwrap();
        let head = series.head(2);
        assert_eq!(head.len(), 2);
        assert_eq!(head.column(Field::Close), Some(&[1.0, 2.0][..]));
        assert_eq!(head.column(Field::Volume), Some(&[5.0, 6.0][..]));
        assert_eq!(series.head(10).len(), 3);
    }
}
