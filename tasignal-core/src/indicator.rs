//! Indicator trait and the augmented output table.
//!
//! Indicators are pure functions: a validated bar series in, the same
//! positions out with value columns and a signal column appended. No state
//! survives between calls.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::{BarSeries, Field, Signal};
use crate::error::Result;
use crate::validate::{validate, ValidatedSeries};

/// Trait for indicators.
///
/// # Look-ahead contamination guard
/// No value at bar t may depend on price data from bar t+1 or later.
/// Every indicator must pass the truncated-vs-full series test.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_20", "psar_0.02_0.02_0.2").
    fn name(&self) -> &str;

    /// Fields the indicator reads; validation requires all of them.
    fn required_fields(&self) -> &'static [Field];

    /// Number of leading bars whose values are warmup (NaN or neutral).
    fn lookback(&self) -> usize;

    /// Compute the indicator over an already-validated series.
    fn compute(&self, series: &ValidatedSeries<'_>) -> Result<AugmentedSeries>;

    /// Validate `series` for this indicator, then compute.
    fn run(&self, series: &BarSeries) -> Result<AugmentedSeries> {
        let view = validate(series, self.required_fields())?;
        tracing::debug!(indicator = self.name(), bars = view.len(), "computing indicator");
        self.compute(&view)
    }
}

/// Values of one output column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColumnValues {
    Float(Vec<f64>),
    Int(Vec<i64>),
}

impl ColumnValues {
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Float(v) => v.len(),
            ColumnValues::Int(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputColumn {
    pub name: &'static str,
    pub values: ColumnValues,
}

/// The input positions augmented with indicator columns and a signal.
///
/// Column order is the documented output order of the indicator; `signal`
/// is always last.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AugmentedSeries {
    indicator: String,
    timestamps: Vec<NaiveDateTime>,
    columns: Vec<OutputColumn>,
    signal: Vec<Signal>,
}

impl AugmentedSeries {
    pub fn new(indicator: impl Into<String>, timestamps: &[NaiveDateTime]) -> Self {
        Self {
            indicator: indicator.into(),
            timestamps: timestamps.to_vec(),
            columns: Vec::new(),
            signal: Vec::new(),
        }
    }

    pub fn float(mut self, name: &'static str, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), self.timestamps.len(), "column {name}");
        self.columns.push(OutputColumn {
            name,
            values: ColumnValues::Float(values),
        });
        self
    }

    pub fn int(mut self, name: &'static str, values: Vec<i64>) -> Self {
        debug_assert_eq!(values.len(), self.timestamps.len(), "column {name}");
        self.columns.push(OutputColumn {
            name,
            values: ColumnValues::Int(values),
        });
        self
    }

    pub fn with_signal(mut self, signal: Vec<Signal>) -> Self {
        debug_assert_eq!(signal.len(), self.timestamps.len(), "signal column");
        self.signal = signal;
        self
    }

    pub fn indicator(&self) -> &str {
        &self.indicator
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

    pub fn columns(&self) -> &[OutputColumn] {
        &self.columns
    }

    pub fn signal(&self) -> &[Signal] {
        &self.signal
    }

    /// Output column names in order, `signal` included.
    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns
            .iter()
            .map(|c| c.name)
            .chain(std::iter::once("signal"))
            .collect()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnValues> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.values)
    }

    pub fn float_column(&self, name: &str) -> Option<&[f64]> {
        match self.column(name)? {
            ColumnValues::Float(v) => Some(v),
            ColumnValues::Int(_) => None,
        }
    }

    pub fn int_column(&self, name: &str) -> Option<&[i64]> {
        match self.column(name)? {
            ColumnValues::Int(v) => Some(v),
            ColumnValues::Float(_) => None,
        }
    }
}
