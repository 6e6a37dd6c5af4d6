//! Series validation: rejects malformed input before any computation.
//!
//! Checks run in a fixed order (empty, missing columns, time axis, missing
//! values) so the reported error is deterministic for a given input.

use chrono::NaiveDateTime;

use crate::domain::{BarSeries, Field};
use crate::error::{Result, SignalError};

/// Read-only view over a series that passed [`validate`].
///
/// Borrows the series; positions and values are exactly those of the input.
/// Remembers which fields were checked so a later `require` of any other
/// field runs the same checks before handing the column out.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedSeries<'a> {
    series: &'a BarSeries,
    checked: [bool; Field::ALL.len()],
}

impl<'a> ValidatedSeries<'a> {
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn timestamps(&self) -> &'a [NaiveDateTime] {
        self.series.timestamps()
    }

    /// Column for a field. Fields outside the validated set are checked here
    /// and may fail with `MissingColumn` or `MissingValue`.
    pub fn require(&self, field: Field) -> Result<&'a [f64]> {
        if self.checked[field.slot()] {
            self.series
                .column(field)
                .ok_or(SignalError::MissingColumn { field })
        } else {
            checked_column(self.series, field)
        }
    }

    /// Whether `field` went through the missing-value check.
    pub fn is_validated(&self, field: Field) -> bool {
        self.checked[field.slot()]
    }

    pub fn series(&self) -> &'a BarSeries {
        self.series
    }
}

/// Validate `series` for an indicator that reads `required` fields.
pub fn validate<'a>(series: &'a BarSeries, required: &[Field]) -> Result<ValidatedSeries<'a>> {
    if series.is_empty() {
        return Err(SignalError::EmptySeries);
    }

    for &field in required {
        if !series.has(field) {
            return Err(SignalError::MissingColumn { field });
        }
    }

    if let Some(index) = series
        .timestamps()
        .windows(2)
        .position(|pair| pair[1] <= pair[0])
    {
        return Err(SignalError::NonMonotonicIndex { index: index + 1 });
    }

    let mut checked = [false; Field::ALL.len()];
    for &field in required {
        checked_column(series, field)?;
        checked[field.slot()] = true;
    }

    Ok(ValidatedSeries { series, checked })
}

fn checked_column(series: &BarSeries, field: Field) -> Result<&[f64]> {
    let values = series
        .column(field)
        .ok_or(SignalError::MissingColumn { field })?;
    match values.iter().position(|v| v.is_nan()) {
        Some(index) => Err(SignalError::MissingValue { field, index }),
        None => Ok(values),
    }
}
