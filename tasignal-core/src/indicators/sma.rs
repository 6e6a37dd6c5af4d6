//! Simple Moving Average (SMA).
//!
//! Rolling mean of close prices over a lookback window.
//! Lookback: period - 1 (first valid value at index period-1).
//! Signal: bullish while close is above the average, bearish at or below.

use crate::domain::{Field, Signal};
use crate::error::Result;
use crate::indicator::{AugmentedSeries, Indicator};
use crate::validate::ValidatedSeries;

use super::check_period;
use super::smoothing::rolling_mean;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Result<Self> {
        check_period("period", period)?;
        Ok(Self {
            period,
            name: format!("sma_{period}"),
        })
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn required_fields(&self) -> &'static [Field] {
        &[Field::Close]
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, series: &ValidatedSeries<'_>) -> Result<AugmentedSeries> {
        let close = series.require(Field::Close)?;
        let sma = rolling_mean(close, self.period);
        let delta: Vec<f64> = close.iter().zip(&sma).map(|(c, s)| c - s).collect();
        let signal = delta.iter().map(|&d| Signal::from_sign(d)).collect();

        Ok(AugmentedSeries::new(self.name.clone(), series.timestamps())
            .float("close", close.to_vec())
            .float("sma", sma)
            .float("sma_delta", delta)
            .with_signal(signal))
    }
}
