//! Bollinger Bands: moving average +/- a multiple of the spread, used as a
//! volatility squeeze detector.
//!
//! - Middle: SMA(close, bb_period)
//! - Upper/Lower: middle +/- std_dev * ewm_std(close, span = bb_period)
//! - band_delta: upper - lower; delta_ewma: ewm_mean(band_delta)
//! - band_signal: band_delta - delta_ewma
//!
//! Signal: bullish (volatility incoming) while the bands are narrower than
//! their own average, bearish (volatility already present) otherwise.
//! Lookback: bb_period - 1.

use serde::{Deserialize, Serialize};

use crate::domain::{Field, Signal};
use crate::error::{Result, SignalError};
use crate::indicator::{AugmentedSeries, Indicator};
use crate::validate::ValidatedSeries;

use super::check_period;
use super::smoothing::{ewm_mean, ewm_std, rolling_mean};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BollingerParams {
    pub bb_period: usize,
    pub std_dev: f64,
}

impl Default for BollingerParams {
    fn default() -> Self {
        Self {
            bb_period: 20,
            std_dev: 2.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    params: BollingerParams,
    name: String,
}

impl Bollinger {
    pub fn new(params: BollingerParams) -> Result<Self> {
        check_period("bb_period", params.bb_period)?;
        if !(params.std_dev.is_finite() && params.std_dev > 0.0) {
            return Err(SignalError::invalid("std_dev", "must be finite and > 0"));
        }
        let BollingerParams { bb_period, std_dev } = params;
        Ok(Self {
            name: format!("bollinger_{bb_period}_{std_dev}"),
            params,
        })
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        &self.name
    }

    fn required_fields(&self) -> &'static [Field] {
        &[Field::Close]
    }

    fn lookback(&self) -> usize {
        self.params.bb_period.saturating_sub(1)
    }

    fn compute(&self, series: &ValidatedSeries<'_>) -> Result<AugmentedSeries> {
        let close = series.require(Field::Close)?;
        let period = self.params.bb_period;
        let middle = rolling_mean(close, period);
        let spread = ewm_std(close, period);

        let (upper, lower): (Vec<f64>, Vec<f64>) = middle
            .iter()
            .zip(&spread)
            .map(|(m, s)| {
                let width = self.params.std_dev * s;
                (m + width, m - width)
            })
            .unzip();
        let band_delta: Vec<f64> = upper.iter().zip(&lower).map(|(u, l)| u - l).collect();
        let delta_ewma = ewm_mean(&band_delta, period);
        let band_signal: Vec<f64> = band_delta
            .iter()
            .zip(&delta_ewma)
            .map(|(d, e)| d - e)
            .collect();
        let signal = band_signal
            .iter()
            .map(|&b| match b {
                b if b.is_nan() => Signal::Neutral,
                b if b < 0.0 => Signal::Bullish,
                _ => Signal::Bearish,
            })
            .collect();

        Ok(AugmentedSeries::new(self.name.clone(), series.timestamps())
            .float("close", close.to_vec())
            .float("middle_band", middle)
            .float("upper_band", upper)
            .float("lower_band", lower)
            .float("band_delta", band_delta)
            .float("delta_ewma", delta_ewma)
            .float("band_signal", band_signal)
            .with_signal(signal))
    }
}
