//! Relative Strength Index (RSI) with Wilder smoothing.
//!
//! Lookback: period. Signal: bearish (overbought) at or above `overbought`,
//! bullish (oversold) at or below `oversold`, neutral in between.

use serde::{Deserialize, Serialize};

use crate::domain::{Field, Signal};
use crate::error::{Result, SignalError};
use crate::indicator::{AugmentedSeries, Indicator};
use crate::validate::ValidatedSeries;

use super::check_period;
use super::smoothing::wilder_rsi;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RsiParams {
    pub period: usize,
    pub overbought: f64,
    pub oversold: f64,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self {
            period: 14,
            overbought: 70.0,
            oversold: 30.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Rsi {
    params: RsiParams,
    name: String,
}

impl Rsi {
    pub fn new(params: RsiParams) -> Result<Self> {
        check_period("period", params.period)?;
        let in_range = |v: f64| (0.0..=100.0).contains(&v);
        if !in_range(params.overbought) {
            return Err(SignalError::invalid("overbought", "must lie in 0..=100"));
        }
        if !in_range(params.oversold) {
            return Err(SignalError::invalid("oversold", "must lie in 0..=100"));
        }
        let RsiParams {
            period,
            overbought,
            oversold,
        } = params;
        if oversold >= overbought {
            return Err(SignalError::invalid(
                "oversold",
                format!("oversold ({oversold}) must be below overbought ({overbought})"),
            ));
        }
        Ok(Self {
            name: format!("rsi_{period}"),
            params,
        })
    }

    fn classify(&self, rsi: f64) -> Signal {
        if rsi.is_nan() {
            Signal::Neutral
        } else if rsi >= self.params.overbought {
            Signal::Bearish
        } else if rsi <= self.params.oversold {
            Signal::Bullish
        } else {
            Signal::Neutral
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn required_fields(&self) -> &'static [Field] {
        &[Field::Close]
    }

    fn lookback(&self) -> usize {
        self.params.period
    }

    fn compute(&self, series: &ValidatedSeries<'_>) -> Result<AugmentedSeries> {
        let close = series.require(Field::Close)?;
        let rsi = wilder_rsi(close, self.params.period);
        let signal = rsi.iter().map(|&r| self.classify(r)).collect();

        Ok(AugmentedSeries::new(self.name.clone(), series.timestamps())
            .float("close", close.to_vec())
            .float("rsi", rsi)
            .with_signal(signal))
    }
}
