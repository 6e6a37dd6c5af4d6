//! MACD: fast/slow span-weighted means and their convergence/divergence.
//!
//! - macd = ewm(close, fast) - ewm(close, slow)
//! - signal_line = ewm(macd, period_signal)
//! - con_div = macd - signal_line
//!
//! The combined signal averages the sign of `macd` and the sign of `con_div`:
//! bullish when both agree up, bearish when both agree down, neutral when
//! they disagree.

use serde::{Deserialize, Serialize};

use crate::domain::{Field, Signal};
use crate::error::{Result, SignalError};
use crate::indicator::{AugmentedSeries, Indicator};
use crate::validate::ValidatedSeries;

use super::check_period;
use super::smoothing::ewm_mean;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MacdParams {
    pub period_slow: usize,
    pub period_fast: usize,
    pub period_signal: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            period_slow: 26,
            period_fast: 12,
            period_signal: 9,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Macd {
    params: MacdParams,
    name: String,
}

impl Macd {
    pub fn new(params: MacdParams) -> Result<Self> {
        check_period("period_slow", params.period_slow)?;
        check_period("period_fast", params.period_fast)?;
        check_period("period_signal", params.period_signal)?;
        let (fast, slow) = (params.period_fast, params.period_slow);
        if fast >= slow {
            return Err(SignalError::invalid(
                "period_fast",
                format!("fast period ({fast}) must be smaller than slow period ({slow})"),
            ));
        }
        Ok(Self {
            name: format!("macd_{fast}_{slow}_{}", params.period_signal),
            params,
        })
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn required_fields(&self) -> &'static [Field] {
        &[Field::Close]
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, series: &ValidatedSeries<'_>) -> Result<AugmentedSeries> {
        let close = series.require(Field::Close)?;
        let slow = ewm_mean(close, self.params.period_slow);
        let fast = ewm_mean(close, self.params.period_fast);
        let macd: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal_line = ewm_mean(&macd, self.params.period_signal);
        let con_div: Vec<f64> = macd.iter().zip(&signal_line).map(|(m, s)| m - s).collect();

        let macd_signal: Vec<Signal> = macd.iter().map(|&m| Signal::from_sign(m)).collect();
        let condiv_signal: Vec<Signal> = con_div.iter().map(|&c| Signal::from_sign(c)).collect();
        let signal = macd_signal
            .iter()
            .zip(&condiv_signal)
            .map(|(&a, &b)| combine(a, b))
            .collect();

        Ok(AugmentedSeries::new(self.name.clone(), series.timestamps())
            .float("close", close.to_vec())
            .float("slow_ewma", slow)
            .float("fast_ewma", fast)
            .float("macd", macd)
            .float("signal_line", signal_line)
            .float("con_div", con_div)
            .int("macd_signal", codes(&macd_signal))
            .int("condiv_signal", codes(&condiv_signal))
            .with_signal(signal))
    }
}

/// Mean of two component signals, which only lands on -1, 0 or 1.
fn combine(a: Signal, b: Signal) -> Signal {
    match (i16::from(a.value()) + i16::from(b.value())) / 2 {
        1 => Signal::Bullish,
        -1 => Signal::Bearish,
        _ => Signal::Neutral,
    }
}

fn codes(signals: &[Signal]) -> Vec<i64> {
    signals.iter().map(|s| i64::from(s.value())).collect()
}
