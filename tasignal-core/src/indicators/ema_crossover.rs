//! EMA crossover: fast span-weighted mean against a slow one.
//!
//! Signal: bullish while the fast average is above the slow one.

use serde::{Deserialize, Serialize};

use crate::domain::{Field, Signal};
use crate::error::{Result, SignalError};
use crate::indicator::{AugmentedSeries, Indicator};
use crate::validate::ValidatedSeries;

use super::check_period;
use super::smoothing::ewm_mean;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmaCrossoverParams {
    pub period_fast: usize,
    pub period_slow: usize,
}

impl Default for EmaCrossoverParams {
    fn default() -> Self {
        Self {
            period_fast: 9,
            period_slow: 13,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EmaCrossover {
    params: EmaCrossoverParams,
    name: String,
}

impl EmaCrossover {
    pub fn new(params: EmaCrossoverParams) -> Result<Self> {
        check_period("period_fast", params.period_fast)?;
        check_period("period_slow", params.period_slow)?;
        let (fast, slow) = (params.period_fast, params.period_slow);
        if fast >= slow {
            return Err(SignalError::invalid(
                "period_fast",
                format!("fast period ({fast}) must be smaller than slow period ({slow})"),
            ));
        }
        Ok(Self {
            name: format!("ema_cross_{fast}_{slow}"),
            params,
        })
    }
}

impl Indicator for EmaCrossover {
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
        let fast = ewm_mean(close, self.params.period_fast);
        let slow = ewm_mean(close, self.params.period_slow);
        let diff: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = diff.iter().map(|&d| Signal::from_sign(d)).collect();

        Ok(AugmentedSeries::new(self.name.clone(), series.timestamps())
            .float("close", close.to_vec())
            .float("fast_ewma", fast)
            .float("slow_ewma", slow)
            .float("ewma_diff", diff)
            .with_signal(signal))
    }
}
