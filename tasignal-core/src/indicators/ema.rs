//! Exponential Moving Average (EMA).
//!
//! Span-weighted mean of closes (see `smoothing::ewm_mean`), defined from
//! the first bar.
//! Signal: bullish while close is above the average, bearish at or below.

use crate::domain::{Field, Signal};
use crate::error::Result;
use crate::indicator::{AugmentedSeries, Indicator};
use crate::validate::ValidatedSeries;

use super::check_period;
use super::smoothing::ewm_mean;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Result<Self> {
        check_period("period", period)?;
        Ok(Self {
            period,
            name: format!("ema_{period}"),
        })
    }
}

impl Indicator for Ema {
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
        let ewma = ewm_mean(close, self.period);
        let diff: Vec<f64> = close.iter().zip(&ewma).map(|(c, e)| c - e).collect();
        let signal = diff.iter().map(|&d| Signal::from_sign(d)).collect();

        Ok(AugmentedSeries::new(self.name.clone(), series.timestamps())
            .float("close", close.to_vec())
            .float("ewma", ewma)
            .float("ewma_diff", diff)
            .with_signal(signal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, close_only_series, DEFAULT_EPSILON};

    #[test]
    fn ema_period_1_equals_close() {
        let out = Ema::new(1)
            .unwrap()
            .run(&close_only_series(&[100.0, 200.0, 300.0]))
            .unwrap();
        assert_eq!(out.float_column("ewma").unwrap(), &[100.0, 200.0, 300.0]);
        // zero diff is bearish
        assert!(out.signal().iter().all(|s| s.value() == -1));
    }

    #[test]
    fn ema_3_known_values() {
        // alpha = 0.5; adjusted weights over the history seen so far
        let out = Ema::new(3)
            .unwrap()
            .run(&close_only_series(&[1.0, 2.0, 3.0]))
            .unwrap();
        let ewma = out.float_column("ewma").unwrap();
        assert_approx(ewma[0], 1.0, DEFAULT_EPSILON);
        assert_approx(ewma[1], 5.0 / 3.0, DEFAULT_EPSILON);
        assert_approx(ewma[2], 4.25 / 1.75, DEFAULT_EPSILON);
        assert_eq!(out.signal()[2].value(), 1);
    }

    #[test]
    fn ema_rejects_zero_period() {
        assert!(Ema::new(0).is_err());
    }

    #[test]
    fn column_layout() {
        let out = Ema::new(2).unwrap().run(&close_only_series(&[1.0])).unwrap();
        assert_eq!(out.column_names(), vec!["close", "ewma", "ewma_diff", "signal"]);
    }
}
