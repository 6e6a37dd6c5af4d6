//! Concrete indicator implementations.
//!
//! All eight indicators implement the `Indicator` trait from `crate::indicator`.
//! Parabolic SAR is the only one with a multi-field state machine; the rest
//! are rolling or exponentially weighted transforms built on `smoothing`.

pub mod bollinger;
pub mod ema;
pub mod ema_crossover;
pub mod macd;
pub mod parabolic_sar;
pub mod rsi;
pub mod sma;
pub mod smoothing;
pub mod vwap;

pub use bollinger::{Bollinger, BollingerParams};
pub use ema::Ema;
pub use ema_crossover::{EmaCrossover, EmaCrossoverParams};
pub use macd::{Macd, MacdParams};
pub use parabolic_sar::{InitialTrend, ParabolicSar, PsarBar, PsarParams, PsarRow, PsarState};
pub use rsi::{Rsi, RsiParams};
pub use sma::Sma;
pub use vwap::Vwap;

use crate::error::{Result, SignalError};

/// Shared check for window/span parameters.
pub(crate) fn check_period(name: &'static str, period: usize) -> Result<()> {
    if period == 0 {
        return Err(SignalError::invalid(name, "must be a positive integer"));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn ts(i: usize) -> chrono::NaiveDateTime {
    chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        + chrono::Duration::days(i as i64)
}

/// Create a synthetic series from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub(crate) fn make_series(closes: &[f64]) -> crate::domain::BarSeries {
    use crate::domain::Bar;
    let bars: Vec<Bar> = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                timestamp: ts(i),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect();
    crate::domain::BarSeries::from_bars(&bars)
}

/// Series from `(open, high, low, close)` tuples, volume 1000.
#[cfg(test)]
pub(crate) fn ohlc_series(data: &[(f64, f64, f64, f64)]) -> crate::domain::BarSeries {
    use crate::domain::Bar;
    let bars: Vec<Bar> = data
        .iter()
        .enumerate()
        .map(|(i, &(open, high, low, close))| Bar {
            timestamp: ts(i),
            open,
            high,
            low,
            close,
            volume: 1000.0,
        })
        .collect();
    crate::domain::BarSeries::from_bars(&bars)
}

/// Series carrying only a close column.
#[cfg(test)]
pub(crate) fn close_only_series(closes: &[f64]) -> crate::domain::BarSeries {
    crate::domain::BarSeries::new((0..closes.len()).map(ts).collect())
        .with_column(crate::domain::Field::Close, closes.to_vec())
        .unwrap()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub(crate) fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub(crate) const DEFAULT_EPSILON: f64 = 1e-10;
