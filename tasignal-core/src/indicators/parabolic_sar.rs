//! Parabolic SAR: Wilder's acceleration factor system.
//!
//! Inherently sequential/stateful: the trend direction, extreme point (EP),
//! acceleration factor (AF) and last stop are carried bar to bar in a
//! [`PsarState`] value, and every transition goes through the pure
//! [`ParabolicSar::step`]. A series run is a left fold of `step` over the
//! bars after [`ParabolicSar::seed`].
//!
//! Parameters: af_start (default 0.02), af_step (default 0.02), af_max (default 0.20).
//! Lookback: 0 (bar 0 gets a seeded row).

use serde::{Deserialize, Serialize};

use crate::domain::{Field, Signal, Trend};
use crate::error::{Result, SignalError};
use crate::indicator::{AugmentedSeries, Indicator};
use crate::validate::ValidatedSeries;

/// How the trend of bar 0 is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialTrend {
    /// Up if close[1] > close[0], Down if lower, `on_flat` if equal.
    /// A single-bar series starts Up.
    FirstMove { on_flat: Trend },
    /// Always start in the given direction.
    Fixed(Trend),
}

impl Default for InitialTrend {
    fn default() -> Self {
        InitialTrend::FirstMove {
            on_flat: Trend::Down,
        }
    }
}

impl InitialTrend {
    pub fn resolve(self, first_close: f64, second_close: Option<f64>) -> Trend {
        match self {
            InitialTrend::Fixed(trend) => trend,
            InitialTrend::FirstMove { on_flat } => match second_close {
                None => Trend::Up,
                Some(next) if next > first_close => Trend::Up,
                Some(next) if next < first_close => Trend::Down,
                Some(_) => on_flat,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PsarParams {
    pub af_start: f64,
    pub af_step: f64,
    pub af_max: f64,
    pub initial_trend: InitialTrend,
}

impl Default for PsarParams {
    fn default() -> Self {
        Self {
            af_start: 0.02,
            af_step: 0.02,
            af_max: 0.20,
            initial_trend: InitialTrend::default(),
        }
    }
}

impl PsarParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.af_start.is_finite() && self.af_start > 0.0) {
            return Err(SignalError::invalid("af_start", "must be finite and > 0"));
        }
        if !(self.af_step.is_finite() && self.af_step > 0.0) {
            return Err(SignalError::invalid("af_step", "must be finite and > 0"));
        }
        if !(self.af_max.is_finite() && self.af_max >= self.af_start) {
            return Err(SignalError::invalid(
                "af_max",
                format!("must be finite and >= af_start ({af_start})", af_start = self.af_start),
            ));
        }
        Ok(())
    }
}

/// The price fields one PSAR step reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PsarBar {
    pub close: f64,
    pub high: f64,
    pub low: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighLow {
    pub high: f64,
    pub low: f64,
}

impl From<PsarBar> for HighLow {
    fn from(bar: PsarBar) -> Self {
        Self {
            high: bar.high,
            low: bar.low,
        }
    }
}

/// State carried from one bar to the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PsarState {
    pub trend: Trend,
    pub af: f64,
    pub extreme_price: f64,
    /// Post-clamp stop of the bar that produced this state.
    pub sar: f64,
    /// Ranges of the last two bars, most recent first. Feeds the gap clamp.
    pub recent: [Option<HighLow>; 2],
}

/// One output row per input bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PsarRow {
    pub close: f64,
    pub low: f64,
    pub high: f64,
    pub af: f64,
    pub trend: Trend,
    pub trend_high: f64,
    pub trend_low: f64,
    pub ep: f64,
    pub psar_init: f64,
    pub psar_final: f64,
    pub signal: Signal,
}

const REQUIRED: &[Field] = &[Field::Close, Field::High, Field::Low];

#[derive(Debug, Clone)]
pub struct ParabolicSar {
    params: PsarParams,
    name: String,
}

impl ParabolicSar {
    pub fn new(params: PsarParams) -> Result<Self> {
        params.validate()?;
        Ok(Self::unchecked(params))
    }

    /// Default parameters: 0.02, 0.02, 0.20, first-move initial trend.
    pub fn default_params() -> Self {
        Self::unchecked(PsarParams::default())
    }

    fn unchecked(params: PsarParams) -> Self {
        let PsarParams {
            af_start,
            af_step,
            af_max,
            ..
        } = params;
        Self {
            name: format!("psar_{af_start}_{af_step}_{af_max}"),
            params,
        }
    }

    pub fn params(&self) -> &PsarParams {
        &self.params
    }

    /// State and row for bar 0. `second_close` is bar 1's close, if any.
    pub fn seed(&self, first: PsarBar, second_close: Option<f64>) -> (PsarState, PsarRow) {
        let trend = self.params.initial_trend.resolve(first.close, second_close);
        let (extreme_price, sar) = match trend {
            Trend::Up => (first.high, first.low),
            Trend::Down => (first.low, first.high),
        };
        let state = PsarState {
            trend,
            af: self.params.af_start,
            extreme_price,
            sar,
            recent: [Some(first.into()), None],
        };
        (state, row(first, &state, sar))
    }

    /// Advance the state machine by one bar.
    pub fn step(&self, state: PsarState, bar: PsarBar) -> (PsarState, PsarRow) {
        let PsarState {
            mut trend,
            mut af,
            mut extreme_price,
            sar,
            recent,
        } = state;

        let psar_init = sar + af * (extreme_price - sar);
        let mut psar_final = gap_clamp(trend, psar_init, &recent);

        let touched = match trend {
            Trend::Up => bar.low <= psar_final,
            Trend::Down => bar.high >= psar_final,
        };
        if touched {
            trend = trend.reversed();
            psar_final = extreme_price;
            af = self.params.af_start;
            extreme_price = match trend {
                Trend::Up => bar.high,
                Trend::Down => bar.low,
            };
        } else {
            match trend {
                Trend::Up if bar.high > extreme_price => {
                    extreme_price = bar.high;
                    af = self.bump(af);
                }
                Trend::Down if bar.low < extreme_price => {
                    extreme_price = bar.low;
                    af = self.bump(af);
                }
                _ => {}
            }
        }

        let next = PsarState {
            trend,
            af,
            extreme_price,
            sar: psar_final,
            recent: [Some(bar.into()), recent[0]],
        };
        (next, row(bar, &next, psar_init))
    }

    /// Run the full series: one row per bar, in order.
    pub fn rows(&self, series: &ValidatedSeries<'_>) -> Result<Vec<PsarRow>> {
        let close = series.require(Field::Close)?;
        let high = series.require(Field::High)?;
        let low = series.require(Field::Low)?;
        let bar_at = |i: usize| PsarBar {
            close: close[i],
            high: high[i],
            low: low[i],
        };

        let n = series.len();
        let mut rows = Vec::with_capacity(n);
        if n == 0 {
            return Ok(rows);
        }

        let (mut state, first) = self.seed(bar_at(0), close.get(1).copied());
        rows.push(first);
        for i in 1..n {
            let (next, out) = self.step(state, bar_at(i));
            if next.trend != state.trend {
                tracing::trace!(bar = i, trend = ?next.trend, sar = next.sar, "psar reversal");
            }
            state = next;
            rows.push(out);
        }
        Ok(rows)
    }

    fn bump(&self, af: f64) -> f64 {
        (af + self.params.af_step).min(self.params.af_max)
    }
}

/// Keep the stop out of the previous one or two bars' range.
fn gap_clamp(trend: Trend, value: f64, recent: &[Option<HighLow>; 2]) -> f64 {
    recent.iter().flatten().fold(value, |acc, range| match trend {
        Trend::Up => acc.min(range.low),
        Trend::Down => acc.max(range.high),
    })
}

fn row(bar: PsarBar, state: &PsarState, psar_init: f64) -> PsarRow {
    PsarRow {
        close: bar.close,
        low: bar.low,
        high: bar.high,
        af: state.af,
        trend: state.trend,
        trend_high: bar.high,
        trend_low: bar.low,
        ep: state.extreme_price,
        psar_init,
        psar_final: state.sar,
        signal: state.trend.into(),
    }
}

impl Indicator for ParabolicSar {
    fn name(&self) -> &str {
        &self.name
    }

    fn required_fields(&self) -> &'static [Field] {
        REQUIRED
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, series: &ValidatedSeries<'_>) -> Result<AugmentedSeries> {
        let rows = self.rows(series)?;
        let col = |f: fn(&PsarRow) -> f64| rows.iter().map(f).collect::<Vec<_>>();

        Ok(AugmentedSeries::new(self.name.clone(), series.timestamps())
            .float("close", col(|r| r.close))
            .float("low", col(|r| r.low))
            .float("high", col(|r| r.high))
            .float("af", col(|r| r.af))
            .int("trend", rows.iter().map(|r| r.trend.code()).collect())
            .float("trend_high", col(|r| r.trend_high))
            .float("trend_low", col(|r| r.trend_low))
            .float("ep", col(|r| r.ep))
            .float("psar_init", col(|r| r.psar_init))
            .float("psar_final", col(|r| r.psar_final))
            .with_signal(rows.iter().map(|r| r.signal).collect()))
    }
}
