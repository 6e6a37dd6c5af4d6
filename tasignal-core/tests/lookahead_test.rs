//! Look-ahead contamination tests for all eight indicators.
//!
//! No indicator value at bar t may depend on price data from bar t+1 or later.
//!
//! Method: compute on a truncated series (bars 0..100) and the full series
//! (bars 0..200). Bars 0..100 must be identical between both runs, bit for
//! bit. Any difference means the indicator is leaking future data into past
//! values.

use chrono::{Duration, NaiveDate};
use tasignal_core::indicators::*;
use tasignal_core::{AugmentedSeries, Bar, BarSeries, ColumnValues, Indicator};

/// N bars of synthetic OHLCV, four bars per calendar day so VWAP's daily
/// reset is exercised.
fn make_test_series(n: usize) -> BarSeries {
    let start = NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    let mut price = 100.0;
    let bars: Vec<Bar> = (0..n)
        .map(|i| {
            // Deterministic pseudo-random walk using a simple LCG
            let seed = (i as u64).wrapping_mul(6364136223846793005).wrapping_add(1);
            let change = ((seed % 200) as f64 - 100.0) * 0.05;
            price = (price + change).max(10.0);

            let open = price - 0.5;
            let close = price + 0.3;
            Bar {
                timestamp: start + Duration::days((i / 4) as i64) + Duration::hours((i % 4) as i64),
                open,
                high: open.max(close) + 2.0,
                low: open.min(close) - 2.0,
                close,
                volume: 1000.0 + (i as f64) * 100.0,
            }
        })
        .collect();
    BarSeries::from_bars(&bars)
}

fn same_bits(a: f64, b: f64) -> bool {
    a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan())
}

fn assert_prefix_equal(name: &str, truncated: &AugmentedSeries, full: &AugmentedSeries) {
    let n = truncated.len();
    assert_eq!(truncated.column_names(), full.column_names(), "{name}: layout");
    for (t, f) in truncated.columns().iter().zip(full.columns()) {
        match (&t.values, &f.values) {
            (ColumnValues::Float(t_vals), ColumnValues::Float(f_vals)) => {
                for i in 0..n {
                    assert!(
                        same_bits(t_vals[i], f_vals[i]),
                        "{name}.{}: look-ahead at bar {i} (truncated={}, full={})",
                        t.name,
                        t_vals[i],
                        f_vals[i]
                    );
                }
            }
            (ColumnValues::Int(t_vals), ColumnValues::Int(f_vals)) => {
                assert_eq!(&t_vals[..], &f_vals[..n], "{name}.{}: look-ahead", t.name);
            }
            _ => panic!("{name}.{}: column type differs between runs", t.name),
        }
    }
    assert_eq!(truncated.signal(), &full.signal()[..n], "{name}: signal look-ahead");
}

fn assert_no_lookahead(indicator: &dyn Indicator, full: &BarSeries, truncated_len: usize) {
    let truncated = full.head(truncated_len);
    let full_out = indicator.run(full).unwrap();
    let truncated_out = indicator.run(&truncated).unwrap();

    assert_eq!(truncated_out.len(), truncated_len, "{}: truncated length", indicator.name());
    assert_eq!(full_out.len(), full.len(), "{}: full length", indicator.name());
    assert_prefix_equal(indicator.name(), &truncated_out, &full_out);
}

#[test]
fn lookahead_parabolic_sar() {
    let series = make_test_series(200);
    assert_no_lookahead(&ParabolicSar::default_params(), &series, 100);
}

#[test]
fn lookahead_parabolic_sar_fixed_down_start() {
    let series = make_test_series(200);
    let psar = ParabolicSar::new(PsarParams {
        af_start: 0.01,
        af_step: 0.03,
        af_max: 0.3,
        initial_trend: InitialTrend::Fixed(tasignal_core::Trend::Down),
    })
    .unwrap();
    assert_no_lookahead(&psar, &series, 100);
}

#[test]
fn lookahead_sma() {
    let series = make_test_series(200);
    assert_no_lookahead(&Sma::new(20).unwrap(), &series, 100);
}

#[test]
fn lookahead_ema() {
    let series = make_test_series(200);
    assert_no_lookahead(&Ema::new(20).unwrap(), &series, 100);
}

#[test]
fn lookahead_ema_crossover() {
    let series = make_test_series(200);
    let ind = EmaCrossover::new(EmaCrossoverParams::default()).unwrap();
    assert_no_lookahead(&ind, &series, 100);
}

#[test]
fn lookahead_bollinger() {
    let series = make_test_series(200);
    let ind = Bollinger::new(BollingerParams::default()).unwrap();
    assert_no_lookahead(&ind, &series, 100);
}

#[test]
fn lookahead_macd() {
    let series = make_test_series(200);
    let ind = Macd::new(MacdParams::default()).unwrap();
    assert_no_lookahead(&ind, &series, 100);
}

#[test]
fn lookahead_rsi() {
    let series = make_test_series(200);
    let ind = Rsi::new(RsiParams::default()).unwrap();
    assert_no_lookahead(&ind, &series, 100);
}

#[test]
fn lookahead_vwap() {
    let series = make_test_series(200);
    // cut mid-day so the truncated run ends inside an accumulation window
    assert_no_lookahead(&Vwap::new(), &series, 102);
}

#[test]
fn lookahead_every_truncation_point_psar() {
    let series = make_test_series(60);
    let psar = ParabolicSar::default_params();
    // first-move seeding reads bar 1's close, so prefixes start at two bars
    for len in 2..=60 {
        assert_no_lookahead(&psar, &series, len);
    }
}
