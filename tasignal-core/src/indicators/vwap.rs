//! Volume Weighted Average Price (VWAP), accumulated per calendar day.
//!
//! avg_price = (high + low + close) / 3. Cumulative volume and price*volume
//! restart whenever the timestamp's date changes. A day with no volume yet
//! reports its typical price.
//!
//! Signal: bullish while the VWAP is above the close, neutral otherwise.

use crate::domain::{Field, Signal};
use crate::error::Result;
use crate::indicator::{AugmentedSeries, Indicator};
use crate::validate::ValidatedSeries;

const REQUIRED: [Field; 4] = [Field::Close, Field::High, Field::Low, Field::Volume];

#[derive(Debug, Clone, Copy, Default)]
pub struct Vwap;

impl Vwap {
    pub fn new() -> Self {
        Self
    }
}

impl Indicator for Vwap {
    fn name(&self) -> &str {
        "vwap"
    }

    fn required_fields(&self) -> &'static [Field] {
        &REQUIRED
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, series: &ValidatedSeries<'_>) -> Result<AugmentedSeries> {
        let close = series.require(Field::Close)?;
        let high = series.require(Field::High)?;
        let low = series.require(Field::Low)?;
        let volume = series.require(Field::Volume)?;
        let timestamps = series.timestamps();

        let n = series.len();
        let mut avg_price = Vec::with_capacity(n);
        let mut cum_vol = Vec::with_capacity(n);
        let mut vwap = Vec::with_capacity(n);

        let mut day = None;
        let mut vol_sum = 0.0;
        let mut pv_sum = 0.0;
        for i in 0..n {
            let date = timestamps[i].date();
            if day != Some(date) {
                day = Some(date);
                vol_sum = 0.0;
                pv_sum = 0.0;
            }
            let typical = (high[i] + low[i] + close[i]) / 3.0;
            vol_sum += volume[i];
            pv_sum += typical * volume[i];
            avg_price.push(typical);
            cum_vol.push(vol_sum);
            vwap.push(if vol_sum == 0.0 {
                typical
            } else {
                pv_sum / vol_sum
            });
        }

        let signal = vwap
            .iter()
            .zip(close)
            .map(|(&v, &c)| {
                if v > c {
                    Signal::Bullish
                } else {
                    Signal::Neutral
                }
            })
            .collect();

        Ok(AugmentedSeries::new(self.name(), timestamps)
            .float("close", close.to_vec())
            .float("avg_price", avg_price)
            .float("daily_cum_vol", cum_vol)
            .float("vwap", vwap)
            .with_signal(signal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BarSeries;
    use crate::error::SignalError;
    use crate::indicators::{assert_approx, close_only_series, DEFAULT_EPSILON};
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn intraday(rows: &[(NaiveDateTime, f64, f64, f64, f64)]) -> BarSeries {
        let col = |f: fn(&(NaiveDateTime, f64, f64, f64, f64)) -> f64| {
            rows.iter().map(f).collect::<Vec<_>>()
        };
        BarSeries::new(rows.iter().map(|r| r.0).collect())
            .with_column(Field::High, col(|r| r.1))
            .unwrap()
            .with_column(Field::Low, col(|r| r.2))
            .unwrap()
            .with_column(Field::Close, col(|r| r.3))
            .unwrap()
            .with_column(Field::Volume, col(|r| r.4))
            .unwrap()
    }

    #[test]
    fn accumulates_within_a_day_and_resets_across_days() {
        let series = intraday(&[
            (at(4, 10), 12.0, 8.0, 10.0, 100.0),  // typical 10
            (at(4, 11), 22.0, 18.0, 20.0, 300.0), // typical 20
            (at(5, 10), 32.0, 28.0, 30.0, 50.0),  // new day, typical 30
        ]);
        let out = Vwap::new().run(&series).unwrap();
        let vwap = out.float_column("vwap").unwrap();
        let cum = out.float_column("daily_cum_vol").unwrap();
        assert_approx(vwap[0], 10.0, DEFAULT_EPSILON);
        // (10*100 + 20*300) / 400 = 17.5
        assert_approx(vwap[1], 17.5, DEFAULT_EPSILON);
        assert_approx(vwap[2], 30.0, DEFAULT_EPSILON);
        assert_eq!(cum, &[100.0, 400.0, 50.0]);
        // 17.5 < close 20 → neutral; first and last bars equal their close
        let signal: Vec<i8> = out.signal().iter().map(|s| s.value()).collect();
        assert_eq!(signal, vec![0, 0, 0]);
    }

    #[test]
    fn vwap_above_close_is_bullish() {
        let series = intraday(&[
            (at(4, 10), 30.0, 20.0, 25.0, 1000.0),
            (at(4, 11), 12.0, 9.0, 10.0, 10.0),
        ]);
        let out = Vwap::new().run(&series).unwrap();
        assert_eq!(out.signal()[1], Signal::Bullish);
    }

    #[test]
    fn zero_volume_falls_back_to_typical_price() {
        let series = intraday(&[(at(4, 10), 12.0, 6.0, 9.0, 0.0)]);
        let out = Vwap::new().run(&series).unwrap();
        assert_approx(out.float_column("vwap").unwrap()[0], 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn requires_volume() {
        let err = Vwap::new().run(&close_only_series(&[1.0])).unwrap_err();
        assert!(matches!(err, SignalError::MissingColumn { .. }));
    }
}
