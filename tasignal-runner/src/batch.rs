//! Batch evaluation of indicators over many independent series.
//!
//! Every (series, indicator) pair is its own job with no shared state, so the
//! jobs can run on the rayon pool. A failure in one job is recorded in its
//! result and does not stop the others.

use anyhow::{Context, Result};
use rayon::prelude::*;
use tasignal_core::fingerprint::{output_fingerprint, Fingerprint};
use tasignal_core::{AugmentedSeries, BarSeries, Indicator, IndicatorConfig, SignalError};
use tracing::{info, warn};

use crate::config::{RunnerConfig, SeriesSource};
use crate::loader::load_csv;

/// A series with the name it is reported under.
#[derive(Debug, Clone)]
pub struct NamedSeries {
    pub name: String,
    pub series: BarSeries,
}

impl NamedSeries {
    pub fn new(name: impl Into<String>, series: BarSeries) -> Self {
        Self {
            name: name.into(),
            series,
        }
    }
}

/// Outcome of one indicator over one series.
#[derive(Debug)]
pub struct BatchItem {
    pub series: String,
    pub indicator: String,
    pub config_hash: Fingerprint,
    pub outcome: std::result::Result<AugmentedSeries, SignalError>,
}

impl BatchItem {
    /// BLAKE3 of the output, for successful runs.
    pub fn output_fingerprint(&self) -> Option<Fingerprint> {
        self.outcome.as_ref().ok().map(output_fingerprint)
    }
}

/// All job results, in series-major, indicator-minor order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub items: Vec<BatchItem>,
}

impl BatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &BatchItem> {
        self.items.iter().filter(|i| i.outcome.is_ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = &BatchItem> {
        self.items.iter().filter(|i| i.outcome.is_err())
    }

    pub fn get(&self, series: &str, indicator: &str) -> Option<&BatchItem> {
        self.items
            .iter()
            .find(|i| i.series == series && i.indicator == indicator)
    }
}

struct Job {
    indicator: Box<dyn Indicator>,
    config_hash: Fingerprint,
}

/// Runs a fixed set of indicators over any number of series.
pub struct BatchRunner {
    jobs: Vec<Job>,
    parallel: bool,
}

impl BatchRunner {
    /// Build every indicator up front; a bad parameter fails the whole batch
    /// before any series is touched.
    pub fn new(configs: &[IndicatorConfig]) -> std::result::Result<Self, SignalError> {
        let jobs = configs
            .iter()
            .map(|cfg| {
                Ok(Job {
                    indicator: cfg.build()?,
                    config_hash: cfg.config_hash()?,
                })
            })
            .collect::<std::result::Result<Vec<_>, SignalError>>()?;
        Ok(Self {
            jobs,
            parallel: true,
        })
    }

    /// Enables or disables parallel execution.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn run(&self, inputs: &[NamedSeries]) -> BatchReport {
        let pairs: Vec<(&NamedSeries, &Job)> = inputs
            .iter()
            .flat_map(|s| self.jobs.iter().map(move |j| (s, j)))
            .collect();

        let evaluate = |&(input, job): &(&NamedSeries, &Job)| {
            let outcome = job.indicator.run(&input.series);
            if let Err(err) = &outcome {
                warn!(
                    series = %input.name,
                    indicator = job.indicator.name(),
                    error = %err,
                    "indicator run failed"
                );
            }
            BatchItem {
                series: input.name.clone(),
                indicator: job.indicator.name().to_string(),
                config_hash: job.config_hash.clone(),
                outcome,
            }
        };

        let items: Vec<BatchItem> = if self.parallel {
            pairs.par_iter().map(evaluate).collect()
        } else {
            pairs.iter().map(evaluate).collect()
        };

        let report = BatchReport { items };
        info!(
            series = inputs.len(),
            indicators = self.jobs.len(),
            succeeded = report.succeeded().count(),
            failed = report.failed().count(),
            parallel = self.parallel,
            "batch complete"
        );
        report
    }
}

/// Load every configured series and run every configured indicator on it.
pub fn run_config(config: &RunnerConfig) -> Result<BatchReport> {
    let runner = BatchRunner::new(&config.indicators)
        .context("invalid indicator configuration")?
        .with_parallelism(config.parallel);

    let inputs = config
        .series
        .iter()
        .map(|source| {
            let SeriesSource { name, path } = source;
            let loaded = load_csv(path)
                .with_context(|| format!("loading series {name} from {}", path.display()))?;
            Ok(NamedSeries::new(name.clone(), loaded.series))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(runner.run(&inputs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use tasignal_core::{Bar, Signal};

    fn series(n: usize, slope: f64) -> BarSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let bars: Vec<Bar> = (0..n)
            .map(|i| {
                let close = 100.0 + slope * i as f64;
                Bar {
                    timestamp: start + Duration::days(i as i64),
                    open: close,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 1000.0,
                }
            })
            .collect();
        BarSeries::from_bars(&bars)
    }

    fn configs() -> Vec<IndicatorConfig> {
        vec![
            IndicatorConfig::Psar(Default::default()),
            IndicatorConfig::Sma { period: 3 },
        ]
    }

    #[test]
    fn runs_every_pair_in_order() {
        let inputs = vec![
            NamedSeries::new("up", series(10, 1.0)),
            NamedSeries::new("down", series(10, -1.0)),
        ];
        let report = BatchRunner::new(&configs()).unwrap().run(&inputs);
        let order: Vec<(&str, &str)> = report
            .items
            .iter()
            .map(|i| (i.series.as_str(), i.indicator.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("up", "psar_0.02_0.02_0.2"),
                ("up", "sma_3"),
                ("down", "psar_0.02_0.02_0.2"),
                ("down", "sma_3"),
            ]
        );
        let up = report.get("up", "psar_0.02_0.02_0.2").unwrap();
        let out = up.outcome.as_ref().unwrap();
        assert!(out.signal().iter().all(|&s| s == Signal::Bullish));
    }

    #[test]
    fn one_bad_series_does_not_stop_the_rest() {
        let empty = NamedSeries::new("empty", BarSeries::new(Vec::new()));
        let inputs = vec![empty, NamedSeries::new("ok", series(5, 1.0))];
        let report = BatchRunner::new(&configs()).unwrap().run(&inputs);
        assert_eq!(report.failed().count(), 2);
        assert_eq!(report.succeeded().count(), 2);
        assert!(report.failed().all(|i| i.series == "empty"));
        assert!(matches!(
            report.get("empty", "sma_3").unwrap().outcome,
            Err(SignalError::EmptySeries)
        ));
    }

    #[test]
    fn parallel_and_sequential_agree_bit_for_bit() {
        let inputs: Vec<NamedSeries> = (0..8)
            .map(|k| NamedSeries::new(format!("s{k}"), series(50, k as f64 - 4.0)))
            .collect();
        let runner = BatchRunner::new(&configs()).unwrap();
        let par = runner.run(&inputs);
        let runner = runner.with_parallelism(false);
        let seq = runner.run(&inputs);
        assert_eq!(par.items.len(), seq.items.len());
        for (a, b) in par.items.iter().zip(&seq.items) {
            assert_eq!(a.series, b.series);
            assert_eq!(a.output_fingerprint(), b.output_fingerprint());
            assert_eq!(a.config_hash, b.config_hash);
        }
    }

    #[test]
    fn invalid_config_fails_before_running() {
        let bad = vec![IndicatorConfig::Sma { period: 0 }];
        assert!(matches!(
            BatchRunner::new(&bad),
            Err(SignalError::InvalidParameter { .. })
        ));
    }
}
