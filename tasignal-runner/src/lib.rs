//! tasignal runner: batch orchestration around `tasignal-core`.
//!
//! This crate builds on `tasignal-core` to provide:
//! - CSV bar loading (Date, Open, High, Low, Close, Volume)
//! - Runner configuration from TOML (logging, parallelism, series, indicators)
//! - Batch evaluation of many independent series on the rayon pool
//! - Tracing subscriber setup

pub mod batch;
pub mod config;
pub mod error;
pub mod loader;
pub mod telemetry;

pub use batch::{run_config, BatchItem, BatchReport, BatchRunner, NamedSeries};
pub use config::{LogFormat, LoggingConfig, RunnerConfig, SeriesSource};
pub use error::RunnerError;
pub use loader::{load_csv, read_csv, LoadedSeries};
pub use telemetry::init_tracing;
