//! tasignal core: bar series, validation, indicators and signals.
//!
//! This crate contains everything needed to turn an ordered OHLCV series into
//! an annotated one:
//! - Domain types (bars, columnar series, trend, signal)
//! - Series validation (non-empty, monotonic time axis, required fields)
//! - Parabolic SAR as a pure `step(state, bar)` state machine
//! - Columnar indicators (SMA, EMA, EMA crossover, Bollinger, MACD, RSI, VWAP)
//! - Serializable indicator configuration and BLAKE3 fingerprints
//! - A polars `DataFrame` adapter

pub mod config;
pub mod domain;
pub mod error;
pub mod fingerprint;
pub mod frame;
pub mod indicator;
pub mod indicators;
pub mod validate;

pub use config::IndicatorConfig;
pub use domain::{Bar, BarSeries, Field, Signal, Trend};
pub use error::{Result, SignalError};
pub use indicator::{AugmentedSeries, ColumnValues, Indicator, OutputColumn};
pub use validate::{validate, ValidatedSeries};
