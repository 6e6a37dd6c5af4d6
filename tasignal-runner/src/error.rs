use std::path::PathBuf;

use tasignal_core::SignalError;
use thiserror::Error;

/// Errors from loading data and configuration in the runner.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("csv has no date column (expected one of {expected:?})")]
    MissingDateColumn { expected: &'static [&'static str] },

    #[error("invalid timestamp {value:?} in data row {row}")]
    InvalidTimestamp { row: usize, value: String },

    #[error(transparent)]
    Signal(#[from] SignalError),
}
