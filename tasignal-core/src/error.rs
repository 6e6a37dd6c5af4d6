//! Error taxonomy for validation, parameter checks and the frame adapter.
//!
//! Every variant is terminal: computation is pure and deterministic, so a
//! caller has to fix the input or the configuration and call again.

use crate::domain::Field;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignalError {
    #[error("series is empty")]
    EmptySeries,

    #[error("missing required column: {field}")]
    MissingColumn { field: Field },

    #[error("time axis is not strictly increasing at position {index}")]
    NonMonotonicIndex { index: usize },

    #[error("missing value in column {field} at position {index}")]
    MissingValue { field: Field, index: usize },

    #[error("column {field} has {actual} values, time axis has {expected}")]
    LengthMismatch {
        field: Field,
        expected: usize,
        actual: usize,
    },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("frame error: {0}")]
    Frame(#[from] polars::error::PolarsError),

    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl SignalError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = SignalError> = std::result::Result<T, E>;
