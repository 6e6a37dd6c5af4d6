//! Trend direction and the discrete signal derived from indicators.

use serde::{Deserialize, Serialize};

/// Direction of the current PSAR leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    pub fn reversed(self) -> Self {
        match self {
            Trend::Up => Trend::Down,
            Trend::Down => Trend::Up,
        }
    }

    /// Integer code used in the output `trend` column: 1 = up, 0 = down.
    pub fn code(self) -> i64 {
        match self {
            Trend::Up => 1,
            Trend::Down => 0,
        }
    }
}

/// Discrete directional signal, serialized as -1 / 0 / 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Signal {
    Bearish,
    Neutral,
    Bullish,
}

impl Signal {
    pub fn value(self) -> i8 {
        match self {
            Signal::Bearish => -1,
            Signal::Neutral => 0,
            Signal::Bullish => 1,
        }
    }

    /// Bullish above zero, bearish at or below zero, neutral when undefined.
    pub fn from_sign(x: f64) -> Self {
        if x.is_nan() {
            Signal::Neutral
        } else if x > 0.0 {
            Signal::Bullish
        } else {
            Signal::Bearish
        }
    }
}

impl From<Trend> for Signal {
    fn from(trend: Trend) -> Self {
        match trend {
            Trend::Up => Signal::Bullish,
            Trend::Down => Signal::Bearish,
        }
    }
}

impl From<Signal> for i8 {
    fn from(signal: Signal) -> Self {
        signal.value()
    }
}

impl TryFrom<i8> for Signal {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Signal::Bearish),
            0 => Ok(Signal::Neutral),
            1 => Ok(Signal::Bullish),
            other => Err(format!("signal must be -1, 0 or 1, got {other}")),
        }
    }
}
