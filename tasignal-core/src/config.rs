//! Serializable indicator configuration.
//!
//! One tagged enum covers every indicator, so a TOML or JSON document can
//! describe a set of indicator runs:
//!
//! ```toml
//! type = "psar"
//! af_start = 0.02
//! af_step = 0.02
//! af_max = 0.2
//! ```
//!
//! Omitted parameters take their documented defaults, except `period` for
//! SMA/EMA which has none. Unknown parameter names are rejected.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::fingerprint::{config_fingerprint, Fingerprint};
use crate::indicator::Indicator;
use crate::indicators::{
    Bollinger, BollingerParams, Ema, EmaCrossover, EmaCrossoverParams, Macd, MacdParams,
    ParabolicSar, PsarParams, Rsi, RsiParams, Sma, Vwap,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IndicatorConfig {
    Psar(PsarParams),
    Sma { period: usize },
    Ema { period: usize },
    EmaCrossover(EmaCrossoverParams),
    Bollinger(BollingerParams),
    Macd(MacdParams),
    Rsi(RsiParams),
    Vwap,
}

impl IndicatorConfig {
    /// Parse a single indicator table.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Validate parameters and construct the indicator.
    pub fn build(&self) -> Result<Box<dyn Indicator>> {
        Ok(match *self {
            IndicatorConfig::Psar(params) => Box::new(ParabolicSar::new(params)?),
            IndicatorConfig::Sma { period } => Box::new(Sma::new(period)?),
            IndicatorConfig::Ema { period } => Box::new(Ema::new(period)?),
            IndicatorConfig::EmaCrossover(params) => Box::new(EmaCrossover::new(params)?),
            IndicatorConfig::Bollinger(params) => Box::new(Bollinger::new(params)?),
            IndicatorConfig::Macd(params) => Box::new(Macd::new(params)?),
            IndicatorConfig::Rsi(params) => Box::new(Rsi::new(params)?),
            IndicatorConfig::Vwap => Box::new(Vwap::new()),
        })
    }

    /// Content hash of the configuration. Equal configs hash equal.
    pub fn config_hash(&self) -> Result<Fingerprint> {
        config_fingerprint(self)
    }
}
