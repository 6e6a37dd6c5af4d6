//! Runner configuration, loaded from TOML.
//!
//! ```toml
//! parallel = true
//!
//! [logging]
//! level = "info"
//! format = "json"
//!
//! [[series]]
//! name = "btc"
//! path = "data/btc.csv"
//!
//! [[indicators]]
//! type = "psar"
//!
//! [[indicators]]
//! type = "rsi"
//! period = 10
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tasignal_core::IndicatorConfig;

use crate::error::RunnerError;

fn default_log_level() -> String {
    "info".into()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `"info"` or `"tasignal_core=debug"`.
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Text,
        }
    }
}

/// A named CSV input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSource {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Evaluate independent series/indicator pairs on the rayon pool.
    #[serde(default = "default_true")]
    pub parallel: bool,
    #[serde(default)]
    pub series: Vec<SeriesSource>,
    #[serde(default)]
    pub indicators: Vec<IndicatorConfig>,
}

impl RunnerConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, RunnerError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, RunnerError> {
        let text = std::fs::read_to_string(path).map_err(|source| RunnerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&text)?;
        // series paths are relative to the config file
        if let Some(base) = path.parent() {
            for source in &mut config.series {
                if source.path.is_relative() {
                    source.path = base.join(&source.path);
                }
            }
        }
        Ok(config)
    }
}
