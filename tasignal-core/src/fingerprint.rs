//! BLAKE3 fingerprints of configurations and indicator outputs.
//!
//! - `config_fingerprint`: hash of the canonical JSON of a config.
//! - `output_fingerprint`: hash of an augmented series' exact bit patterns,
//!   so two runs over the same input can be checked for bit identity.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::indicator::{AugmentedSeries, ColumnValues};

/// Hex-encoded BLAKE3 digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(pub String);

impl Fingerprint {
    fn from_hasher(hasher: &blake3::Hasher) -> Self {
        Self(hasher.finalize().to_hex().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub fn config_fingerprint<T: Serialize>(config: &T) -> Result<Fingerprint> {
    let json = serde_json::to_vec(config)?;
    let mut hasher = blake3::Hasher::new();
    hasher.update(&json);
    Ok(Fingerprint::from_hasher(&hasher))
}

/// Floats are hashed by bit pattern, so NaN warmup values and signed zeros
/// count.
pub fn output_fingerprint(output: &AugmentedSeries) -> Fingerprint {
    let mut hasher = blake3::Hasher::new();
    hasher.update(output.indicator().as_bytes());
    for ts in output.timestamps() {
        hasher.update(&ts.and_utc().timestamp_micros().to_le_bytes());
    }
    for column in output.columns() {
        hasher.update(column.name.as_bytes());
        match &column.values {
            ColumnValues::Float(values) => {
                for v in values {
                    hasher.update(&v.to_bits().to_le_bytes());
                }
            }
            ColumnValues::Int(values) => {
                for v in values {
                    hasher.update(&v.to_le_bytes());
                }
            }
        }
    }
    hasher.update(b"signal");
    for s in output.signal() {
        hasher.update(&s.value().to_le_bytes());
    }
    Fingerprint::from_hasher(&hasher)
}
