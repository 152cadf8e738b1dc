use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("thresholds JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),

    #[error("reading thresholds from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("threshold '{name}' must be a finite number >= 0, got {value}")]
    OutOfRange { name: &'static str, value: f64 },
}

// ---------------------------------------------------------------------------
// Thresholds – the five bucket parameters
// ---------------------------------------------------------------------------

/// Bucket thresholds. Every key is optional when deserializing; omitted keys
/// keep their default, so `{"acos_threshold": 0.25}` overrides exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Wasted Adspend: minimum clicks with zero orders.
    #[serde(deserialize_with = "count_threshold")]
    pub click_threshold: u64,
    /// Inefficient Adspend: minimum ACOS (fraction) with at least one order.
    pub acos_threshold: f64,
    /// Scaling Opportunity: minimum conversion rate (fraction).
    pub cvr_threshold: f64,
    /// Scaling Opportunity: maximum clicks.
    #[serde(deserialize_with = "count_threshold")]
    pub low_click_threshold: u64,
    /// Harvesting Opportunity: orders must exceed this.
    #[serde(deserialize_with = "count_threshold")]
    pub order_threshold: u64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            click_threshold: 10,
            acos_threshold: 0.30,
            cvr_threshold: 0.10,
            low_click_threshold: 10,
            order_threshold: 2,
        }
    }
}

/// Integer thresholds accept any non-negative JSON number and truncate it.
fn count_threshold<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() || value < 0.0 {
        return Err(serde::de::Error::custom(format!(
            "expected a non-negative count, got {value}"
        )));
    }
    Ok(value.trunc() as u64)
}

impl Thresholds {
    /// Parse overrides from JSON text. Blank text means "all defaults".
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let thresholds: Thresholds = serde_json::from_str(text)?;
        thresholds.check()?;
        Ok(thresholds)
    }

    /// Read overrides from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    fn check(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("acos_threshold", self.acos_threshold),
            ("cvr_threshold", self.cvr_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::OutOfRange { name, value });
            }
        }
        Ok(())
    }
}
