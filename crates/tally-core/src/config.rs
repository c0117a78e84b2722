//! Threshold configuration
//!
//! Resolution order:
//! 1. An explicit path (`--config`), if it exists
//! 2. `~/.local/share/tally/config/tally.toml` (platform data dir), if it exists
//! 3. The defaults compiled into the binary
//!
//! Keys missing from a file keep their default values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::ForecastConfig;
use crate::duplicates::DetectionConfig;
use crate::error::{Error, Result};

/// Embedded default configuration
const DEFAULT_CONFIG: &str = include_str!("../../../config/tally.toml");

/// Longest forecast lookback accepted (100 years)
pub const MAX_LOOKBACK_DAYS: i64 = 36_500;

/// Longest pending receipt TTL accepted (one year)
pub const MAX_TTL_MINUTES: i64 = 525_600;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PendingConfig {
    /// Minutes a staged receipt is kept before eviction
    pub ttl_minutes: i64,
}

impl Default for PendingConfig {
    fn default() -> Self {
        Self { ttl_minutes: 60 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub detection: DetectionConfig,
    pub forecast: ForecastConfig,
    pub pending: PendingConfig,
}

impl Config {
    /// Load configuration (explicit path first, then user override, then defaults)
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .filter(|p| p.exists())
            .or_else(|| default_config_path().filter(|p| p.exists()));

        match path {
            Some(path) => {
                debug!(path = %path.display(), "Loading config");
                let content = fs::read_to_string(&path).map_err(|e| {
                    Error::Config(format!("Failed to read {}: {}", path.display(), e))
                })?;
                Self::from_toml(&content)
            }
            None => Self::embedded(),
        }
    }

    /// The configuration compiled into the binary
    pub fn embedded() -> Result<Self> {
        Self::from_toml(DEFAULT_CONFIG)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let d = &self.detection;
        for (name, value) in [
            ("merchant_threshold", d.merchant_threshold),
            ("item_threshold", d.item_threshold),
            ("duplicate_threshold", d.duplicate_threshold),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(Error::Config(format!(
                    "detection.{} must be between 0 and 100, got {}",
                    name, value
                )));
            }
        }
        if d.threshold_days < 0 {
            return Err(Error::Config("detection.threshold_days must not be negative".into()));
        }
        if d.amount_tolerance < 0.0 {
            return Err(Error::Config("detection.amount_tolerance must not be negative".into()));
        }
        if !(1..=MAX_LOOKBACK_DAYS).contains(&self.forecast.lookback_days) {
            return Err(Error::Config(format!(
                "forecast.lookback_days must be between 1 and {}, got {}",
                MAX_LOOKBACK_DAYS, self.forecast.lookback_days
            )));
        }
        if !(1..=MAX_TTL_MINUTES).contains(&self.pending.ttl_minutes) {
            return Err(Error::Config(format!(
                "pending.ttl_minutes must be between 1 and {}, got {}",
                MAX_TTL_MINUTES, self.pending.ttl_minutes
            )));
        }
        Ok(())
    }
}

/// User config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("tally").join("config").join("tally.toml"))
}
