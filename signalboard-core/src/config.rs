//! Application and annotation configuration.
//!
//! Configuration lives in a TOML file. Every field has a default, so an
//! empty file (or no file at all) yields a working setup:
//!
//! ```toml
//! data_file = "signals_data.json"
//! default_period = "3y"
//! cache_ttl_secs = 300
//!
//! [annotation]
//! per_bar_lookback = 20
//! weekly_lookback = 50
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::data::period::Period;

/// Name of the composite indicator used for background highlights.
pub const DEFAULT_COMPOSITE_ID: &str = "Final_Composite_Value";

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tuning constants for marker placement and highlight classification.
///
/// These are product-tuning values. They sit here rather than in the
/// derivation code so they can be revisited without touching it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    /// Per-bar buy marker price as a fraction of the bar's low.
    pub per_bar_offset: f64,
    /// Weekly-dedup buy marker price as a fraction of the bar's low.
    pub weekly_offset: f64,
    /// Confirmation call-out price as a fraction of the bar's low.
    pub confirmation_offset: f64,
    /// Sell marker price as a fraction of the bar's high.
    pub sell_offset: f64,
    /// Confirmation lookback (bars) for per-bar reversal signals.
    pub per_bar_lookback: usize,
    /// Confirmation lookback (bars) for weekly-dedup reversal signals.
    pub weekly_lookback: usize,
    /// Composite value at or above this is bullish.
    pub bullish_threshold: f64,
    /// Composite value at or below this is bearish.
    pub bearish_threshold: f64,
    /// Indicator id driving the background highlights.
    pub composite_id: String,
    /// Sell-side markers are suppressed unless this is set.
    pub render_sell_markers: bool,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            per_bar_offset: 0.97,
            weekly_offset: 0.99,
            confirmation_offset: 0.95,
            sell_offset: 1.02,
            per_bar_lookback: 20,
            weekly_lookback: 50,
            bullish_threshold: 0.5,
            bearish_threshold: -0.5,
            composite_id: DEFAULT_COMPOSITE_ID.to_string(),
            render_sell_markers: false,
        }
    }
}

impl AnnotationConfig {
    /// Reject values that would make the derivation meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let offsets = [
            ("per_bar_offset", self.per_bar_offset),
            ("weekly_offset", self.weekly_offset),
            ("confirmation_offset", self.confirmation_offset),
            ("sell_offset", self.sell_offset),
        ];
        for (name, value) in offsets {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a positive finite number, got {value}"
                )));
            }
        }
        if !self.bullish_threshold.is_finite() || !self.bearish_threshold.is_finite() {
            return Err(ConfigError::Invalid("thresholds must be finite".into()));
        }
        if self.bearish_threshold >= self.bullish_threshold {
            return Err(ConfigError::Invalid(format!(
                "bearish_threshold ({}) must be below bullish_threshold ({})",
                self.bearish_threshold, self.bullish_threshold
            )));
        }
        if self.composite_id.trim().is_empty() {
            return Err(ConfigError::Invalid("composite_id must not be empty".into()));
        }
        Ok(())
    }
}

/// Top-level configuration shared by the CLI and the TUI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Flat JSON record file produced by the upstream signal pipeline.
    pub data_file: PathBuf,
    /// Optional TOML catalog overriding the built-in symbol list and groups.
    pub catalog_file: Option<PathBuf>,
    /// Trailing window shown when no period is requested explicitly.
    pub default_period: Period,
    /// Freshness window of the dataset cache.
    pub cache_ttl_secs: u64,
    pub annotation: AnnotationConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("signals_data.json"),
            catalog_file: None,
            default_period: Period::ThreeYears,
            cache_ttl_secs: 300,
            annotation: AnnotationConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, otherwise fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.annotation.validate()
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
