//! Dataset provider trait, payload types and structured error types.
//!
//! The `DatasetProvider` trait abstracts over where signal datasets come from
//! (the JSON record file, synthetic samples, test fixtures) so the annotation
//! pipeline can be driven by any of them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

use super::period::Period;

/// OHLCV columns, one value per entry in `SignalDataset::dates`.
///
/// Lengths are not guaranteed to match each other or the date axis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceColumns {
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub volume: Vec<f64>,
}

/// One anchor point of a precomputed trend line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// A precomputed trend line to draw as a dashed polyline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendLine {
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub points: Vec<TrendPoint>,
}

impl TrendLine {
    /// A line needs at least two points to be drawn.
    pub fn is_drawable(&self) -> bool {
        self.points.len() >= 2
    }
}

/// Everything known about one symbol for one requested period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalDataset {
    pub symbol: String,
    pub dates: Vec<NaiveDate>,
    pub data: PriceColumns,
    /// Signal id -> per-bar values in {-1, 0, 1}.
    pub signals: BTreeMap<String, Vec<i8>>,
    /// Indicator id -> per-bar continuous values.
    pub indicators: BTreeMap<String, Vec<f64>>,
    pub trendlines: Vec<TrendLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SignalDataset {
    /// Payload for a request that produced no data.
    pub fn no_data(symbol: &str, reason: impl Into<String>) -> Self {
        Self {
            symbol: symbol.to_string(),
            error: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Upstream reported an error or returned no dates.
    pub fn is_no_data(&self) -> bool {
        self.error.is_some() || self.dates.is_empty()
    }

    pub fn signal(&self, id: &str) -> Option<&[i8]> {
        self.signals.get(id).map(|v| v.as_slice())
    }

    pub fn indicator(&self, id: &str) -> Option<&[f64]> {
        self.indicators.get(id).map(|v| v.as_slice())
    }
}

/// Structured error types for data operations.
///
/// These are designed to be displayable in both CLI and TUI contexts.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read data file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse data file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("data file must contain a JSON array of records")]
    NotAnArray,

    #[error("unknown period '{0}' (expected one of 6mo, 1y, 3y, 5y, max)")]
    UnknownPeriod(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },
}

/// Where datasets come from.
///
/// Providers never fail a request outright: a missing symbol or unreadable
/// source comes back as a payload whose `error` field is set, which the
/// annotation layer turns into the empty state.
pub trait DatasetProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Dataset for `symbol` restricted to `period`.
    fn dataset(&self, symbol: &str, period: Period) -> SignalDataset;

    /// Symbols this provider has data for, sorted.
    fn symbols(&self) -> Vec<String>;
}
