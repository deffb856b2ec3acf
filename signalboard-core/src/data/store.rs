//! Read-only store over the flat `signals_data.json` record file.
//!
//! The file is a JSON array with one object per (symbol, date):
//!
//! ```json
//! [{"symbol": "SPY", "date": "2024-01-02", "open": 470.1, "high": 472.0,
//!   "low": 468.5, "close": 471.3, "volume": 81000000,
//!   "short_signal_v2": 1, "macd_signal": 0, "fcv": 0.42,
//!   "last_updated": "2024-01-02"}]
//! ```
//!
//! Records are grouped per symbol at load time. Requests regroup them into the
//! column-oriented `SignalDataset` payload.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

use super::period::Period;
use super::provider::{DataError, DatasetProvider, PriceColumns, SignalDataset};
use crate::config::DEFAULT_COMPOSITE_ID;

/// Signal columns carried by every record.
pub const SIGNAL_COLUMNS: [&str; 6] = [
    "short_signal_v1",
    "short_signal_v2",
    "long_signal",
    "combined_signal_v1",
    "macd_signal",
    "momentum_color_signal",
];

/// Record field holding the composite indicator value.
pub const COMPOSITE_FIELD: &str = "fcv";

/// Raw record as found in the file.
///
/// Fields stay untyped so a bad value only affects that field: absent or
/// non-numeric prices read as zero, only a bad symbol or date drops the record.
#[derive(Debug, Deserialize)]
struct RawRecord {
    symbol: Option<Value>,
    date: Option<Value>,
    open: Option<Value>,
    high: Option<Value>,
    low: Option<Value>,
    close: Option<Value>,
    volume: Option<Value>,
    fcv: Option<Value>,
    last_updated: Option<Value>,
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

/// A validated record, one trading day of one symbol.
#[derive(Debug, Clone)]
struct StoredRecord {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
    composite: f64,
    /// Values aligned with `SIGNAL_COLUMNS`.
    signals: [i8; SIGNAL_COLUMNS.len()],
    last_updated: Option<String>,
}

/// Summary of the loaded file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreInfo {
    pub total_records: usize,
    pub symbols: Vec<String>,
    pub last_updated: Option<String>,
    /// BLAKE3 hash of the raw file bytes.
    pub data_hash: String,
}

/// In-memory view of the record file.
#[derive(Debug, Clone, Default)]
pub struct JsonSignalStore {
    by_symbol: BTreeMap<String, Vec<StoredRecord>>,
    total_records: usize,
    skipped_records: usize,
    data_hash: String,
}

impl JsonSignalStore {
    /// Read and parse the record file.
    pub fn open(path: &Path) -> Result<Self, DataError> {
        let bytes = std::fs::read(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self::from_slice(&bytes)?;
        tracing::info!(
            path = %path.display(),
            records = store.total_records,
            symbols = store.by_symbol.len(),
            skipped = store.skipped_records,
            "loaded signal data"
        );
        Ok(store)
    }

    /// Like `open`, but a missing or corrupt file yields an empty store.
    ///
    /// Callers check `is_empty()` to show a "data file not found" message.
    pub fn open_or_empty(path: &Path) -> Self {
        match Self::open(path) {
            Ok(store) => store,
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "could not load signal data");
                Self::default()
            }
        }
    }

    /// Parse the record file contents.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DataError> {
        let root: Value = serde_json::from_slice(bytes)?;
        let Value::Array(items) = root else {
            return Err(DataError::NotAnArray);
        };

        let mut by_symbol: BTreeMap<String, Vec<StoredRecord>> = BTreeMap::new();
        let mut skipped = 0usize;

        for (i, item) in items.into_iter().enumerate() {
            match parse_record(item) {
                Some((symbol, record)) => by_symbol.entry(symbol).or_default().push(record),
                None => {
                    tracing::warn!(index = i, "skipping malformed record");
                    skipped += 1;
                }
            }
        }

        let mut total = 0usize;
        for (symbol, records) in by_symbol.iter_mut() {
            records.sort_by_key(|r| r.date);
            let before = records.len();
            records.dedup_by_key(|r| r.date);
            if records.len() != before {
                tracing::warn!(
                    symbol = %symbol,
                    dropped = before - records.len(),
                    "dropped records with duplicate dates"
                );
            }
            total += records.len();
        }

        Ok(Self {
            by_symbol,
            total_records: total,
            skipped_records: skipped,
            data_hash: blake3::hash(bytes).to_hex().to_string(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.total_records == 0
    }

    pub fn total_records(&self) -> usize {
        self.total_records
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.by_symbol.contains_key(symbol)
    }

    pub fn info(&self) -> StoreInfo {
        let last_updated = self
            .by_symbol
            .values()
            .flat_map(|records| records.iter())
            .filter_map(|r| r.last_updated.clone())
            .max();
        StoreInfo {
            total_records: self.total_records,
            symbols: self.by_symbol.keys().cloned().collect(),
            last_updated,
            data_hash: self.data_hash.clone(),
        }
    }

    /// Build the column-oriented payload for `symbol` over `period`.
    pub fn dataset(&self, symbol: &str, period: Period) -> SignalDataset {
        let Some(records) = self.by_symbol.get(symbol) else {
            let err = DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            };
            return SignalDataset::no_data(symbol, err.to_string());
        };

        let window_start = records
            .last()
            .and_then(|last| period.window_start(last.date));
        let selected: Vec<&StoredRecord> = records
            .iter()
            .filter(|r| window_start.map_or(true, |start| r.date >= start))
            .collect();

        let n = selected.len();
        let mut data = PriceColumns {
            open: Vec::with_capacity(n),
            high: Vec::with_capacity(n),
            low: Vec::with_capacity(n),
            close: Vec::with_capacity(n),
            volume: Vec::with_capacity(n),
        };
        let mut dates = Vec::with_capacity(n);
        let mut composite = Vec::with_capacity(n);
        let mut signal_columns: Vec<Vec<i8>> = vec![Vec::with_capacity(n); SIGNAL_COLUMNS.len()];

        for r in &selected {
            dates.push(r.date);
            data.open.push(r.open);
            data.high.push(r.high);
            data.low.push(r.low);
            data.close.push(r.close);
            data.volume.push(r.volume);
            composite.push(r.composite);
            for (column, value) in signal_columns.iter_mut().zip(r.signals) {
                column.push(value);
            }
        }

        let signals = SIGNAL_COLUMNS
            .iter()
            .map(|id| id.to_string())
            .zip(signal_columns)
            .collect();

        let mut indicators = BTreeMap::new();
        indicators.insert(DEFAULT_COMPOSITE_ID.to_string(), composite);

        let last_updated = selected
            .last()
            .map(|r| r.last_updated.clone().unwrap_or_else(|| r.date.to_string()));

        SignalDataset {
            symbol: symbol.to_string(),
            dates,
            data,
            signals,
            indicators,
            trendlines: Vec::new(),
            last_updated,
            error: None,
        }
    }

    pub fn symbols(&self) -> Vec<String> {
        self.by_symbol.keys().cloned().collect()
    }
}

impl DatasetProvider for JsonSignalStore {
    fn name(&self) -> &str {
        "json-file"
    }

    fn dataset(&self, symbol: &str, period: Period) -> SignalDataset {
        JsonSignalStore::dataset(self, symbol, period)
    }

    fn symbols(&self) -> Vec<String> {
        JsonSignalStore::symbols(self)
    }
}

fn parse_record(item: Value) -> Option<(String, StoredRecord)> {
    let raw: RawRecord = serde_json::from_value(item).ok()?;
    let symbol = raw
        .symbol
        .as_ref()
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())?
        .to_string();
    let date = parse_date(raw.date.as_ref()?.as_str()?)?;

    let mut signals = [0i8; SIGNAL_COLUMNS.len()];
    for (slot, id) in signals.iter_mut().zip(SIGNAL_COLUMNS) {
        *slot = raw.extra.get(id).map_or(0, signal_value);
    }

    Some((
        symbol,
        StoredRecord {
            date,
            open: number(raw.open.as_ref()),
            high: number(raw.high.as_ref()),
            low: number(raw.low.as_ref()),
            close: number(raw.close.as_ref()),
            volume: number(raw.volume.as_ref()),
            composite: number(raw.fcv.as_ref()),
            signals,
            last_updated: raw
                .last_updated
                .as_ref()
                .and_then(Value::as_str)
                .map(str::to_string),
        },
    ))
}

/// Accepts `YYYY-MM-DD` optionally followed by a time part.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let day = s.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Numeric field, zero when absent or not a number.
fn number(v: Option<&Value>) -> f64 {
    v.and_then(Value::as_f64).unwrap_or(0.0)
}

/// Upstream writes signals as ints or floats; anything else counts as no signal.
fn signal_value(v: &Value) -> i8 {
    match v.as_f64() {
        Some(x) if x >= 0.5 => 1,
        Some(x) if x <= -0.5 => -1,
        _ => 0,
    }
}
