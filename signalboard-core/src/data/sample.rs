//! Synthetic record generator.
//!
//! Produces a `signals_data.json`-shaped record array for demos and tests:
//! - Random-walk OHLCV on business days
//! - Sparse signal firings (buys more common than sells)
//! - A slow oscillating composite value that crosses both thresholds
//!
//! Output is fully determined by the seed.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};
use std::path::Path;

use super::provider::DataError;
use super::store::{COMPOSITE_FIELD, SIGNAL_COLUMNS};

/// Symbols emitted by `sample_records`, with their starting prices.
pub const SAMPLE_SYMBOLS: [(&str, f64); 5] = [
    ("SPY", 470.0),
    ("QQQ", 400.0),
    ("AAPL", 185.0),
    ("GLD", 190.0),
    ("^VIX", 14.0),
];

/// Parameters for the generator.
#[derive(Debug, Clone)]
pub struct SampleSpec {
    /// Last calendar date to emit (skipped if it falls on a weekend).
    pub end: NaiveDate,
    /// Number of business days per symbol.
    pub days: usize,
    pub seed: u64,
    /// Chance per bar that a given signal fires.
    pub fire_rate: f64,
}

impl SampleSpec {
    pub fn new(end: NaiveDate, days: usize, seed: u64) -> Self {
        Self {
            end,
            days,
            seed,
            fire_rate: 0.04,
        }
    }
}

/// Business days ending at or before `end`, oldest first.
pub fn business_days(end: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let mut out = Vec::with_capacity(count);
    let mut d = end;
    while out.len() < count {
        if !matches!(d.weekday(), Weekday::Sat | Weekday::Sun) {
            out.push(d);
        }
        d -= Duration::days(1);
    }
    out.reverse();
    out
}

/// Generate records for every symbol in `SAMPLE_SYMBOLS`.
pub fn sample_records(spec: &SampleSpec) -> Vec<Value> {
    let mut rng = StdRng::seed_from_u64(spec.seed);
    let dates = business_days(spec.end, spec.days);
    let updated = spec.end.to_string();
    let mut records = Vec::with_capacity(dates.len() * SAMPLE_SYMBOLS.len());

    for (symbol, start_price) in SAMPLE_SYMBOLS {
        let mut close = start_price;
        // Random phase so the composite cycle differs per symbol.
        let phase: f64 = rng.gen_range(0.0..std::f64::consts::TAU);

        for (i, date) in dates.iter().enumerate() {
            let open = close * (1.0 + rng.gen_range(-0.005..0.005));
            close = (open * (1.0 + rng.gen_range(-0.02..0.021))).max(0.01);
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
            let volume = rng.gen_range(1_000_000.0..50_000_000.0_f64).round();

            let composite = (i as f64 / 15.0 + phase).sin() * 0.8 + rng.gen_range(-0.1..0.1);

            let mut record = json!({
                "symbol": symbol,
                "date": date.to_string(),
                "open": round2(open),
                "high": round2(high),
                "low": round2(low),
                "close": round2(close),
                "volume": volume,
                "last_updated": updated,
            });
            if let Value::Object(map) = &mut record {
                map.insert(COMPOSITE_FIELD.into(), json!(round2(composite)));
                for id in SIGNAL_COLUMNS {
                    map.insert(id.into(), json!(fire(&mut rng, spec.fire_rate)));
                }
            }
            records.push(record);
        }
    }

    records
}

/// Write `sample_records(spec)` as a pretty-printed JSON array.
pub fn write_sample_file(path: &Path, spec: &SampleSpec) -> Result<usize, DataError> {
    let records = sample_records(spec);
    let text = serde_json::to_string_pretty(&records)?;
    std::fs::write(path, text).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), records = records.len(), "wrote sample data");
    Ok(records.len())
}

fn fire(rng: &mut StdRng, rate: f64) -> i8 {
    let roll: f64 = rng.gen();
    if roll < rate {
        1
    } else if roll < rate * 1.5 {
        -1
    } else {
        0
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::period::Period;
    use crate::data::store::JsonSignalStore;

    fn spec() -> SampleSpec {
        SampleSpec::new(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(), 120, 7)
    }

    #[test]
    fn business_days_skip_weekends() {
        // 2024-06-30 is a Sunday.
        let days = business_days(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(), 6);
        assert_eq!(days.len(), 6);
        assert_eq!(days.last().unwrap(), &NaiveDate::from_ymd_opt(2024, 6, 28).unwrap());
        assert!(days
            .iter()
            .all(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun)));
        assert!(days.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn same_seed_same_records() {
        assert_eq!(sample_records(&spec()), sample_records(&spec()));
        let mut other = spec();
        other.seed = 8;
        assert_ne!(sample_records(&spec()), sample_records(&other));
    }

    #[test]
    fn records_load_into_store() {
        let text = serde_json::to_vec(&sample_records(&spec())).unwrap();
        let store = JsonSignalStore::from_slice(&text).unwrap();
        assert_eq!(store.symbols().len(), SAMPLE_SYMBOLS.len());
        assert_eq!(store.total_records(), 120 * SAMPLE_SYMBOLS.len());

        let ds = store.dataset("SPY", Period::Max);
        assert_eq!(ds.dates.len(), 120);
        assert!(ds
            .data
            .low
            .iter()
            .zip(&ds.data.high)
            .all(|(l, h)| l <= h));
        assert!(ds
            .signals
            .values()
            .flatten()
            .all(|v| (-1..=1).contains(v)));
    }

    #[test]
    fn writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signals_data.json");
        let n = write_sample_file(&path, &spec()).unwrap();
        assert_eq!(n, 120 * SAMPLE_SYMBOLS.len());
        assert!(!JsonSignalStore::open(&path).unwrap().is_empty());
    }
}
