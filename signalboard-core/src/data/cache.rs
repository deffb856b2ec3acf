//! Time-bounded dataset cache keyed by (symbol, period).
//!
//! Callers pass `now` explicitly so freshness is testable without sleeping.
//! Entries older than the TTL are reloaded on the next request.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::period::Period;
use super::provider::SignalDataset;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    symbol: String,
    period: Period,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    dataset: Arc<SignalDataset>,
    fetched_at: Instant,
}

/// The dataset cache.
#[derive(Debug)]
pub struct DatasetCache {
    ttl: Duration,
    entries: HashMap<CacheKey, CacheEntry>,
}

impl DatasetCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn is_fresh(&self, entry: &CacheEntry, now: Instant) -> bool {
        now.saturating_duration_since(entry.fetched_at) < self.ttl
    }

    /// Cached dataset if present and still fresh.
    pub fn get(&self, symbol: &str, period: Period, now: Instant) -> Option<Arc<SignalDataset>> {
        let key = CacheKey {
            symbol: symbol.to_string(),
            period,
        };
        self.entries
            .get(&key)
            .filter(|e| self.is_fresh(e, now))
            .map(|e| Arc::clone(&e.dataset))
    }

    /// Return the cached dataset or call `load` and remember its result.
    ///
    /// Error payloads are returned but not cached, so a later request retries.
    pub fn get_or_load<F>(
        &mut self,
        symbol: &str,
        period: Period,
        now: Instant,
        load: F,
    ) -> Arc<SignalDataset>
    where
        F: FnOnce() -> SignalDataset,
    {
        if let Some(hit) = self.get(symbol, period, now) {
            tracing::debug!(symbol, %period, "dataset cache hit");
            return hit;
        }

        tracing::debug!(symbol, %period, "dataset cache miss");
        let dataset = Arc::new(load());
        if dataset.error.is_none() {
            self.entries.insert(
                CacheKey {
                    symbol: symbol.to_string(),
                    period,
                },
                CacheEntry {
                    dataset: Arc::clone(&dataset),
                    fetched_at: now,
                },
            );
        }
        dataset
    }

    /// Drop every cached period of `symbol`. Returns how many entries went.
    pub fn invalidate(&mut self, symbol: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|k, _| k.symbol != symbol);
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Remove stale entries. Returns how many were removed.
    pub fn purge_expired(&mut self, now: Instant) -> usize {
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries
            .retain(|_, e| now.saturating_duration_since(e.fetched_at) < ttl);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn dataset(symbol: &str) -> SignalDataset {
        SignalDataset {
            symbol: symbol.to_string(),
            dates: vec![chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()],
            ..SignalDataset::default()
        }
    }

    #[test]
    fn second_request_within_ttl_is_a_hit() {
        let mut cache = DatasetCache::new(Duration::from_secs(300));
        let t0 = Instant::now();
        let loads = Cell::new(0);

        let a = cache.get_or_load("SPY", Period::OneYear, t0, || {
            loads.set(loads.get() + 1);
            dataset("SPY")
        });
        let b = cache.get_or_load("SPY", Period::OneYear, t0 + Duration::from_secs(299), || {
            loads.set(loads.get() + 1);
            dataset("SPY")
        });

        assert_eq!(loads.get(), 1);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn expired_entry_is_reloaded() {
        let mut cache = DatasetCache::new(Duration::from_secs(300));
        let t0 = Instant::now();
        let loads = Cell::new(0);
        let mut load = || {
            loads.set(loads.get() + 1);
            dataset("SPY")
        };

        cache.get_or_load("SPY", Period::OneYear, t0, &mut load);
        cache.get_or_load("SPY", Period::OneYear, t0 + Duration::from_secs(300), &mut load);
        assert_eq!(loads.get(), 2);
    }

    #[test]
    fn periods_are_cached_separately() {
        let mut cache = DatasetCache::new(Duration::from_secs(300));
        let t0 = Instant::now();
        cache.get_or_load("SPY", Period::OneYear, t0, || dataset("SPY"));
        cache.get_or_load("SPY", Period::Max, t0, || dataset("SPY"));
        assert_eq!(cache.len(), 2);
        assert!(cache.get("SPY", Period::FiveYears, t0).is_none());
    }

    #[test]
    fn error_payloads_are_not_cached() {
        let mut cache = DatasetCache::new(Duration::from_secs(300));
        let t0 = Instant::now();
        let out = cache.get_or_load("BAD", Period::OneYear, t0, || {
            SignalDataset::no_data("BAD", "not found")
        });
        assert!(out.is_no_data());
        assert!(cache.is_empty());
    }

    #[test]
    fn invalidate_and_purge() {
        let mut cache = DatasetCache::new(Duration::from_secs(10));
        let t0 = Instant::now();
        cache.get_or_load("SPY", Period::OneYear, t0, || dataset("SPY"));
        cache.get_or_load("SPY", Period::Max, t0, || dataset("SPY"));
        cache.get_or_load("QQQ", Period::Max, t0 + Duration::from_secs(5), || dataset("QQQ"));

        assert_eq!(cache.invalidate("SPY"), 2);
        assert_eq!(cache.len(), 1);

        assert_eq!(cache.purge_expired(t0 + Duration::from_secs(14)), 0);
        assert_eq!(cache.purge_expired(t0 + Duration::from_secs(15)), 1);
        assert!(cache.is_empty());
    }
}
