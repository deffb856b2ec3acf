//! Record file → store → cache → annotations.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use signalboard_core::annotate::annotate_chart;
use signalboard_core::data::{DatasetCache, JsonSignalStore, Period};
use signalboard_core::domain::{Polarity, StyleClass};
use signalboard_core::{AnnotationConfig, Catalog, ChartOutcome};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/signals_small.json")
}

fn d(m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, m, day).unwrap()
}

#[test]
fn fixture_loads_and_skips_bad_records() {
    let store = JsonSignalStore::open(&fixture()).unwrap();
    let info = store.info();
    assert_eq!(info.total_records, 7);
    assert_eq!(info.symbols, vec!["SPY".to_string(), "^VIX".to_string()]);
    assert_eq!(info.last_updated.as_deref(), Some("2024-03-11"));
}

#[test]
fn mid_group_over_fixture() {
    let store = JsonSignalStore::open(&fixture()).unwrap();
    let catalog = Catalog::builtin();
    let group = catalog.group("mid").unwrap();
    let ids: Vec<&str> = group.signals.iter().map(String::as_str).collect();

    let ds = store.dataset("SPY", Period::SixMonths);
    let outcome = annotate_chart(&ds, &ids, &AnnotationConfig::default());
    let ChartOutcome::Ready(out) = outcome else {
        panic!("expected annotations");
    };

    assert_eq!(out.bars.len(), 6);
    let got: Vec<(&str, NaiveDate, StyleClass)> = out
        .markers
        .iter()
        .map(|m| (m.signal_id.as_str(), m.date, m.style_class))
        .collect();
    assert_eq!(
        got,
        vec![
            ("short_signal_v1", d(3, 5), StyleClass::PrimaryEntry),
            ("momentum_color_signal", d(3, 4), StyleClass::PrimaryEntry),
            ("momentum_color_signal", d(3, 11), StyleClass::PrimaryEntry),
            ("momentum_color_signal", d(3, 11), StyleClass::ConfirmationText),
        ]
    );
    assert!((out.markers[3].price - 508.6 * 0.95).abs() < 1e-9);

    let spans: Vec<(NaiveDate, Polarity)> = out
        .highlights
        .iter()
        .map(|h| (h.start, h.polarity))
        .collect();
    assert_eq!(
        spans,
        vec![
            (d(3, 4), Polarity::Bullish),
            (d(3, 5), Polarity::Bullish),
            (d(3, 7), Polarity::Bearish),
        ]
    );
    assert_eq!(out.highlights[2].end, d(3, 8));
    assert_eq!(out.last_updated.as_deref(), Some("2024-03-11"));
}

#[test]
fn short_group_confirms_macd() {
    let store = JsonSignalStore::open(&fixture()).unwrap();
    let ds = store.dataset("SPY", Period::default());
    let outcome = annotate_chart(
        &ds,
        &["short_signal_v2", "macd_signal"],
        &AnnotationConfig::default(),
    );
    let out = outcome.annotations().unwrap();
    assert_eq!(out.markers.len(), 3);
    assert_eq!(out.markers[2].style_class, StyleClass::ConfirmationText);
    assert_eq!(out.markers[2].date, d(3, 5));
}

#[test]
fn uncovered_symbol_is_empty_state() {
    let store = JsonSignalStore::open(&fixture()).unwrap();
    let ds = store.dataset("TSLA", Period::OneYear);
    let outcome = annotate_chart(&ds, &["long_signal"], &AnnotationConfig::default());
    assert!(!outcome.is_ready());
}

#[test]
fn cache_serves_repeat_requests() {
    let store = JsonSignalStore::open(&fixture()).unwrap();
    let mut cache = DatasetCache::new(Duration::from_secs(300));
    let t0 = Instant::now();
    let mut loads = 0;

    for secs in [0, 60, 299] {
        cache.get_or_load("SPY", Period::OneYear, t0 + Duration::from_secs(secs), || {
            loads += 1;
            store.dataset("SPY", Period::OneYear)
        });
    }
    assert_eq!(loads, 1);

    cache.get_or_load("SPY", Period::OneYear, t0 + Duration::from_secs(301), || {
        loads += 1;
        store.dataset("SPY", Period::OneYear)
    });
    assert_eq!(loads, 2);
}

#[test]
fn store_copied_to_temp_dir_matches_hash() {
    let dir = tempfile::tempdir().unwrap();
    let copy = dir.path().join("signals_data.json");
    std::fs::copy(fixture(), &copy).unwrap();
    let a = JsonSignalStore::open(&fixture()).unwrap();
    let b = JsonSignalStore::open(&copy).unwrap();
    assert_eq!(a.info().data_hash, b.info().data_hash);
}
