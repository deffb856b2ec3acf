//! Test helpers for building app state over a small in-memory dataset

use std::path::PathBuf;

use signalboard_core::{AppConfig, Catalog, JsonSignalStore};

use crate::app::AppState;

/// One SPY week with short and mid group signals plus a composite column.
pub const FIXTURE: &str = r#"[
  {"symbol": "SPY", "date": "2024-03-04", "open": 510.0, "high": 512.5, "low": 508.1, "close": 511.9, "volume": 71000000,
   "short_signal_v1": 0, "short_signal_v2": 1, "macd_signal": 0, "momentum_color_signal": 1, "fcv": 0.62},
  {"symbol": "SPY", "date": "2024-03-05", "open": 511.0, "high": 511.8, "low": 505.2, "close": 507.0, "volume": 80500000,
   "short_signal_v1": 1, "short_signal_v2": 0, "macd_signal": 1, "momentum_color_signal": 1, "fcv": 0.55},
  {"symbol": "SPY", "date": "2024-03-06", "open": 508.2, "high": 511.0, "low": 507.4, "close": 509.6, "volume": 69000000,
   "short_signal_v1": 0, "short_signal_v2": 0, "macd_signal": 0, "momentum_color_signal": 0, "fcv": 0.1},
  {"symbol": "SPY", "date": "2024-03-07", "open": 510.3, "high": 515.1, "low": 510.0, "close": 514.8, "volume": 66000000,
   "short_signal_v1": 0, "short_signal_v2": 0, "macd_signal": 0, "momentum_color_signal": 0, "fcv": -0.51},
  {"symbol": "SPY", "date": "2024-03-08", "open": 515.5, "high": 518.2, "low": 511.3, "close": 512.9, "volume": 90000000,
   "short_signal_v1": 0, "short_signal_v2": 0, "macd_signal": 0, "momentum_color_signal": 0, "fcv": 0.0},
  {"symbol": "SPY", "date": "2024-03-11", "open": 511.0, "high": 512.0, "low": 508.6, "close": 511.3, "volume": 62000000,
   "short_signal_v1": 0, "short_signal_v2": 0, "macd_signal": 0, "momentum_color_signal": 1, "fcv": 0.0,
   "last_updated": "2024-03-11"}
]"#;

pub fn app_with_fixture(json: &str) -> AppState {
    let store = JsonSignalStore::from_slice(json.as_bytes()).unwrap();
    AppState::new(
        AppConfig::default(),
        Catalog::builtin(),
        store,
        PathBuf::from("unused-state.json"),
    )
}
