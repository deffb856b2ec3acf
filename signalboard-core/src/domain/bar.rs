//! Bar: one day's OHLCV record for a symbol.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// OHLCV bar produced by the series aligner.
///
/// Volume is kept as `f64` because the upstream dataset stores it as a float
/// and the aligner treats every column the same way.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Up candle: close at or above open.
    pub fn is_up(&self) -> bool {
        self.close >= self.open
    }
}
