//! Derived chart annotations: markers and highlight intervals.
//!
//! Both are ephemeral. They are recomputed on every render and never persisted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How a marker should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleClass {
    /// Buy glyph below the bar's low.
    PrimaryEntry,
    /// "BUY!!" call-out for a confirmed reversal.
    ConfirmationText,
    /// Sell glyph above the bar's high. Only produced when sell rendering is enabled.
    SellExit,
}

impl StyleClass {
    pub fn label(self) -> &'static str {
        match self {
            StyleClass::PrimaryEntry => "primary-entry",
            StyleClass::ConfirmationText => "confirmation-text",
            StyleClass::SellExit => "sell-exit",
        }
    }
}

/// A single point annotation on the price chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub date: NaiveDate,
    pub price: f64,
    pub style_class: StyleClass,
    pub signal_id: String,
}

/// Direction of a composite-indicator highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Bullish,
    Bearish,
}

impl Polarity {
    pub fn label(self) -> &'static str {
        match self {
            Polarity::Bullish => "bullish",
            Polarity::Bearish => "bearish",
        }
    }
}

/// Background tint spanning `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightInterval {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub polarity: Polarity,
}

impl HighlightInterval {
    /// True if `date` falls inside the interval (both ends inclusive).
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}
