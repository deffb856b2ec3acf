//! Static lookup tables: marker styles, cadences, confirmation pairs.
//!
//! All three are plain data looked up by signal id. The marker deriver
//! reads them and never branches on specific signal names.

use serde::{Deserialize, Serialize};

// ── Styles ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerShape {
    Circle,
    TriangleUp,
    TriangleDown,
    TriangleLeft,
}

impl MarkerShape {
    /// Terminal glyph for this shape.
    pub fn glyph(self) -> char {
        match self {
            MarkerShape::Circle => '●',
            MarkerShape::TriangleUp => '▲',
            MarkerShape::TriangleDown => '▼',
            MarkerShape::TriangleLeft => '◀',
        }
    }
}

/// Visual style of one side (buy or sell) of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub shape: MarkerShape,
    pub size: u8,
    pub opacity: f32,
    pub border_width: u8,
    /// Horizon label shown in legends, e.g. `SHORT`.
    pub label: &'static str,
    /// `#RRGGBB`.
    pub color: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignalStyle {
    pub buy: MarkerStyle,
    pub sell: MarkerStyle,
}

const fn style(
    shape: MarkerShape,
    size: u8,
    opacity: f32,
    label: &'static str,
    color: &'static str,
) -> MarkerStyle {
    MarkerStyle {
        shape,
        size,
        opacity,
        border_width: 2,
        label,
        color,
    }
}

use MarkerShape::{Circle, TriangleDown, TriangleLeft, TriangleUp};

pub static SIGNAL_STYLES: &[(&str, SignalStyle)] = &[
    (
        "short_signal_v2",
        SignalStyle {
            buy: style(Circle, 8, 0.8, "SHORT", "#00FFFF"),
            sell: style(TriangleLeft, 12, 0.8, "SHORT", "#FF4444"),
        },
    ),
    (
        "macd_signal",
        SignalStyle {
            buy: style(TriangleUp, 16, 0.85, "SHORT", "#FFD700"),
            sell: style(TriangleDown, 16, 0.85, "SHORT", "#FF6666"),
        },
    ),
    (
        "short_signal_v1",
        SignalStyle {
            buy: style(Circle, 9, 0.8, "MID", "#32CD32"),
            sell: style(TriangleLeft, 13, 0.8, "MID", "#FF7777"),
        },
    ),
    (
        "momentum_color_signal",
        SignalStyle {
            buy: style(TriangleUp, 17, 0.85, "MID", "#FF69B4"),
            sell: style(TriangleDown, 17, 0.85, "MID", "#FF8888"),
        },
    ),
    (
        "long_signal",
        SignalStyle {
            buy: style(Circle, 10, 0.8, "LONG", "#4169E1"),
            sell: style(TriangleLeft, 14, 0.8, "LONG", "#FF9999"),
        },
    ),
    (
        "combined_signal_v1",
        SignalStyle {
            buy: style(TriangleUp, 15, 0.85, "LONG", "#FF8C00"),
            sell: style(TriangleDown, 15, 0.85, "LONG", "#FFAAAA"),
        },
    ),
];

/// Fallback for ids missing from `SIGNAL_STYLES`.
pub static DEFAULT_STYLE: SignalStyle = SignalStyle {
    buy: style(TriangleUp, 14, 0.8, "SIGNAL", "#00FF00"),
    sell: style(TriangleDown, 14, 0.8, "SIGNAL", "#FF0000"),
};

/// Style registered for `id`, if any.
pub fn lookup_style(id: &str) -> Option<&'static SignalStyle> {
    SIGNAL_STYLES
        .iter()
        .find(|(key, _)| *key == id)
        .map(|(_, s)| s)
}

/// Style for `id`, falling back to `DEFAULT_STYLE`.
pub fn style_for(id: &str) -> &'static SignalStyle {
    lookup_style(id).unwrap_or(&DEFAULT_STYLE)
}

// ── Cadence ──

/// How often a signal's markers are emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    /// One marker per firing bar.
    #[default]
    PerBar,
    /// One marker per calendar week, at the week's first firing.
    WeeklyDedup,
}

static BUILTIN_CADENCES: &[(&str, Cadence)] = &[("momentum_color_signal", Cadence::WeeklyDedup)];

/// Signal id -> cadence. Ids not listed are `PerBar`.
#[derive(Debug, Clone, Copy)]
pub struct CadenceTable {
    entries: &'static [(&'static str, Cadence)],
}

impl CadenceTable {
    pub const fn new(entries: &'static [(&'static str, Cadence)]) -> Self {
        Self { entries }
    }

    pub fn cadence(&self, id: &str) -> Cadence {
        self.entries
            .iter()
            .find(|(key, _)| *key == id)
            .map_or(Cadence::PerBar, |(_, c)| *c)
    }
}

impl Default for CadenceTable {
    fn default() -> Self {
        Self::new(BUILTIN_CADENCES)
    }
}

// ── Confirmation ──

/// Reversal signal -> trend signal whose recent firing confirms it.
pub static CONFIRMATIONS: &[(&str, &str)] = &[
    ("macd_signal", "short_signal_v2"),
    ("momentum_color_signal", "short_signal_v1"),
    ("combined_signal_v1", "long_signal"),
];

pub fn confirming_trend(reversal: &str) -> Option<&'static str> {
    CONFIRMATIONS
        .iter()
        .find(|(r, _)| *r == reversal)
        .map(|(_, t)| *t)
}

/// Pseudo-signals that never produce buy markers.
pub static SUPPRESSED_SIGNALS: &[&str] = &["fcv_signal"];

pub fn is_suppressed(id: &str) -> bool {
    SUPPRESSED_SIGNALS.contains(&id)
}
