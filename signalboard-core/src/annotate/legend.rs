//! Chart legend entries.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendTone {
    Neutral,
    Bullish,
    Bearish,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub text: &'static str,
    pub tone: LegendTone,
}

/// "local low" always; buy/sell zones only when such highlights exist.
pub fn legend_entries(has_bullish: bool, has_bearish: bool) -> Vec<LegendEntry> {
    let mut entries = vec![LegendEntry {
        text: "● local low",
        tone: LegendTone::Neutral,
    }];
    if has_bullish {
        entries.push(LegendEntry {
            text: "aggressive buy zone",
            tone: LegendTone::Bullish,
        });
    }
    if has_bearish {
        entries.push(LegendEntry {
            text: "aggressive sell zone",
            tone: LegendTone::Bearish,
        });
    }
    entries
}
