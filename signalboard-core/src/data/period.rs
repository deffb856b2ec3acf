//! Requested display period: a trailing window ending at the latest bar.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::provider::DataError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[default]
    #[serde(rename = "3y")]
    ThreeYears,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "max")]
    Max,
}

impl Period {
    pub const ALL: [Period; 5] = [
        Period::SixMonths,
        Period::OneYear,
        Period::ThreeYears,
        Period::FiveYears,
        Period::Max,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Period::SixMonths => "6mo",
            Period::OneYear => "1y",
            Period::ThreeYears => "3y",
            Period::FiveYears => "5y",
            Period::Max => "max",
        }
    }

    fn months(self) -> Option<u32> {
        match self {
            Period::SixMonths => Some(6),
            Period::OneYear => Some(12),
            Period::ThreeYears => Some(36),
            Period::FiveYears => Some(60),
            Period::Max => None,
        }
    }

    /// First date included when the series ends at `latest`. `None` means unbounded.
    pub fn window_start(self, latest: NaiveDate) -> Option<NaiveDate> {
        self.months()
            .and_then(|m| latest.checked_sub_months(Months::new(m)))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Period::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| DataError::UnknownPeriod(s.to_string()))
    }
}
