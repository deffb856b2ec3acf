//! Symbol catalog and signal groups.
//!
//! The catalog is an ordered symbol list with display names plus the
//! horizon groups a user picks from. It can be loaded from TOML:
//!
//! ```toml
//! [[symbols]]
//! symbol = "SPY"
//! name = "SPY (S&P 500)"
//!
//! [[groups]]
//! key = "short"
//! name = "Short"
//! description = "Short-term trading"
//! signals = ["short_signal_v2", "macd_signal"]
//! color = "#00FFFF"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::config::ConfigError;

/// One selectable symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub symbol: String,
    pub name: String,
}

/// A named set of signals shown together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalGroup {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub signals: Vec<String>,
    /// Accent color, `#RRGGBB`.
    #[serde(default = "default_group_color")]
    pub color: String,
}

fn default_group_color() -> String {
    "#FFFFFF".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub symbols: Vec<CatalogEntry>,
    #[serde(default)]
    pub groups: Vec<SignalGroup>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    /// Load a catalog from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a catalog from TOML. Sections left out fall back to the built-in ones.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let mut catalog: Catalog = toml::from_str(content)?;
        let builtin = Self::builtin();
        if catalog.symbols.is_empty() {
            catalog.symbols = builtin.symbols;
        }
        if catalog.groups.is_empty() {
            catalog.groups = builtin.groups;
        }
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load `path` if given, otherwise the built-in catalog.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::builtin()),
        }
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for entry in &self.symbols {
            if !seen.insert(entry.symbol.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate symbol in catalog: {}",
                    entry.symbol
                )));
            }
        }
        let mut keys = HashSet::new();
        for group in &self.groups {
            if !keys.insert(group.key.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate group key in catalog: {}",
                    group.key
                )));
            }
            if group.signals.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "group '{}' has no signals",
                    group.key
                )));
            }
        }
        Ok(())
    }

    /// Display name of `symbol`, or the symbol itself when uncatalogued.
    pub fn display_name<'a>(&'a self, symbol: &'a str) -> &'a str {
        self.symbols
            .iter()
            .find(|e| e.symbol == symbol)
            .map_or(symbol, |e| e.name.as_str())
    }

    /// Group by key, case-insensitive.
    pub fn group(&self, key: &str) -> Option<&SignalGroup> {
        self.groups
            .iter()
            .find(|g| g.key.eq_ignore_ascii_case(key) || g.name.eq_ignore_ascii_case(key))
    }

    pub fn position(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|e| e.symbol == symbol)
    }

    /// Built-in list: indices, large caps, ETFs, FX pairs.
    pub fn builtin() -> Self {
        let symbols = BUILTIN_SYMBOLS
            .iter()
            .map(|(symbol, name)| CatalogEntry {
                symbol: symbol.to_string(),
                name: name.to_string(),
            })
            .collect();

        let groups = vec![
            group(
                "short",
                "Short",
                "Short-term trading signals",
                &["short_signal_v2", "macd_signal"],
                "#00FFFF",
            ),
            group(
                "mid",
                "Mid",
                "Mid-term investing signals",
                &["short_signal_v1", "momentum_color_signal"],
                "#32CD32",
            ),
            group(
                "long",
                "Long",
                "Long-term investing signals",
                &["long_signal", "combined_signal_v1"],
                "#4169E1",
            ),
        ];

        Self { symbols, groups }
    }
}

fn group(key: &str, name: &str, description: &str, signals: &[&str], color: &str) -> SignalGroup {
    SignalGroup {
        key: key.into(),
        name: name.into(),
        description: description.into(),
        signals: signals.iter().map(|s| s.to_string()).collect(),
        color: color.into(),
    }
}

const BUILTIN_SYMBOLS: &[(&str, &str)] = &[
    ("^KS11", "KOSPI"),
    ("^IXIC", "NASDAQ Composite"),
    ("^GSPC", "S&P 500"),
    ("^DJI", "Dow Jones"),
    ("^VIX", "VIX (volatility index)"),
    ("AAPL", "Apple"),
    ("MSFT", "Microsoft"),
    ("GOOGL", "Google"),
    ("AMZN", "Amazon"),
    ("TSLA", "Tesla"),
    ("NVDA", "NVIDIA"),
    ("META", "Meta"),
    ("NFLX", "Netflix"),
    ("AMD", "AMD"),
    ("INTC", "Intel"),
    ("CRM", "Salesforce"),
    ("ADBE", "Adobe"),
    ("PYPL", "PayPal"),
    ("UBER", "Uber"),
    ("SPOT", "Spotify"),
    ("TLT", "TLT (long-term treasuries)"),
    ("IEF", "IEF (intermediate treasuries)"),
    ("GLD", "GLD (gold ETF)"),
    ("SLV", "SLV (silver ETF)"),
    ("VTI", "VTI (total US market)"),
    ("QQQ", "QQQ (NASDAQ 100)"),
    ("SPY", "SPY (S&P 500)"),
    ("DIA", "DIA (Dow Jones)"),
    ("IWM", "IWM (Russell 2000)"),
    ("EFA", "EFA (developed markets)"),
    ("EEM", "EEM (emerging markets)"),
    ("VEA", "VEA (developed markets)"),
    ("VWO", "VWO (emerging markets)"),
    ("BND", "BND (US bonds)"),
    ("AGG", "AGG (US aggregate bonds)"),
    ("LQD", "LQD (corporate bonds)"),
    ("HYG", "HYG (high-yield bonds)"),
    ("EMB", "EMB (emerging-market bonds)"),
    ("TIP", "TIP (inflation-protected bonds)"),
    ("SHY", "SHY (short-term bonds)"),
    ("USDKRW=X", "USD/KRW"),
    ("EURUSD=X", "EUR/USD"),
    ("GBPUSD=X", "GBP/USD"),
    ("USDJPY=X", "USD/JPY"),
    ("AUDUSD=X", "AUD/USD"),
    ("USDCAD=X", "USD/CAD"),
    ("USDCHF=X", "USD/CHF"),
    ("NZDUSD=X", "NZD/USD"),
];
