//! Application state: single-owner, main-thread only.
//!
//! All TUI state lives here. The flow is a fixed sequence of steps:
//! disclaimer gate, symbol picker, signal-group picker, chart.

use std::path::PathBuf;
use std::time::Instant;

use signalboard_core::annotate::{annotate_chart, NoDataReason};
use signalboard_core::{
    AppConfig, Catalog, ChartOutcome, DatasetCache, JsonSignalStore, Period, SignalGroup,
};

/// Which screen is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Disclaimer,
    Symbol,
    Group,
    Chart,
}

impl Step {
    /// Number shown in the header; the disclaimer is not a numbered step.
    pub fn number(self) -> Option<usize> {
        match self {
            Step::Disclaimer => None,
            Step::Symbol => Some(1),
            Step::Group => Some(2),
            Step::Chart => Some(3),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Step::Disclaimer => "Disclaimer",
            Step::Symbol => "Select Symbol",
            Step::Group => "Select Signals",
            Step::Chart => "Chart",
        }
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Top-level application state.
pub struct AppState {
    // Navigation
    pub running: bool,
    pub step: Step,
    pub disclaimer_accepted: bool,
    pub symbol_cursor: usize,
    pub group_cursor: usize,

    // Selections
    pub selected_symbol: Option<String>,
    pub selected_group: Option<String>,
    pub period: Period,

    // Data
    pub catalog: Catalog,
    pub store: JsonSignalStore,
    pub cache: DatasetCache,
    pub config: AppConfig,
    pub outcome: Option<ChartOutcome>,

    // Cross-cutting
    pub status_message: Option<(String, StatusLevel)>,
    pub state_path: PathBuf,
}

impl AppState {
    pub fn new(config: AppConfig, catalog: Catalog, store: JsonSignalStore, state_path: PathBuf) -> Self {
        let mut app = Self {
            running: true,
            step: Step::Disclaimer,
            disclaimer_accepted: false,
            symbol_cursor: 0,
            group_cursor: 0,
            selected_symbol: None,
            selected_group: None,
            period: config.default_period,
            cache: DatasetCache::new(config.cache_ttl()),
            catalog,
            store,
            config,
            outcome: None,
            status_message: None,
            state_path,
        };
        if app.store.is_empty() {
            let path = app.config.data_file.display().to_string();
            app.set_warning(format!("Data file not found or empty: {path}"));
        }
        app
    }

    pub fn symbol_count(&self) -> usize {
        self.catalog.symbols.len()
    }

    pub fn group_count(&self) -> usize {
        self.catalog.groups.len()
    }

    /// Group currently chosen for the chart.
    pub fn current_group(&self) -> Option<&SignalGroup> {
        self.selected_group
            .as_deref()
            .and_then(|key| self.catalog.group(key))
    }

    // ── Navigation ──

    pub fn accept_disclaimer(&mut self) {
        self.disclaimer_accepted = true;
        self.step = Step::Symbol;
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let (cursor, len) = match self.step {
            Step::Symbol => (&mut self.symbol_cursor, self.catalog.symbols.len()),
            Step::Group => (&mut self.group_cursor, self.catalog.groups.len()),
            _ => return,
        };
        if len == 0 {
            return;
        }
        *cursor = (*cursor as isize + delta).clamp(0, len as isize - 1) as usize;
    }

    /// Confirm the symbol under the cursor and go to the group step.
    pub fn select_symbol(&mut self) {
        let Some(entry) = self.catalog.symbols.get(self.symbol_cursor) else {
            return;
        };
        tracing::info!(symbol = %entry.symbol, "symbol selected");
        self.selected_symbol = Some(entry.symbol.clone());
        self.step = Step::Group;
    }

    /// Confirm the group under the cursor and render the chart.
    pub fn select_group(&mut self) {
        let Some(group) = self.catalog.groups.get(self.group_cursor) else {
            return;
        };
        tracing::info!(group = %group.key, "signal group selected");
        self.selected_group = Some(group.key.clone());
        self.step = Step::Chart;
        self.refresh_chart(Instant::now());
    }

    /// One step back. The disclaimer cannot be revisited.
    pub fn back(&mut self) {
        self.step = match self.step {
            Step::Disclaimer | Step::Symbol => self.step,
            Step::Group => Step::Symbol,
            Step::Chart => {
                self.outcome = None;
                Step::Group
            }
        };
    }

    /// Where to start after restoring persisted state.
    pub fn resume(&mut self) {
        if !self.disclaimer_accepted {
            self.step = Step::Disclaimer;
            return;
        }
        self.step = Step::Symbol;
        if let Some(i) = self
            .selected_symbol
            .as_deref()
            .and_then(|s| self.catalog.position(s))
        {
            self.symbol_cursor = i;
        }
        if let Some(i) = self
            .selected_group
            .as_deref()
            .and_then(|key| self.catalog.groups.iter().position(|g| g.key == key))
        {
            self.group_cursor = i;
        }
    }

    // ── Chart ──

    /// Recompute annotations for the current selection.
    pub fn refresh_chart(&mut self, now: Instant) {
        let Some(symbol) = self.selected_symbol.clone() else {
            return;
        };
        let signals: Vec<String> = self
            .current_group()
            .map(|g| g.signals.clone())
            .unwrap_or_default();
        let ids: Vec<&str> = signals.iter().map(String::as_str).collect();

        let store = &self.store;
        let period = self.period;
        let dataset = self
            .cache
            .get_or_load(&symbol, period, now, || store.dataset(&symbol, period));
        let outcome = annotate_chart(&dataset, &ids, &self.config.annotation);

        match &outcome {
            ChartOutcome::Ready(chart) => {
                let name = self.catalog.display_name(&symbol).to_string();
                let mut msg = format!("{name}: {} bars, {} markers", chart.bars.len(), chart.markers.len());
                if let Some(updated) = &chart.last_updated {
                    msg.push_str(&format!(" | data as of {updated}"));
                }
                self.set_status(msg);
            }
            ChartOutcome::Empty {
                reason: NoDataReason::Fault(_),
                ..
            } => {
                self.set_error(format!("{symbol}: chart could not be built"));
            }
            ChartOutcome::Empty { reason, .. } => {
                self.set_warning(format!("{symbol}: {reason}"));
            }
        }
        self.outcome = Some(outcome);
    }

    pub fn cycle_period(&mut self) {
        let i = Period::ALL.iter().position(|p| *p == self.period).unwrap_or(0);
        self.period = Period::ALL[(i + 1) % Period::ALL.len()];
        self.refresh_chart(Instant::now());
    }

    /// Drop cached datasets for the current symbol and recompute.
    pub fn reload(&mut self) {
        if let Some(symbol) = self.selected_symbol.as_deref() {
            let dropped = self.cache.invalidate(symbol);
            tracing::debug!(symbol, dropped, "cache invalidated");
        }
        self.refresh_chart(Instant::now());
    }

    pub fn toggle_sell_markers(&mut self) {
        let flag = &mut self.config.annotation.render_sell_markers;
        *flag = !*flag;
        self.refresh_chart(Instant::now());
    }

    // ── Status ──

    /// Set an info status message.
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    /// Set a warning status message.
    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    /// Set an error status message.
    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Error));
    }
}
