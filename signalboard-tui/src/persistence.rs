//! UI preference persistence: JSON save/load across restarts.
//!
//! Only navigation state lives here. Chart data is always recomputed.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use signalboard_core::Period;

use crate::app::AppState;

/// Serializable subset of app state that persists across restarts.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub disclaimer_accepted: bool,
    pub last_symbol: Option<String>,
    pub last_group: Option<String>,
    pub period: Option<Period>,
}

/// `<config dir>/signalboard/state.json`, or the working directory as a fallback.
pub fn default_state_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("signalboard")
        .join("state.json")
}

/// Load persisted state from disk. Returns defaults if file is missing or corrupt.
pub fn load(path: &Path) -> PersistedState {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt state file");
            PersistedState::default()
        }),
        Err(_) => PersistedState::default(),
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Extract persisted state from AppState.
pub fn extract(app: &AppState) -> PersistedState {
    PersistedState {
        disclaimer_accepted: app.disclaimer_accepted,
        last_symbol: app.selected_symbol.clone(),
        last_group: app.selected_group.clone(),
        period: Some(app.period),
    }
}

/// Apply persisted state to AppState and pick the starting step.
pub fn apply(app: &mut AppState, state: PersistedState) {
    app.disclaimer_accepted = state.disclaimer_accepted;
    app.selected_symbol = state.last_symbol;
    app.selected_group = state
        .last_group
        .filter(|key| app.catalog.group(key).is_some());
    if let Some(period) = state.period {
        app.period = period;
    }
    app.resume();
}
