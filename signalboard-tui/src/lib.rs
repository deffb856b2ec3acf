//! SignalBoard TUI: step-by-step terminal chart viewer.
//!
//! Flow:
//! - Disclaimer gate (accepted once, remembered)
//! - Step 1: symbol picker
//! - Step 2: signal group picker
//! - Step 3: annotated candle chart

pub mod app;
pub mod input;
pub mod logging;
pub mod panels;
pub mod persistence;
pub mod theme;
pub mod ui;

pub use app::{AppState, Step};
pub use theme::Theme;

#[cfg(test)]
mod test_helpers;
