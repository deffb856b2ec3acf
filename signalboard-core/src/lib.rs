//! SignalBoard Core: signal datasets in, chart annotations out.
//!
//! This crate contains everything below the presentation layer:
//! - Domain types (bars, markers, highlight intervals)
//! - Series alignment over possibly mismatched column lengths
//! - Marker derivation with per-signal cadence and confirmation windows
//! - Composite-indicator highlight intervals
//! - The JSON record store, period windows and the dataset cache
//! - Symbol catalog, signal groups and configuration

pub mod annotate;
pub mod catalog;
pub mod config;
pub mod data;
pub mod domain;

pub use annotate::{annotate_chart, build_annotations, ChartAnnotations, ChartOutcome};
pub use catalog::{Catalog, SignalGroup};
pub use config::{AnnotationConfig, AppConfig};
pub use data::{DatasetCache, JsonSignalStore, Period, SignalDataset};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types shared with the TUI event loop are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::Marker>();
        require_sync::<domain::Marker>();
        require_send::<domain::HighlightInterval>();
        require_sync::<domain::HighlightInterval>();

        require_send::<SignalDataset>();
        require_sync::<SignalDataset>();
        require_send::<ChartAnnotations>();
        require_sync::<ChartAnnotations>();
        require_send::<ChartOutcome>();
        require_sync::<ChartOutcome>();

        require_send::<JsonSignalStore>();
        require_sync::<JsonSignalStore>();
        require_send::<DatasetCache>();
        require_sync::<DatasetCache>();
        require_send::<AppConfig>();
        require_sync::<AppConfig>();
        require_send::<Catalog>();
        require_sync::<Catalog>();
    }
}
