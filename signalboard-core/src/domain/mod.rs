//! Domain types for SignalBoard

pub mod annotation;
pub mod bar;

pub use annotation::{HighlightInterval, Marker, Polarity, StyleClass};
pub use bar::Bar;

/// Symbol type alias
pub type Symbol = String;

/// Signal identifier, e.g. `short_signal_v2`.
pub type SignalId = String;
