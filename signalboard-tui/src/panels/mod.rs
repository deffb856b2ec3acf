//! Chart panels

pub mod candle_chart;

pub use candle_chart::{CandleChartPanel, EmptyChart};
