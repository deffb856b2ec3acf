//! Chart annotation pipeline.
//!
//! `build_annotations` turns one `SignalDataset` into everything a renderer
//! needs: aligned bars, markers, highlight intervals, drawable trend lines
//! and the legend. It is a pure function of its inputs.
//!
//! `annotate_chart` is the boundary used by the binaries. It never fails:
//! every error (and any panic inside the pipeline) becomes
//! `ChartOutcome::Empty`.

pub mod align;
pub mod highlight;
pub mod legend;
pub mod markers;
pub mod tables;
pub mod week;

use serde::Serialize;
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

use crate::config::AnnotationConfig;
use crate::data::provider::{SignalDataset, TrendLine};
use crate::domain::{Bar, HighlightInterval, Marker};

pub use align::{align_series, AlignedSeries, SeriesInput};
pub use highlight::{classify, derive_highlights, merge_contiguous, HighlightOutput};
pub use legend::{legend_entries, LegendEntry, LegendTone};
pub use markers::{derive_markers, SignalSelection};
pub use tables::{style_for, Cadence, CadenceTable, MarkerShape, MarkerStyle, SignalStyle};
pub use week::week_key;

/// Recovered anomalies. Logged, never shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A column was longer than the safe length and got truncated.
    LengthMismatch {
        series: String,
        len: usize,
        safe_len: usize,
    },
    /// A selected signal is absent from the dataset; treated as all-zero.
    MissingSignal { signal_id: String },
    /// No style registered for the signal; the generic style applies.
    UnknownStyle { signal_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum NoDataReason {
    /// The provider returned an error payload.
    UpstreamError(String),
    /// The dataset has no dates.
    EmptySeries,
    /// Some price column is empty.
    ZeroSafeLength,
    /// The pipeline panicked.
    Fault(String),
}

impl std::fmt::Display for NoDataReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoDataReason::UpstreamError(e) => write!(f, "upstream error: {e}"),
            NoDataReason::EmptySeries => f.write_str("no dates in dataset"),
            NoDataReason::ZeroSafeLength => f.write_str("a price column is empty"),
            NoDataReason::Fault(msg) => write!(f, "internal fault: {msg}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotateError {
    #[error("no data: {0}")]
    NoData(NoDataReason),
}

/// Everything a renderer draws for one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartAnnotations {
    pub symbol: String,
    pub bars: Vec<Bar>,
    pub markers: Vec<Marker>,
    pub highlights: Vec<HighlightInterval>,
    pub has_bullish: bool,
    pub has_bearish: bool,
    pub trendlines: Vec<TrendLine>,
    pub legend: Vec<LegendEntry>,
    pub diagnostics: Vec<Diagnostic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

/// Run the full pipeline over one dataset.
pub fn build_annotations(
    dataset: &SignalDataset,
    selected: &[&str],
    cfg: &AnnotationConfig,
) -> Result<ChartAnnotations, AnnotateError> {
    if let Some(err) = &dataset.error {
        return Err(AnnotateError::NoData(NoDataReason::UpstreamError(
            err.clone(),
        )));
    }
    if dataset.dates.is_empty() {
        return Err(AnnotateError::NoData(NoDataReason::EmptySeries));
    }

    let mut diagnostics = Vec::new();
    let aligned = align_series(&SeriesInput::from_dataset(dataset), &mut diagnostics)?;

    let selection =
        SignalSelection::resolve(selected.iter().copied(), &dataset.signals, &mut diagnostics);
    let markers = derive_markers(
        &aligned,
        &selection,
        &CadenceTable::default(),
        cfg,
        &mut diagnostics,
    );

    let dates: Vec<_> = aligned.dates().collect();
    let highlights = derive_highlights(&dates, dataset.indicator(&cfg.composite_id), cfg);

    let trendlines = dataset
        .trendlines
        .iter()
        .filter(|t| t.is_drawable())
        .cloned()
        .collect();

    for d in &diagnostics {
        tracing::debug!(symbol = %dataset.symbol, diagnostic = ?d, "annotation diagnostic");
    }

    Ok(ChartAnnotations {
        symbol: dataset.symbol.clone(),
        bars: aligned.into_bars(),
        markers,
        legend: legend_entries(highlights.has_bullish, highlights.has_bearish),
        highlights: highlights.intervals,
        has_bullish: highlights.has_bullish,
        has_bearish: highlights.has_bearish,
        trendlines,
        diagnostics,
        last_updated: dataset.last_updated.clone(),
    })
}

/// What the renderer should show.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChartOutcome {
    Ready(ChartAnnotations),
    Empty { symbol: String, reason: NoDataReason },
}

impl ChartOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, ChartOutcome::Ready(_))
    }

    pub fn annotations(&self) -> Option<&ChartAnnotations> {
        match self {
            ChartOutcome::Ready(a) => Some(a),
            ChartOutcome::Empty { .. } => None,
        }
    }
}

/// Boundary wrapper around `build_annotations` that cannot fail.
pub fn annotate_chart(
    dataset: &SignalDataset,
    selected: &[&str],
    cfg: &AnnotationConfig,
) -> ChartOutcome {
    guarded(&dataset.symbol, || build_annotations(dataset, selected, cfg))
}

/// Run `build` and map every failure, panics included, to `ChartOutcome::Empty`.
fn guarded<F>(symbol: &str, build: F) -> ChartOutcome
where
    F: FnOnce() -> Result<ChartAnnotations, AnnotateError>,
{
    match panic::catch_unwind(AssertUnwindSafe(build)) {
        Ok(Ok(annotations)) => ChartOutcome::Ready(annotations),
        Ok(Err(AnnotateError::NoData(reason))) => {
            tracing::info!(symbol = %symbol, %reason, "no chart data");
            ChartOutcome::Empty {
                symbol: symbol.to_string(),
                reason,
            }
        }
        Err(payload) => {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::error!(symbol = %symbol, error = %msg, "annotation pipeline panicked");
            ChartOutcome::Empty {
                symbol: symbol.to_string(),
                reason: NoDataReason::Fault(msg),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::provider::{PriceColumns, TrendPoint};
    use chrono::NaiveDate;

    fn dataset(n: usize) -> SignalDataset {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let dates: Vec<NaiveDate> = (0..n)
            .map(|i| start + chrono::Duration::days(i as i64))
            .collect();
        let col = vec![10.0; n];
        let mut ds = SignalDataset {
            symbol: "SPY".into(),
            dates,
            data: PriceColumns {
                open: col.clone(),
                high: col.clone(),
                low: col.clone(),
                close: col.clone(),
                volume: col,
            },
            ..SignalDataset::default()
        };
        ds.signals.insert("short_signal_v2".into(), vec![1; n]);
        ds
    }

    #[test]
    fn upstream_error_is_no_data() {
        let ds = SignalDataset::no_data("XYZ", "boom");
        let err = build_annotations(&ds, &["short_signal_v2"], &AnnotationConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            AnnotateError::NoData(NoDataReason::UpstreamError("boom".into()))
        );
    }

    #[test]
    fn empty_dates_is_no_data() {
        let ds = SignalDataset {
            symbol: "SPY".into(),
            ..SignalDataset::default()
        };
        let out = annotate_chart(&ds, &[], &AnnotationConfig::default());
        assert_eq!(
            out,
            ChartOutcome::Empty {
                symbol: "SPY".into(),
                reason: NoDataReason::EmptySeries
            }
        );
    }

    #[test]
    fn only_drawable_trendlines_pass_through() {
        let mut ds = dataset(3);
        let p = |day: u32| TrendPoint {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            price: 10.0,
        };
        ds.trendlines = vec![
            TrendLine { name: "a".into(), color: "#fff".into(), points: vec![p(1), p(3)] },
            TrendLine { name: "b".into(), color: "#fff".into(), points: vec![p(1)] },
        ];
        let out = build_annotations(&ds, &["short_signal_v2"], &AnnotationConfig::default())
            .unwrap();
        assert_eq!(out.trendlines.len(), 1);
        assert_eq!(out.trendlines[0].name, "a");
        assert_eq!(out.markers.len(), 3);
        assert_eq!(out.legend.len(), 1);
    }

    #[test]
    fn highlights_use_configured_composite() {
        let mut ds = dataset(3);
        ds.indicators.insert("alt".into(), vec![0.9, 0.0, -0.9]);
        let cfg = AnnotationConfig {
            composite_id: "alt".into(),
            ..AnnotationConfig::default()
        };
        let out = build_annotations(&ds, &[], &cfg).unwrap();
        assert!(out.has_bullish && out.has_bearish);
        assert_eq!(out.highlights.len(), 2);
        assert_eq!(out.legend.len(), 3);
    }

    #[test]
    fn mismatch_is_recovered_and_recorded() {
        let mut ds = dataset(5);
        ds.data.close.truncate(3);
        let out = build_annotations(&ds, &["short_signal_v2"], &AnnotationConfig::default())
            .unwrap();
        assert_eq!(out.bars.len(), 3);
        assert_eq!(out.markers.len(), 3);
        assert!(out
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::LengthMismatch { safe_len: 3, .. })));
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let out = annotate_chart(&dataset(2), &["short_signal_v2"], &AnnotationConfig::default());
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["status"], "ready");
        assert_eq!(json["markers"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn panic_in_pipeline_becomes_fault() {
        let out = guarded("SPY", || panic!("column index out of range"));
        assert_eq!(
            out,
            ChartOutcome::Empty {
                symbol: "SPY".into(),
                reason: NoDataReason::Fault("column index out of range".into()),
            }
        );

        let owned = guarded("QQQ", || panic!("bad bar {}", 7));
        assert!(matches!(
            owned,
            ChartOutcome::Empty { reason: NoDataReason::Fault(ref m), .. } if m == "bad bar 7"
        ));
    }

    #[test]
    fn guarded_passes_results_through() {
        let ready = guarded("SPY", || {
            build_annotations(&dataset(2), &[], &AnnotationConfig::default())
        });
        assert!(ready.is_ready());

        let empty = guarded("SPY", || {
            Err(AnnotateError::NoData(NoDataReason::ZeroSafeLength))
        });
        assert_eq!(
            empty,
            ChartOutcome::Empty {
                symbol: "SPY".into(),
                reason: NoDataReason::ZeroSafeLength,
            }
        );
    }
}
