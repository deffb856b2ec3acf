//! Background highlight intervals from the composite indicator.

use chrono::NaiveDate;

use crate::config::AnnotationConfig;
use crate::domain::{HighlightInterval, Polarity};

/// Raw per-bar intervals plus whether each polarity occurs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HighlightOutput {
    pub intervals: Vec<HighlightInterval>,
    pub has_bullish: bool,
    pub has_bearish: bool,
}

/// Classify one composite value. NaN is neutral.
pub fn classify(value: f64, cfg: &AnnotationConfig) -> Option<Polarity> {
    if value >= cfg.bullish_threshold {
        Some(Polarity::Bullish)
    } else if value <= cfg.bearish_threshold {
        Some(Polarity::Bearish)
    } else {
        None
    }
}

/// One interval per qualifying bar, spanning to the next bar's date.
///
/// Only indices below `min(dates.len(), composite.len())` are considered.
/// The last considered bar's interval ends where it starts unless a later
/// date exists.
pub fn derive_highlights(
    dates: &[NaiveDate],
    composite: Option<&[f64]>,
    cfg: &AnnotationConfig,
) -> HighlightOutput {
    let Some(values) = composite else {
        return HighlightOutput::default();
    };
    let n = dates.len().min(values.len());
    let mut out = HighlightOutput::default();

    for i in 0..n {
        let Some(polarity) = classify(values[i], cfg) else {
            continue;
        };
        let end = dates.get(i + 1).copied().unwrap_or(dates[i]);
        match polarity {
            Polarity::Bullish => out.has_bullish = true,
            Polarity::Bearish => out.has_bearish = true,
        }
        out.intervals.push(HighlightInterval {
            start: dates[i],
            end,
            polarity,
        });
    }

    out
}

/// Coalesce touching intervals of the same polarity.
///
/// Input must be ordered by start, as `derive_highlights` emits it.
pub fn merge_contiguous(intervals: &[HighlightInterval]) -> Vec<HighlightInterval> {
    let mut merged: Vec<HighlightInterval> = Vec::with_capacity(intervals.len());
    for iv in intervals {
        match merged.last_mut() {
            Some(prev) if prev.polarity == iv.polarity && iv.start <= prev.end => {
                prev.end = prev.end.max(iv.end);
            }
            _ => merged.push(*iv),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates(n: usize) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..n).map(|i| start + chrono::Duration::days(i as i64)).collect()
    }

    #[test]
    fn mixed_polarities() {
        let d = dates(4);
        let out = derive_highlights(
            &d,
            Some(&[0.6, 0.6, -0.6, 0.1][..]),
            &AnnotationConfig::default(),
        );
        assert_eq!(
            out.intervals,
            vec![
                HighlightInterval { start: d[0], end: d[1], polarity: Polarity::Bullish },
                HighlightInterval { start: d[1], end: d[2], polarity: Polarity::Bullish },
                HighlightInterval { start: d[2], end: d[3], polarity: Polarity::Bearish },
            ]
        );
        assert!(out.has_bullish);
        assert!(out.has_bearish);
    }

    #[test]
    fn thresholds_are_inclusive() {
        let cfg = AnnotationConfig::default();
        assert_eq!(classify(0.5, &cfg), Some(Polarity::Bullish));
        assert_eq!(classify(-0.5, &cfg), Some(Polarity::Bearish));
        assert_eq!(classify(0.49999, &cfg), None);
        assert_eq!(classify(-0.49999, &cfg), None);
        assert_eq!(classify(f64::NAN, &cfg), None);
    }

    #[test]
    fn last_bar_interval_is_degenerate() {
        let d = dates(3);
        let out = derive_highlights(&d, Some(&[0.0, 0.0, 0.9][..]), &AnnotationConfig::default());
        assert_eq!(out.intervals.len(), 1);
        assert_eq!(out.intervals[0].start, d[2]);
        assert_eq!(out.intervals[0].end, d[2]);
    }

    #[test]
    fn short_composite_still_spans_to_next_date() {
        let d = dates(5);
        let out = derive_highlights(&d, Some(&[0.0, 0.7][..]), &AnnotationConfig::default());
        assert_eq!(out.intervals.len(), 1);
        assert_eq!(out.intervals[0].end, d[2]);
    }

    #[test]
    fn absent_or_empty_composite_is_quiet() {
        let d = dates(3);
        let cfg = AnnotationConfig::default();
        assert_eq!(derive_highlights(&d, None, &cfg), HighlightOutput::default());
        assert_eq!(derive_highlights(&d, Some(&[][..]), &cfg), HighlightOutput::default());
    }

    #[test]
    fn merge_joins_touching_same_polarity() {
        let d = dates(6);
        let out = derive_highlights(
            &d,
            Some(&[0.6, 0.7, -0.6, -0.8, 0.0, 0.9][..]),
            &AnnotationConfig::default(),
        );
        let merged = merge_contiguous(&out.intervals);
        assert_eq!(
            merged,
            vec![
                HighlightInterval { start: d[0], end: d[2], polarity: Polarity::Bullish },
                HighlightInterval { start: d[2], end: d[4], polarity: Polarity::Bearish },
                HighlightInterval { start: d[5], end: d[5], polarity: Polarity::Bullish },
            ]
        );
    }
}
