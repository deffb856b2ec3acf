//! Marker derivation from per-bar signal series.
//!
//! For every selected signal, in selection order:
//! 1. primary markers by the signal's cadence (every firing bar, or the
//!    first firing bar of each week),
//! 2. confirmation call-outs when the signal is a reversal and its trend
//!    signal fired within the lookback window,
//! 3. sell markers, only when sell rendering is enabled.

use std::collections::{BTreeMap, HashSet};

use super::align::AlignedSeries;
use super::tables::{confirming_trend, is_suppressed, lookup_style, Cadence, CadenceTable};
use super::week::week_key;
use super::Diagnostic;
use crate::config::AnnotationConfig;
use crate::domain::{Bar, Marker, StyleClass};

/// The signals chosen for display, ordered and deduplicated.
#[derive(Debug, Clone, Default)]
pub struct SignalSelection<'a> {
    entries: Vec<(&'a str, &'a [i8])>,
}

impl<'a> SignalSelection<'a> {
    /// Resolve `ids` against the dataset's signal map.
    ///
    /// Ids the dataset lacks are kept as empty series (no markers) and
    /// reported as `MissingSignal`.
    pub fn resolve<I>(
        ids: I,
        signals: &'a BTreeMap<String, Vec<i8>>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut selection = Self::default();
        for id in ids {
            if selection.contains(id) {
                continue;
            }
            let values: &'a [i8] = match signals.get(id) {
                Some(v) => v.as_slice(),
                None => {
                    tracing::debug!(signal_id = id, "selected signal missing from dataset");
                    diagnostics.push(Diagnostic::MissingSignal {
                        signal_id: id.to_string(),
                    });
                    &[]
                }
            };
            selection.entries.push((id, values));
        }
        selection
    }

    /// Build directly from (id, values) pairs. Later duplicates are dropped.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (&'a str, &'a [i8])>) -> Self {
        let mut selection = Self::default();
        for (id, values) in pairs {
            if !selection.contains(id) {
                selection.entries.push((id, values));
            }
        }
        selection
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|(k, _)| *k == id)
    }

    /// Values of a selected signal. `None` when not selected.
    pub fn get(&self, id: &str) -> Option<&'a [i8]> {
        self.entries
            .iter()
            .find(|(k, _)| *k == id)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a [i8])> + '_ {
        self.entries.iter().copied()
    }

    pub fn ids(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Derive all markers for `selection` over the aligned bars.
pub fn derive_markers(
    aligned: &AlignedSeries,
    selection: &SignalSelection<'_>,
    cadences: &CadenceTable,
    cfg: &AnnotationConfig,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<Marker> {
    let bars = aligned.bars();
    let mut markers = Vec::new();

    for (id, values) in selection.iter() {
        let draws_anything = !is_suppressed(id) || cfg.render_sell_markers;
        if draws_anything && lookup_style(id).is_none() {
            diagnostics.push(Diagnostic::UnknownStyle {
                signal_id: id.to_string(),
            });
        }
        let cadence = cadences.cadence(id);

        if !is_suppressed(id) {
            markers.extend(primary_markers(bars, id, values, cadence, cfg));
            if let Some(trend) = confirming_trend(id) {
                // Not selected reads as an empty series: never confirmed.
                let trend_values = selection.get(trend).unwrap_or(&[]);
                markers.extend(confirmation_markers(
                    bars,
                    id,
                    values,
                    trend_values,
                    cadence,
                    cfg,
                ));
            }
        }

        if cfg.render_sell_markers {
            markers.extend(sell_markers(bars, id, values, cfg));
        }
    }

    markers
}

/// Indices `i < bars_len` where `values[i] == target`, ascending.
pub fn firing_indices(values: &[i8], bars_len: usize, target: i8) -> impl Iterator<Item = usize> + '_ {
    values
        .iter()
        .take(bars_len)
        .enumerate()
        .filter(move |(_, v)| **v == target)
        .map(|(i, _)| i)
}

/// Keep only the first index of each calendar week.
fn first_per_week<'b>(
    bars: &'b [Bar],
    indices: impl Iterator<Item = usize> + 'b,
) -> impl Iterator<Item = usize> + 'b {
    let mut seen = HashSet::new();
    indices.filter(move |&i| seen.insert(week_key(bars[i].date)))
}

/// True if `trend` equals 1 anywhere in `[max(0, i - lookback), i)`.
///
/// A trend series with no value at `i` never confirms.
pub fn trend_fired_within(trend: &[i8], i: usize, lookback: usize) -> bool {
    if trend.len() <= i {
        return false;
    }
    let start = i.saturating_sub(lookback);
    trend[start..i].contains(&1)
}

fn primary_markers(
    bars: &[Bar],
    id: &str,
    values: &[i8],
    cadence: Cadence,
    cfg: &AnnotationConfig,
) -> Vec<Marker> {
    let fired = firing_indices(values, bars.len(), 1);
    let (indices, offset): (Vec<usize>, f64) = match cadence {
        Cadence::PerBar => (fired.collect(), cfg.per_bar_offset),
        Cadence::WeeklyDedup => (first_per_week(bars, fired).collect(), cfg.weekly_offset),
    };
    indices
        .into_iter()
        .map(|i| Marker {
            date: bars[i].date,
            price: bars[i].low * offset,
            style_class: StyleClass::PrimaryEntry,
            signal_id: id.to_string(),
        })
        .collect()
}

fn confirmation_markers(
    bars: &[Bar],
    id: &str,
    values: &[i8],
    trend: &[i8],
    cadence: Cadence,
    cfg: &AnnotationConfig,
) -> Vec<Marker> {
    let lookback = match cadence {
        Cadence::PerBar => cfg.per_bar_lookback,
        Cadence::WeeklyDedup => cfg.weekly_lookback,
    };
    let confirmed = firing_indices(values, bars.len(), 1)
        .filter(|&i| trend_fired_within(trend, i, lookback));
    let indices: Vec<usize> = match cadence {
        Cadence::PerBar => confirmed.collect(),
        Cadence::WeeklyDedup => first_per_week(bars, confirmed).collect(),
    };
    indices
        .into_iter()
        .map(|i| Marker {
            date: bars[i].date,
            price: bars[i].low * cfg.confirmation_offset,
            style_class: StyleClass::ConfirmationText,
            signal_id: id.to_string(),
        })
        .collect()
}

fn sell_markers(bars: &[Bar], id: &str, values: &[i8], cfg: &AnnotationConfig) -> Vec<Marker> {
    firing_indices(values, bars.len(), -1)
        .map(|i| Marker {
            date: bars[i].date,
            price: bars[i].high * cfg.sell_offset,
            style_class: StyleClass::SellExit,
            signal_id: id.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::align::{align_series, SeriesInput};
    use chrono::NaiveDate;

    /// `n` consecutive calendar days from Monday 2024-01-01, low = 100 + i.
    fn aligned(n: usize) -> AlignedSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let dates: Vec<NaiveDate> = (0..n)
            .map(|i| start + chrono::Duration::days(i as i64))
            .collect();
        let low: Vec<f64> = (0..n).map(|i| 100.0 + i as f64).collect();
        let high: Vec<f64> = low.iter().map(|l| l + 10.0).collect();
        let input = SeriesInput {
            dates: &dates,
            open: &low,
            high: &high,
            low: &low,
            close: &high,
            volume: &low,
        };
        align_series(&input, &mut Vec::new()).unwrap()
    }

    fn fires_at(n: usize, at: &[usize]) -> Vec<i8> {
        let mut v = vec![0; n];
        for &i in at {
            v[i] = 1;
        }
        v
    }

    fn run(a: &AlignedSeries, pairs: &[(&str, &[i8])], cfg: &AnnotationConfig) -> Vec<Marker> {
        let sel = SignalSelection::from_pairs(pairs.iter().copied());
        derive_markers(a, &sel, &CadenceTable::default(), cfg, &mut Vec::new())
    }

    #[test]
    fn per_bar_marks_every_firing() {
        let a = aligned(5);
        let v = vec![0, 1, 0, 0, 1];
        let m = run(&a, &[("short_signal_v2", &v)], &AnnotationConfig::default());
        assert_eq!(m.len(), 2);
        assert_eq!(m[0].date, a.bars()[1].date);
        assert!((m[0].price - 101.0 * 0.97).abs() < 1e-9);
        assert!((m[1].price - 104.0 * 0.97).abs() < 1e-9);
        assert!(m.iter().all(|m| m.style_class == StyleClass::PrimaryEntry));
    }

    #[test]
    fn weekly_dedup_keeps_first_of_week() {
        let a = aligned(10);
        let v = fires_at(10, &[0, 1, 2, 8]);
        let m = run(&a, &[("momentum_color_signal", &v)], &AnnotationConfig::default());
        assert_eq!(m.len(), 2);
        assert_eq!(m[0].date, a.bars()[0].date);
        assert!((m[0].price - 100.0 * 0.99).abs() < 1e-9);
        assert_eq!(m[1].date, a.bars()[8].date);
    }

    #[test]
    fn signal_longer_than_bars_is_clipped() {
        let a = aligned(3);
        let v = vec![1, 1, 1, 1, 1];
        let m = run(&a, &[("short_signal_v2", &v)], &AnnotationConfig::default());
        assert_eq!(m.len(), 3);
    }

    #[test]
    fn confirmation_window_boundary() {
        let a = aligned(40);
        let reversal = fires_at(40, &[30]);
        let cfg = AnnotationConfig::default();

        let confirmations = |trend_at: &[usize]| {
            let trend = fires_at(40, trend_at);
            run(
                &a,
                &[("macd_signal", &reversal), ("short_signal_v2", &trend)],
                &cfg,
            )
            .into_iter()
            .filter(|m| m.style_class == StyleClass::ConfirmationText)
            .count()
        };

        assert_eq!(confirmations(&[10]), 1);
        assert_eq!(confirmations(&[9]), 0);
        assert_eq!(confirmations(&[30]), 0);
        assert_eq!(confirmations(&[29]), 1);
        assert_eq!(confirmations(&[15, 16, 17, 20]), 1);
    }

    #[test]
    fn unselected_trend_never_confirms() {
        let a = aligned(40);
        let reversal = fires_at(40, &[30]);
        let m = run(&a, &[("macd_signal", &reversal)], &AnnotationConfig::default());
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].style_class, StyleClass::PrimaryEntry);
    }

    #[test]
    fn short_trend_series_never_confirms() {
        let a = aligned(40);
        let reversal = fires_at(40, &[30]);
        let trend = fires_at(30, &[20]);
        let m = run(
            &a,
            &[("macd_signal", &reversal), ("short_signal_v2", &trend)],
            &AnnotationConfig::default(),
        );
        assert!(m.iter().all(|m| m.style_class != StyleClass::ConfirmationText));
    }

    #[test]
    fn weekly_confirmation_uses_long_lookback_and_dedups() {
        let a = aligned(70);
        // 63 and 64 share a week (Mon 2024-03-04, Tue 2024-03-05).
        let reversal = fires_at(70, &[63, 64]);
        let trend = fires_at(70, &[14]);
        let m = run(
            &a,
            &[("momentum_color_signal", &reversal), ("short_signal_v1", &trend)],
            &AnnotationConfig::default(),
        );
        let conf: Vec<&Marker> = m
            .iter()
            .filter(|m| m.style_class == StyleClass::ConfirmationText)
            .collect();
        assert_eq!(conf.len(), 1);
        assert_eq!(conf[0].date, a.bars()[63].date);
        assert!((conf[0].price - 163.0 * 0.95).abs() < 1e-9);
    }

    #[test]
    fn ordering_is_primary_then_confirmation_per_signal() {
        let a = aligned(30);
        let reversal = fires_at(30, &[5, 25]);
        let trend = fires_at(30, &[3]);
        let m = run(
            &a,
            &[("macd_signal", &reversal), ("short_signal_v2", &trend)],
            &AnnotationConfig::default(),
        );
        let classes: Vec<(&str, StyleClass)> = m
            .iter()
            .map(|m| (m.signal_id.as_str(), m.style_class))
            .collect();
        assert_eq!(
            classes,
            vec![
                ("macd_signal", StyleClass::PrimaryEntry),
                ("macd_signal", StyleClass::PrimaryEntry),
                ("macd_signal", StyleClass::ConfirmationText),
                ("short_signal_v2", StyleClass::PrimaryEntry),
            ]
        );
    }

    #[test]
    fn sells_only_when_enabled() {
        let a = aligned(5);
        let v = vec![0, -1, 1, 0, -1];
        let off = run(&a, &[("long_signal", &v)], &AnnotationConfig::default());
        assert!(off.iter().all(|m| m.style_class != StyleClass::SellExit));

        let cfg = AnnotationConfig {
            render_sell_markers: true,
            ..AnnotationConfig::default()
        };
        let on = run(&a, &[("long_signal", &v)], &cfg);
        let sells: Vec<&Marker> = on
            .iter()
            .filter(|m| m.style_class == StyleClass::SellExit)
            .collect();
        assert_eq!(sells.len(), 2);
        assert!((sells[0].price - 111.0 * 1.02).abs() < 1e-9);
    }

    #[test]
    fn suppressed_signal_has_no_buy_markers() {
        let a = aligned(5);
        let v = vec![1; 5];
        assert!(run(&a, &[("fcv_signal", &v)], &AnnotationConfig::default()).is_empty());
    }

    #[test]
    fn suppressed_signal_reports_style_only_when_drawn() {
        let a = aligned(5);
        let v = vec![1, -1, 0, 0, 0];
        let sel = SignalSelection::from_pairs([("fcv_signal", &v[..])]);
        let unknown = Diagnostic::UnknownStyle {
            signal_id: "fcv_signal".into(),
        };

        let mut diags = Vec::new();
        let cfg = AnnotationConfig::default();
        derive_markers(&a, &sel, &CadenceTable::default(), &cfg, &mut diags);
        assert!(!diags.contains(&unknown));

        let cfg = AnnotationConfig {
            render_sell_markers: true,
            ..AnnotationConfig::default()
        };
        let m = derive_markers(&a, &sel, &CadenceTable::default(), &cfg, &mut diags);
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].style_class, StyleClass::SellExit);
        assert!(diags.contains(&unknown));
    }

    #[test]
    fn unknown_and_missing_signals_are_diagnosed() {
        let a = aligned(5);
        let mut signals = BTreeMap::new();
        signals.insert("rsi_signal".to_string(), vec![0, 1, 0, 0, 0]);
        let mut diags = Vec::new();
        let sel = SignalSelection::resolve(
            ["rsi_signal", "long_signal", "rsi_signal"],
            &signals,
            &mut diags,
        );
        assert_eq!(sel.len(), 2);
        let m = derive_markers(
            &a,
            &sel,
            &CadenceTable::default(),
            &AnnotationConfig::default(),
            &mut diags,
        );
        assert_eq!(m.len(), 1);
        assert!(diags.contains(&Diagnostic::MissingSignal {
            signal_id: "long_signal".into()
        }));
        assert!(diags.contains(&Diagnostic::UnknownStyle {
            signal_id: "rsi_signal".into()
        }));
    }

    #[test]
    fn trend_window_helper() {
        let trend = fires_at(40, &[10]);
        assert!(trend_fired_within(&trend, 30, 20));
        assert!(!trend_fired_within(&trend, 31, 20));
        assert!(!trend_fired_within(&trend, 10, 20));
        assert!(trend_fired_within(&trend, 11, 20));
        assert!(!trend_fired_within(&trend[..5], 11, 20));
    }
}
