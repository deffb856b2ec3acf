//! Series alignment: trim parallel columns to their common length.
//!
//! Upstream columns are supposed to be equally long but are not guaranteed
//! to be. The aligner never pads or interpolates; it keeps the first
//! `safe_len` entries of every column and reports what it dropped.

use chrono::NaiveDate;

use super::{AnnotateError, Diagnostic, NoDataReason};
use crate::data::provider::SignalDataset;
use crate::domain::Bar;

/// Borrowed view of the parallel input columns.
#[derive(Debug, Clone, Copy)]
pub struct SeriesInput<'a> {
    pub dates: &'a [NaiveDate],
    pub open: &'a [f64],
    pub high: &'a [f64],
    pub low: &'a [f64],
    pub close: &'a [f64],
    pub volume: &'a [f64],
}

impl<'a> SeriesInput<'a> {
    pub fn from_dataset(ds: &'a SignalDataset) -> Self {
        Self {
            dates: &ds.dates,
            open: &ds.data.open,
            high: &ds.data.high,
            low: &ds.data.low,
            close: &ds.data.close,
            volume: &ds.data.volume,
        }
    }

    fn columns(&self) -> [(&'static str, usize); 6] {
        [
            ("dates", self.dates.len()),
            ("open", self.open.len()),
            ("high", self.high.len()),
            ("low", self.low.len()),
            ("close", self.close.len()),
            ("volume", self.volume.len()),
        ]
    }

    /// Length every column can be safely indexed up to.
    pub fn safe_len(&self) -> usize {
        self.columns().iter().map(|(_, len)| *len).min().unwrap_or(0)
    }
}

/// Bars truncated to the common length. Owned; consumers only read it.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedSeries {
    bars: Vec<Bar>,
}

impl AlignedSeries {
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.bars.iter().map(|b| b.date)
    }

    pub fn into_bars(self) -> Vec<Bar> {
        self.bars
    }
}

/// Align the input columns.
///
/// Returns `NoData` when any column is empty. Each column longer than the
/// safe length adds a `LengthMismatch` diagnostic.
pub fn align_series(
    input: &SeriesInput<'_>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<AlignedSeries, AnnotateError> {
    let safe_len = input.safe_len();
    if safe_len == 0 {
        return Err(AnnotateError::NoData(NoDataReason::ZeroSafeLength));
    }

    for (series, len) in input.columns() {
        if len > safe_len {
            tracing::debug!(series, len, safe_len, "truncating longer series");
            diagnostics.push(Diagnostic::LengthMismatch {
                series: series.to_string(),
                len,
                safe_len,
            });
        }
    }

    let bars = (0..safe_len)
        .map(|i| Bar {
            date: input.dates[i],
            open: input.open[i],
            high: input.high[i],
            low: input.low[i],
            close: input.close[i],
            volume: input.volume[i],
        })
        .collect();

    Ok(AlignedSeries { bars })
}
