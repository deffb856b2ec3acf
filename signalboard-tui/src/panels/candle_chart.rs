//! Candle chart panel: annotated OHLC rendering.
//!
//! Renders with direct buffer writes:
//! - Each candle = 1 terminal column, newest bars kept when narrow
//! - Body: block char, green if close >= open, pink otherwise; wicks with `|`
//! - Highlight intervals: background tint behind the candle columns
//! - Markers: style-table glyph at the marker price, "BUY!!" for confirmations
//! - Trend lines: dashed polylines interpolated between their points
//! - Bottom rows: first/last date, then one legend entry per row

use chrono::NaiveDate;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use signalboard_core::annotate::{merge_contiguous, style_for, ChartAnnotations, LegendTone};
use signalboard_core::domain::{Bar, Marker, StyleClass};

use crate::theme::{hex_color, Theme};

const LABEL_WIDTH: u16 = 9;
const CONFIRM_TEXT: &str = "BUY!!";

/// Candle chart panel widget
pub struct CandleChartPanel<'a> {
    chart: &'a ChartAnnotations,
    title: &'a str,
    theme: &'a Theme,
}

/// Vertical mapping from price to plot row.
#[derive(Debug, Clone, Copy)]
struct PriceScale {
    lower: f64,
    upper: f64,
    height: u16,
}

impl PriceScale {
    /// Row offset from the plot top (0 = top).
    fn row(&self, price: f64) -> u16 {
        let last = self.height.saturating_sub(1) as f64;
        if (self.upper - self.lower).abs() < 1e-9 || self.height == 0 || !price.is_finite() {
            return 0;
        }
        let frac = (price - self.lower) / (self.upper - self.lower);
        (last * (1.0 - frac)).round().clamp(0.0, last) as u16
    }
}

impl<'a> CandleChartPanel<'a> {
    pub fn new(chart: &'a ChartAnnotations, title: &'a str, theme: &'a Theme) -> Self {
        Self {
            chart,
            title,
            theme,
        }
    }

    /// First bar index shown when `width` columns are available.
    pub fn first_visible(bar_count: usize, width: u16) -> usize {
        bar_count.saturating_sub(width as usize)
    }

    fn scale(&self, visible: &[Bar], first: NaiveDate, last: NaiveDate, height: u16) -> PriceScale {
        let marker_prices = self
            .chart
            .markers
            .iter()
            .filter(|m| m.date >= first && m.date <= last)
            .map(|m| m.price);
        let bar_prices = visible.iter().flat_map(|b| [b.low, b.high]);
        let (lo, hi) = bar_prices
            .chain(marker_prices)
            .filter(|p| p.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p), hi.max(p))
            });
        let (lo, hi) = if lo.is_finite() { (lo, hi) } else { (0.0, 1.0) };
        let range = hi - lo;
        let pad = if range > 0.0 { range * 0.05 } else { 1.0 };
        PriceScale {
            lower: lo - pad,
            upper: hi + pad,
            height,
        }
    }
}

/// Column offset of `date` among `dates`, if it falls on a visible bar.
fn column_of(dates: &[NaiveDate], date: NaiveDate) -> Option<usize> {
    dates.binary_search(&date).ok()
}

/// Write `text` at (x, y) clipped to `clip`.
fn put(buf: &mut Buffer, clip: Rect, x: u16, y: u16, text: &str, style: Style) {
    if x < clip.left() || x >= clip.right() || y < clip.top() || y >= clip.bottom() {
        return;
    }
    let room = (clip.right() - x) as usize;
    buf.set_stringn(x, y, text, room, style);
}

impl<'a> Widget for CandleChartPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bars = &self.chart.bars;
        let block = Block::default()
            .title(format!(" {} | {} bars | {} markers ", self.title, bars.len(), self.chart.markers.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent))
            .style(Style::default().bg(self.theme.background));
        let inner = block.inner(area);
        block.render(area, buf);

        // Left margin for price labels, bottom rows for dates and legend.
        let legend_rows = self.chart.legend.len() as u16;
        let plot = Rect {
            x: inner.x + LABEL_WIDTH.min(inner.width),
            y: inner.y,
            width: inner.width.saturating_sub(LABEL_WIDTH),
            height: inner.height.saturating_sub(1 + legend_rows),
        };
        if plot.width == 0 || plot.height == 0 || bars.is_empty() {
            return;
        }

        let start = Self::first_visible(bars.len(), plot.width);
        let visible = &bars[start..];
        let dates: Vec<NaiveDate> = visible.iter().map(|b| b.date).collect();
        let (first, last) = (dates[0], dates[dates.len() - 1]);
        let scale = self.scale(visible, first, last, plot.height);

        // ── Highlight tint ──
        // Last-bar intervals are single points; keep them out of the merge so
        // they still cover their own column.
        let (points, spans): (Vec<_>, Vec<_>) = self
            .chart
            .highlights
            .iter()
            .copied()
            .partition(|iv| iv.start == iv.end);
        for iv in merge_contiguous(&spans).iter().chain(&points) {
            if iv.end < first || iv.start > last {
                continue;
            }
            let tint = self.theme.tint(iv.polarity);
            for (col, d) in dates.iter().enumerate() {
                let covered = iv.start <= *d && (*d < iv.end || iv.start == iv.end);
                if !covered {
                    continue;
                }
                let x = plot.x + col as u16;
                for y in plot.top()..plot.bottom() {
                    if let Some(cell) = buf.cell_mut((x, y)) {
                        cell.set_bg(tint);
                    }
                }
            }
        }

        // ── Price labels ──
        let labels = [
            (0, scale.upper),
            (plot.height / 2, (scale.upper + scale.lower) / 2.0),
            (plot.height.saturating_sub(1), scale.lower),
        ];
        for (row, value) in labels {
            put(
                buf,
                inner,
                inner.x,
                plot.y + row,
                &format!("{:>8.2}", value),
                Style::default().fg(self.theme.muted),
            );
        }

        // ── Candles ──
        for (col, bar) in visible.iter().enumerate() {
            let x = plot.x + col as u16;
            let style = Style::default().fg(self.theme.candle_color(bar.is_up()));
            let high = scale.row(bar.high);
            let low = scale.row(bar.low);
            let body_top = scale.row(bar.open.max(bar.close));
            let body_bot = scale.row(bar.open.min(bar.close));

            for y in high..body_top {
                put(buf, plot, x, plot.y + y, "|", style);
            }
            let body = if bar.is_up() { "\u{2588}" } else { "\u{2593}" };
            for y in body_top..=body_bot {
                put(buf, plot, x, plot.y + y, body, style);
            }
            for y in body_bot.saturating_add(1)..=low {
                put(buf, plot, x, plot.y + y, "|", style);
            }
        }

        // ── Trend lines ──
        for line in self.chart.trendlines.iter().filter(|l| l.is_drawable()) {
            let style = Style::default()
                .fg(hex_color(&line.color))
                .add_modifier(Modifier::DIM);
            for seg in line.points.windows(2) {
                let (a, b) = (&seg[0], &seg[1]);
                let (Some(ca), Some(cb)) = (column_of(&dates, a.date), column_of(&dates, b.date))
                else {
                    continue;
                };
                let (c0, c1, p0, p1) = if ca <= cb {
                    (ca, cb, a.price, b.price)
                } else {
                    (cb, ca, b.price, a.price)
                };
                for col in c0..=c1 {
                    if (col - c0) % 2 == 1 {
                        continue;
                    }
                    let t = if c1 == c0 {
                        0.0
                    } else {
                        (col - c0) as f64 / (c1 - c0) as f64
                    };
                    let price = p0 + (p1 - p0) * t;
                    put(buf, plot, plot.x + col as u16, plot.y + scale.row(price), "·", style);
                }
            }
        }

        // ── Markers ──
        for marker in self.chart.markers.iter().filter(|m| m.price.is_finite()) {
            let Some(col) = column_of(&dates, marker.date) else {
                continue;
            };
            draw_marker(buf, plot, plot.x + col as u16, plot.y + scale.row(marker.price), marker, self.theme);
        }

        // ── Date axis ──
        let axis_y = plot.bottom();
        let muted = Style::default().fg(self.theme.muted);
        put(buf, inner, plot.x, axis_y, &first.to_string(), muted);
        let last_label = last.to_string();
        let last_x = plot.right().saturating_sub(last_label.len() as u16);
        if last_x > plot.x + 10 {
            put(buf, inner, last_x, axis_y, &last_label, muted);
        }

        // ── Legend ──
        for (row, entry) in self.chart.legend.iter().enumerate() {
            let color = match entry.tone {
                LegendTone::Neutral => self.theme.text_primary,
                LegendTone::Bullish => self.theme.positive,
                LegendTone::Bearish => self.theme.negative,
            };
            let y = axis_y.saturating_add(1 + row as u16);
            put(buf, inner, plot.x, y, entry.text, Style::default().fg(color));
        }
    }
}

fn draw_marker(buf: &mut Buffer, plot: Rect, x: u16, y: u16, marker: &Marker, theme: &Theme) {
    let style = style_for(&marker.signal_id);
    match marker.style_class {
        StyleClass::PrimaryEntry => {
            let s = Style::default()
                .fg(hex_color(style.buy.color))
                .add_modifier(Modifier::BOLD);
            put(buf, plot, x, y, &style.buy.shape.glyph().to_string(), s);
        }
        StyleClass::ConfirmationText => {
            let s = Style::default()
                .fg(theme.warning)
                .add_modifier(Modifier::BOLD);
            // Centered on the bar, shifted left when it would run off the edge.
            let half = (CONFIRM_TEXT.len() / 2) as u16;
            let width = CONFIRM_TEXT.len() as u16;
            let mut tx = x.saturating_sub(half).max(plot.x);
            if tx + width > plot.right() {
                tx = plot.right().saturating_sub(width).max(plot.x);
            }
            put(buf, plot, tx, y, CONFIRM_TEXT, s);
        }
        StyleClass::SellExit => {
            let s = Style::default().fg(hex_color(style.sell.color));
            put(buf, plot, x, y, &style.sell.shape.glyph().to_string(), s);
        }
    }
}

/// Placeholder shown instead of the chart when there is nothing to draw.
pub struct EmptyChart<'a> {
    message: &'a str,
    theme: &'a Theme,
}

impl<'a> EmptyChart<'a> {
    pub fn new(message: &'a str, theme: &'a Theme) -> Self {
        Self { message, theme }
    }
}

impl<'a> Widget for EmptyChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Chart [No Data] ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.muted))
            .style(Style::default().bg(self.theme.background));
        let inner = block.inner(area);
        block.render(area, buf);

        let pad = inner.height / 2;
        let mut lines: Vec<Line> = (0..pad).map(|_| Line::from("")).collect();
        lines.push(Line::styled(
            self.message.to_string(),
            Style::default().fg(self.theme.warning),
        ));
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}
