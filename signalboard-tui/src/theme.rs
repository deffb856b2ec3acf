//! Parrot/neon theme tokens for the SignalBoard TUI.
//!
//! # Color Palette
//! - **Background**: Near-black / deep charcoal (base layer)
//! - **Accent**: Electric cyan (focus, step indicator)
//! - **Positive**: Neon green (up candles, bullish tint)
//! - **Negative**: Hot pink (down candles, bearish tint, errors)
//! - **Warning**: Neon orange (missing data, "BUY!!" call-outs)
//! - **Neutral**: Cool purple (secondary info)
//! - **Muted**: Steel blue (hints, axis labels)
//!
//! Marker colors come from the signal style table as `#RRGGBB` strings and
//! are converted with [`hex_color`].

use ratatui::style::{Color, Modifier, Style};
use signalboard_core::domain::Polarity;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
    pub neutral: Color,
    pub muted: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    /// Background tint behind bullish highlight intervals.
    pub bullish_tint: Color,
    /// Background tint behind bearish highlight intervals.
    pub bearish_tint: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::parrot_neon()
    }
}

impl Theme {
    pub fn parrot_neon() -> Self {
        Self {
            background: Color::Rgb(18, 18, 20),
            accent: Color::Rgb(0, 255, 255),
            positive: Color::Rgb(0, 255, 128),
            negative: Color::Rgb(255, 20, 147),
            warning: Color::Rgb(255, 140, 0),
            neutral: Color::Rgb(147, 112, 219),
            muted: Color::Rgb(100, 149, 237),
            text_primary: Color::White,
            text_secondary: Color::Rgb(170, 170, 170),
            bullish_tint: Color::Rgb(10, 48, 28),
            bearish_tint: Color::Rgb(56, 14, 30),
        }
    }

    pub fn tint(&self, polarity: Polarity) -> Color {
        match polarity {
            Polarity::Bullish => self.bullish_tint,
            Polarity::Bearish => self.bearish_tint,
        }
    }

    pub fn candle_color(&self, is_up: bool) -> Color {
        if is_up {
            self.positive
        } else {
            self.negative
        }
    }
}

/// Parse `#RRGGBB` (or `RRGGBB`). Anything else maps to the primary text color.
pub fn hex_color(hex: &str) -> Color {
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return Theme::default().text_primary;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => Theme::default().text_primary,
    }
}

// ── Style shortcuts ──

pub fn accent() -> Style {
    Style::default().fg(Theme::default().accent)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(Theme::default().muted)
}

pub fn neutral() -> Style {
    Style::default().fg(Theme::default().neutral)
}

pub fn warning() -> Style {
    Style::default().fg(Theme::default().warning)
}

pub fn negative() -> Style {
    Style::default().fg(Theme::default().negative)
}

pub fn text() -> Style {
    Style::default().fg(Theme::default().text_primary)
}

pub fn selected() -> Style {
    Style::default()
        .fg(Theme::default().background)
        .bg(Theme::default().accent)
        .add_modifier(Modifier::BOLD)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_creation() {
        let theme = Theme::default();
        assert_eq!(theme.background, Color::Rgb(18, 18, 20));
        assert_eq!(theme.accent, Color::Rgb(0, 255, 255));
    }

    #[test]
    fn test_hex_color() {
        assert_eq!(hex_color("#FFD700"), Color::Rgb(255, 215, 0));
        assert_eq!(hex_color("00ffff"), Color::Rgb(0, 255, 255));
        assert_eq!(hex_color("#fff"), Theme::default().text_primary);
        assert_eq!(hex_color("#GG0000"), Theme::default().text_primary);
    }

    #[test]
    fn test_tint_by_polarity() {
        let theme = Theme::default();
        assert_eq!(theme.tint(Polarity::Bullish), theme.bullish_tint);
        assert_eq!(theme.tint(Polarity::Bearish), theme.bearish_tint);
        assert_ne!(theme.bullish_tint, theme.bearish_tint);
    }

    #[test]
    fn test_candle_color() {
        let theme = Theme::default();
        assert_eq!(theme.candle_color(true), theme.positive);
        assert_eq!(theme.candle_color(false), theme.negative);
    }
}
