//! Top-level UI layout: step header, step body, status bar.

pub mod chart_step;
pub mod disclaimer;
pub mod group_step;
pub mod status_bar;
pub mod symbol_step;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, Step};
use crate::theme;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    // Split: 1-line header + body + 1-line status bar.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_header(f, chunks[0], app);

    match app.step {
        Step::Disclaimer => disclaimer::render(f, chunks[1]),
        Step::Symbol => symbol_step::render(f, chunks[1], app),
        Step::Group => group_step::render(f, chunks[1], app),
        Step::Chart => chart_step::render(f, chunks[1], app),
    }

    status_bar::render(f, chunks[2], app);
}

/// "SignalBoard  1 Select Symbol > 2 Select Signals > 3 Chart"
fn render_header(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans = vec![Span::styled(" SignalBoard ", theme::accent_bold())];
    for step in [Step::Symbol, Step::Group, Step::Chart] {
        let Some(n) = step.number() else { continue };
        if n > 1 {
            spans.push(Span::styled(" > ", theme::muted()));
        }
        let style = if step == app.step {
            theme::selected()
        } else {
            theme::muted()
        };
        spans.push(Span::styled(format!(" {n} {} ", step.label()), style));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Compute a centered rect for popups.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
