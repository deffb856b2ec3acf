//! Step 3: annotated candle chart, or the empty state.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use signalboard_core::ChartOutcome;

use crate::app::AppState;
use crate::panels::{CandleChartPanel, EmptyChart};
use crate::theme::{self, Theme};

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let theme = Theme::default();
    let symbol = app.selected_symbol.as_deref().unwrap_or("-");

    match &app.outcome {
        Some(ChartOutcome::Ready(chart)) => {
            let title = format!("{} [{}]", app.catalog.display_name(symbol), app.period);
            f.render_widget(CandleChartPanel::new(chart, &title, &theme), chunks[0]);
        }
        Some(ChartOutcome::Empty { symbol, .. }) => {
            let message = format!("{symbol} is not supported yet");
            f.render_widget(EmptyChart::new(&message, &theme), chunks[0]);
        }
        None => {
            f.render_widget(EmptyChart::new("No chart loaded", &theme), chunks[0]);
        }
    }

    render_hints(f, chunks[1], app);
}

fn render_hints(f: &mut Frame, area: Rect, app: &AppState) {
    let group = app
        .current_group()
        .map(|g| g.name.as_str())
        .unwrap_or("-");
    let sells = if app.config.annotation.render_sell_markers {
        "on"
    } else {
        "off"
    };
    let line = Line::from(vec![
        Span::styled(format!(" group: {group} "), theme::accent()),
        Span::styled(
            format!(" p: period ({})  r: reload  s: sells ({sells})  Esc: back ", app.period),
            theme::muted(),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}
