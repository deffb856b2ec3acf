//! Step 1: pick a symbol from the catalog.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(" Which symbol or index? ")
        .title_style(theme::panel_title(true));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let visible = inner.height as usize;
    if visible == 0 {
        return;
    }
    // Keep the cursor on screen.
    let offset = app.symbol_cursor.saturating_sub(visible.saturating_sub(1));

    let lines: Vec<Line> = app
        .catalog
        .symbols
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(i, entry)| {
            let cursor = i == app.symbol_cursor;
            let marker = if cursor { "> " } else { "  " };
            let has_data = app.store.contains(&entry.symbol);
            let name_style = if cursor { theme::selected() } else { theme::text() };
            let mut spans = vec![
                Span::styled(marker, theme::accent()),
                Span::styled(format!("{:<10}", entry.symbol), theme::accent()),
                Span::styled(entry.name.as_str(), name_style),
            ];
            if !has_data {
                spans.push(Span::styled("  (no data)", theme::muted()));
            }
            Line::from(spans)
        })
        .collect();

    f.render_widget(Paragraph::new(lines), inner);
}
