//! Step 2: pick a signal group for the chosen symbol.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme::{self, hex_color};

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let symbol = app.selected_symbol.as_deref().unwrap_or("-");
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(format!(
            " {} ({symbol}): which signals? ",
            app.catalog.display_name(symbol)
        ))
        .title_style(theme::panel_title(true));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines = vec![Line::from("")];
    for (i, group) in app.catalog.groups.iter().enumerate() {
        let cursor = i == app.group_cursor;
        let name_style = if cursor {
            theme::selected()
        } else {
            Style::default().fg(hex_color(&group.color))
        };
        lines.push(Line::from(vec![
            Span::styled(if cursor { "> " } else { "  " }, theme::accent()),
            Span::styled(format!("[{}] ", i + 1), theme::muted()),
            Span::styled(format!(" {} ", group.name), name_style),
            Span::styled(format!("  {}", group.description), theme::text()),
        ]));
        lines.push(Line::from(Span::styled(
            format!("        {}", group.signals.join(", ")),
            theme::muted(),
        )));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        "Enter / 1-9: show chart    Esc: back to symbols",
        theme::neutral(),
    )));

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
