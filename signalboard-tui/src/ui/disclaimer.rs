//! Disclaimer gate shown until the user accepts it once.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use super::centered_rect;
use crate::theme;

const SECTIONS: &[(&str, &[&str])] = &[
    (
        "About this tool",
        &[
            "Built for investment education and information only.",
            "A learning aid that displays technical signals and market data.",
        ],
    ),
    (
        "Risk",
        &[
            "Every investment carries a risk of losing principal.",
            "Past performance does not guarantee future returns.",
            "Nothing shown here is investment advice.",
        ],
    ),
    (
        "Limits of the signals",
        &[
            "Indicators and signals are reference information.",
            "Their accuracy varies with market conditions.",
            "Every investment decision is your own responsibility.",
        ],
    ),
];

pub fn render(f: &mut Frame, area: Rect) {
    let popup = centered_rect(80, 90, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::warning())
        .title(" Investment Notice ")
        .title_style(theme::accent_bold());

    let mut text = vec![Line::from("")];
    for (heading, items) in SECTIONS {
        text.push(Line::from(Span::styled(*heading, theme::accent_bold())));
        for item in *items {
            text.push(Line::from(Span::styled(format!("  - {item}"), theme::text())));
        }
        text.push(Line::from(""));
    }
    text.push(Line::from(Span::styled(
        "I understand the above and accept the investment risk.",
        theme::warning(),
    )));
    text.push(Line::from(""));
    text.push(Line::from(Span::styled(
        "Enter / y: accept    q / Esc: quit",
        theme::neutral(),
    )));

    let para = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    f.render_widget(para, popup);
}
