//! Screen shown when the model artifacts could not be loaded.

use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::ClinicalTheme;

/// Render the artifact error in place of the form. No prediction control is
/// drawn.
pub fn render_unavailable(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("! Model unavailable", ClinicalTheme::danger())),
        Line::from(""),
        Line::from(Span::styled(message.to_string(), ClinicalTheme::text())),
        Line::from(""),
        Line::from(vec![
            Span::styled("[Q] ", ClinicalTheme::key_hint()),
            Span::styled("Quit", ClinicalTheme::key_desc()),
        ]),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(ClinicalTheme::danger()),
    );

    f.render_widget(content, area);
}
