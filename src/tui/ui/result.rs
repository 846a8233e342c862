//! Prediction result panel.

use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::domain::{format_percentage, Prediction};
use crate::tui::styles::ClinicalTheme;

/// What the result panel currently shows.
#[derive(Debug, Clone, Default)]
pub enum ResultState {
    /// Nothing predicted yet, or inputs changed since
    #[default]
    Idle,
    /// Latest prediction
    Ready(Prediction),
    /// The artifacts failed on this input
    Failed { message: String },
}

pub fn render_result(f: &mut Frame, area: Rect, state: &ResultState) {
    let (lines, border_style) = match state {
        ResultState::Idle => (
            vec![Line::from(Span::styled(
                "Fill in the form and press [Enter] to predict.",
                ClinicalTheme::text_muted(),
            ))],
            ClinicalTheme::border(),
        ),
        ResultState::Ready(prediction) => {
            let style = ClinicalTheme::outcome(prediction.outcome());
            (
                vec![
                    Line::from(Span::styled(prediction.message(), style)),
                    Line::from(vec![
                        Span::styled(
                            format!(
                                "No disease {}%  |  Disease {}%",
                                format_percentage(prediction.probabilities.no_disease()),
                                format_percentage(prediction.probabilities.disease()),
                            ),
                            ClinicalTheme::text_secondary(),
                        ),
                        Span::styled(
                            format!(
                                "  evaluated {}",
                                prediction.evaluated_at.format("%H:%M:%S UTC")
                            ),
                            ClinicalTheme::text_muted(),
                        ),
                    ]),
                ],
                style,
            )
        }
        ResultState::Failed { message } => (
            vec![
                Line::from(Span::styled("! Prediction failed", ClinicalTheme::danger())),
                Line::from(Span::styled(message.clone(), ClinicalTheme::text())),
            ],
            ClinicalTheme::danger(),
        ),
    };

    let block = Block::default()
        .title(Span::styled(" Prediction Result ", ClinicalTheme::title()))
        .borders(Borders::ALL)
        .border_style(border_style);

    let panel = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);

    f.render_widget(panel, area);
}
