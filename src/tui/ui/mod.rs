//! UI module: View components for the TUI.

pub mod form;
pub mod result;
pub mod unavailable;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::adapters::artifacts::ArtifactProvenance;
use crate::tui::styles::ClinicalTheme;

pub fn render_header(f: &mut Frame, area: Rect, provenance: Option<&ArtifactProvenance>) {
    let mut spans = vec![
        Span::styled(" Heart Disease Prediction App", ClinicalTheme::title()),
        Span::styled(" │ ", ClinicalTheme::text_muted()),
        Span::styled(
            "Predicts the likelihood of heart disease from 13 clinical attributes",
            ClinicalTheme::text_secondary(),
        ),
    ];
    if let Some(p) = provenance {
        let (scaler, classifier) = p.short_fingerprints();
        spans.push(Span::styled(
            format!(
                "  [{} {} · {} {}]",
                p.classifier_kind, classifier, p.scaler_kind, scaler
            ),
            ClinicalTheme::text_muted(),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(ClinicalTheme::border()),
    );

    f.render_widget(header, area);
}

/// Key bindings for the form. Only drawn when predictions are possible.
pub fn render_key_bar(f: &mut Frame, area: Rect) {
    let keys = Line::from(vec![
        Span::styled("[↑↓/Tab] ", ClinicalTheme::key_hint()),
        Span::styled("Field ", ClinicalTheme::key_desc()),
        Span::styled("[←→] ", ClinicalTheme::key_hint()),
        Span::styled("Adjust ", ClinicalTheme::key_desc()),
        Span::styled("[D] ", ClinicalTheme::key_hint()),
        Span::styled("Defaults ", ClinicalTheme::key_desc()),
        Span::styled("[Enter] ", ClinicalTheme::key_hint()),
        Span::styled("Predict ", ClinicalTheme::key_desc()),
        Span::styled("[Q] ", ClinicalTheme::key_hint()),
        Span::styled("Quit", ClinicalTheme::key_desc()),
    ]);

    f.render_widget(Paragraph::new(keys), area);
}

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![Line::from(vec![Span::styled(
        "DISCLAIMER: This tool gives an indicative estimate from a statistical model and is not a medical diagnosis.",
        ClinicalTheme::text_muted(),
    )])];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(ClinicalTheme::border());

    f.render_widget(Paragraph::new(text).block(block).wrap(Wrap { trim: true }), area);
}
