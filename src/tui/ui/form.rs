//! Clinical attribute input form.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::domain::{
    field_spec, ClinicalRecord, Feature, FieldError, FieldKind, FieldSpec, FEATURE_COUNT,
};
use crate::tui::styles::ClinicalTheme;

/// Display order of the controls. The first [`LEFT_COLUMN_LEN`] go in the
/// left column. Layout has no effect on the record sent to the model.
pub const FORM_LAYOUT: [Feature; FEATURE_COUNT] = [
    Feature::Age,
    Feature::Sex,
    Feature::Cp,
    Feature::Trestbps,
    Feature::Chol,
    Feature::Fbs,
    Feature::Restecg,
    Feature::Thalach,
    Feature::Exang,
    Feature::Oldpeak,
    Feature::Slope,
    Feature::Ca,
    Feature::Thal,
];

pub const LEFT_COLUMN_LEN: usize = 6;

/// Longest text a numeric control accepts.
const MAX_INPUT_LEN: usize = 8;

/// Current content of a control.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldInput {
    /// Typed text of a numeric control
    Text(String),
    /// Index into the choices of a categorical control
    Choice(usize),
}

/// One control and its current content.
#[derive(Debug, Clone)]
pub struct FormField {
    pub spec: &'static FieldSpec,
    pub input: FieldInput,
}

impl FormField {
    /// Control for `feature`, holding its default.
    #[must_use]
    pub fn new(feature: Feature) -> Self {
        let spec = field_spec(feature);
        let mut field = Self {
            spec,
            input: FieldInput::Choice(0),
        };
        field.reset();
        field
    }

    pub fn reset(&mut self) {
        self.input = match self.spec.kind {
            FieldKind::Numeric { .. } => FieldInput::Text(self.spec.format(self.spec.default)),
            FieldKind::Categorical { choices } => FieldInput::Choice(
                choices
                    .iter()
                    .position(|c| f64::from(c.code) == self.spec.default)
                    .unwrap_or(0),
            ),
        };
    }

    /// Value this control contributes to a record.
    ///
    /// # Errors
    /// Returns `FieldError` if the typed text is empty, unparsable or out of bounds.
    pub fn value(&self) -> Result<f64, FieldError> {
        match (&self.input, self.spec.kind) {
            (FieldInput::Text(text), _) => self.spec.parse(text),
            (FieldInput::Choice(index), FieldKind::Categorical { choices }) => choices
                .get(*index)
                .map(|c| f64::from(c.code))
                .ok_or(FieldError::Missing {
                    feature: self.spec.feature.name(),
                }),
            (FieldInput::Choice(_), FieldKind::Numeric { .. }) => Err(FieldError::Missing {
                feature: self.spec.feature.name(),
            }),
        }
    }

    /// Replace the content: typed text for numeric controls, a code for
    /// categorical ones (unknown codes are ignored).
    pub fn set_text(&mut self, text: &str) {
        match self.spec.kind {
            FieldKind::Numeric { .. } => self.input = FieldInput::Text(text.to_string()),
            FieldKind::Categorical { choices } => {
                if let Ok(code) = text.trim().parse::<u8>() {
                    if let Some(index) = choices.iter().position(|c| c.code == code) {
                        self.input = FieldInput::Choice(index);
                    }
                }
            }
        }
    }

    fn push_char(&mut self, c: char) {
        let FieldKind::Numeric { decimals, .. } = self.spec.kind else {
            // On a select, typing a code picks that option.
            self.set_text(&c.to_string());
            return;
        };
        if let FieldInput::Text(text) = &mut self.input {
            let accepted = c.is_ascii_digit() || (c == '.' && decimals > 0 && !text.contains('.'));
            if accepted && text.len() < MAX_INPUT_LEN {
                text.push(c);
            }
        }
    }

    fn pop_char(&mut self) {
        if let FieldInput::Text(text) = &mut self.input {
            text.pop();
        }
    }

    fn clear(&mut self) {
        if let FieldInput::Text(text) = &mut self.input {
            text.clear();
        }
    }

    /// Step a numeric control by its step (clamped to bounds), or cycle a select.
    fn step(&mut self, forward: bool) {
        match (&mut self.input, self.spec.kind) {
            (
                FieldInput::Text(text),
                FieldKind::Numeric {
                    min,
                    max,
                    step,
                    decimals,
                },
            ) => {
                let current = text
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .unwrap_or(self.spec.default);
                let delta = if forward { step } else { -step };
                let factor = 10f64.powi(decimals as i32);
                let next = (((current + delta) * factor).round() / factor).clamp(min, max);
                *text = self.spec.format(next);
            }
            (FieldInput::Choice(index), FieldKind::Categorical { choices }) => {
                let n = choices.len();
                *index = if forward {
                    (*index + 1) % n
                } else {
                    (*index + n - 1) % n
                };
            }
            _ => {}
        }
    }

    /// Text shown inside the control.
    #[must_use]
    pub fn display(&self) -> String {
        match &self.input {
            FieldInput::Text(text) => text.clone(),
            FieldInput::Choice(_) => self
                .value()
                .map(|v| format!("< {} >", self.spec.format(v)))
                .unwrap_or_default(),
        }
    }
}

/// Form state: all 13 controls in display order.
#[derive(Debug, Clone)]
pub struct ClinicalFormState {
    fields: Vec<FormField>,
    left_len: usize,
    pub selected_field: usize,
    pub error_message: Option<String>,
}

impl Default for ClinicalFormState {
    fn default() -> Self {
        Self::with_layout(&FORM_LAYOUT, LEFT_COLUMN_LEN)
    }
}

impl ClinicalFormState {
    /// Form with controls in a custom display order.
    #[must_use]
    pub fn with_layout(layout: &[Feature], left_len: usize) -> Self {
        Self {
            fields: layout.iter().map(|f| FormField::new(*f)).collect(),
            left_len: left_len.min(layout.len()),
            selected_field: 0,
            error_message: None,
        }
    }

    #[must_use]
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn field_mut(&mut self, feature: Feature) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|f| f.spec.feature == feature)
    }

    #[must_use]
    pub fn selected(&self) -> Option<&FormField> {
        self.fields.get(self.selected_field)
    }

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.selected_field = (self.selected_field + 1) % self.fields.len();
        }
    }

    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len().saturating_sub(1);
        } else {
            self.selected_field -= 1;
        }
    }

    pub fn input_char(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.selected_field) {
            field.push_char(c);
            self.error_message = None;
        }
    }

    pub fn delete_char(&mut self) {
        if let Some(field) = self.fields.get_mut(self.selected_field) {
            field.pop_char();
        }
    }

    pub fn clear_field(&mut self) {
        if let Some(field) = self.fields.get_mut(self.selected_field) {
            field.clear();
        }
    }

    pub fn step_selected(&mut self, forward: bool) {
        if let Some(field) = self.fields.get_mut(self.selected_field) {
            field.step(forward);
            self.error_message = None;
        }
    }

    /// Put every control back to its default.
    pub fn reset_defaults(&mut self) {
        for field in &mut self.fields {
            field.reset();
        }
        self.error_message = None;
    }

    /// Build a fresh record from the current controls.
    ///
    /// # Errors
    /// Returns the first control's `FieldError`, in display order.
    pub fn to_record(&self) -> Result<ClinicalRecord, FieldError> {
        self.fields
            .iter()
            .try_fold(ClinicalRecord::builder(), |builder, field| {
                Ok(builder.set(field.spec.feature, field.value()?))
            })?
            .build()
    }
}

/// Render both columns of controls plus the status line.
pub fn render_clinical_form(f: &mut Frame, area: Rect, state: &ClinicalFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);

    let (left, right) = state.fields.split_at(state.left_len);
    render_field_column(f, columns[0], left, 0, state.selected_field);
    render_field_column(f, columns[1], right, state.left_len, state.selected_field);

    render_form_status(f, chunks[1], state);
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FormField],
    offset: usize,
    selected: usize,
) {
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in fields.iter().enumerate() {
        let is_selected = offset + i == selected;
        let is_valid = field.value().is_ok();

        let border_style = match (is_valid, is_selected) {
            (false, _) => ClinicalTheme::danger(),
            (true, true) => ClinicalTheme::border_focused(),
            (true, false) => ClinicalTheme::border(),
        };
        let title_style = if is_selected {
            ClinicalTheme::focused()
        } else {
            ClinicalTheme::text_secondary()
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.spec.label), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let mut spans = vec![
            Span::raw(" "),
            Span::styled(field.display(), ClinicalTheme::text()),
        ];
        if is_selected && matches!(field.input, FieldInput::Text(_)) {
            spans.push(Span::styled("▌", ClinicalTheme::cursor()));
        }
        if matches!(field.spec.kind, FieldKind::Numeric { .. }) {
            spans.push(Span::styled(
                format!("  ({})", field.spec.hint),
                ClinicalTheme::text_muted(),
            ));
        }

        f.render_widget(Paragraph::new(Line::from(spans)).block(block), chunks[i]);
    }
}

fn render_form_status(f: &mut Frame, area: Rect, state: &ClinicalFormState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", ClinicalTheme::danger()),
            Span::styled(err.clone(), ClinicalTheme::danger()),
        ])
    } else if let Some(field) = state.selected() {
        Line::from(vec![
            Span::styled(format!("{}: ", field.spec.feature), ClinicalTheme::text_secondary()),
            Span::styled(field.spec.hint, ClinicalTheme::text_muted()),
        ])
    } else {
        Line::from("")
    };

    f.render_widget(Paragraph::new(content), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{default_record, FEATURE_ORDER};

    fn select(state: &mut ClinicalFormState, feature: Feature) {
        let index = state
            .fields()
            .iter()
            .position(|f| f.spec.feature == feature)
            .expect("feature on form");
        state.selected_field = index;
    }

    #[test]
    fn test_defaults_build_default_record() {
        let state = ClinicalFormState::default();
        assert_eq!(state.to_record().expect("record"), default_record());
    }

    #[test]
    fn test_layout_split_matches_two_columns() {
        let state = ClinicalFormState::default();
        assert_eq!(state.fields().len(), FEATURE_COUNT);
        assert_eq!(state.fields()[LEFT_COLUMN_LEN].spec.feature, Feature::Restecg);
    }

    #[test]
    fn test_layout_does_not_change_record_order() {
        let mut reversed = FORM_LAYOUT;
        reversed.reverse();
        let mut a = ClinicalFormState::default();
        let mut b = ClinicalFormState::with_layout(&reversed, 7);

        for state in [&mut a, &mut b] {
            state.field_mut(Feature::Age).expect("age").set_text("63");
            state.field_mut(Feature::Cp).expect("cp").set_text("3");
            state.field_mut(Feature::Oldpeak).expect("oldpeak").set_text("2.3");
        }

        let ra = a.to_record().expect("record");
        let rb = b.to_record().expect("record");
        assert_eq!(ra.to_features(), rb.to_features());
        assert!((ra.to_features()[Feature::Age.index()] - 63.0).abs() < f64::EPSILON);
        assert!((ra.to_features()[FEATURE_ORDER[2].index()] - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_age_extremes_accepted() {
        let mut state = ClinicalFormState::default();
        for age in ["1", "120"] {
            state.field_mut(Feature::Age).expect("age").set_text(age);
            assert!(state.to_record().is_ok(), "age {age}");
        }
    }

    #[test]
    fn test_age_out_of_bounds_blocks_record() {
        let mut state = ClinicalFormState::default();
        for age in ["0", "121"] {
            state.field_mut(Feature::Age).expect("age").set_text(age);
            assert!(matches!(
                state.to_record(),
                Err(FieldError::OutOfRange { .. })
            ));
        }
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut state = ClinicalFormState::default();
        select(&mut state, Feature::Age);
        state.clear_field();
        for c in "6x3".chars() {
            state.input_char(c);
        }
        assert_eq!(state.selected().expect("age").display(), "63");
        state.delete_char();
        assert_eq!(state.selected().expect("age").display(), "6");
    }

    #[test]
    fn test_integer_field_rejects_dot() {
        let mut state = ClinicalFormState::default();
        select(&mut state, Feature::Chol);
        state.input_char('.');
        assert_eq!(state.selected().expect("chol").display(), "200");
    }

    #[test]
    fn test_step_clamps_to_bounds() {
        let mut state = ClinicalFormState::default();
        select(&mut state, Feature::Age);
        state.field_mut(Feature::Age).expect("age").set_text("120");
        state.step_selected(true);
        assert_eq!(state.selected().expect("age").display(), "120");

        select(&mut state, Feature::Oldpeak);
        state.step_selected(true);
        assert_eq!(state.selected().expect("oldpeak").display(), "1.1");
        state.field_mut(Feature::Oldpeak).expect("oldpeak").set_text("0.0");
        state.step_selected(false);
        assert_eq!(state.selected().expect("oldpeak").display(), "0.0");
    }

    #[test]
    fn test_select_cycles_and_sends_code() {
        let mut state = ClinicalFormState::default();
        select(&mut state, Feature::Thal);
        state.step_selected(false);
        let field = state.selected().expect("thal");
        assert_eq!(field.value(), Ok(3.0));
        assert_eq!(field.display(), "< 3: Reversible Defect >");

        state.input_char('2');
        assert_eq!(state.selected().expect("thal").value(), Ok(2.0));
        // thal has no code 0
        state.input_char('0');
        assert_eq!(state.selected().expect("thal").value(), Ok(2.0));
    }

    #[test]
    fn test_reset_defaults() {
        let mut state = ClinicalFormState::default();
        state.field_mut(Feature::Age).expect("age").set_text("");
        state.error_message = Some("stale".into());
        state.reset_defaults();
        assert!(state.error_message.is_none());
        assert_eq!(state.to_record().expect("record"), default_record());
    }
}
