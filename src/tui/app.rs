//! Main TUI application state machine.
//!
//! Handles:
//! - Artifact loading at startup
//! - Input event handling for the form
//! - Running the predictor on explicit submit

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};

use crate::adapters::artifacts::{
    ArtifactError, ArtifactLoader, ArtifactProvenance, ExportedClassifier, ExportedScaler,
};
use crate::application::{ModelContext, Predictor};
use crate::config::AppConfig;
use crate::domain::Prediction;
use crate::HeartcheckError;

use super::ui::{
    form::{render_clinical_form, ClinicalFormState},
    render_disclaimer, render_header, render_key_bar,
    result::{render_result, ResultState},
    unavailable::render_unavailable,
};

/// Predictor backed by the exported scikit-learn artifacts.
pub type ArtifactPredictor = Predictor<ExportedScaler, ExportedClassifier>;

/// Outcome of startup: either a working predictor or the reason there is none.
pub enum Session {
    Ready {
        predictor: ArtifactPredictor,
        provenance: ArtifactProvenance,
    },
    Unavailable {
        message: String,
    },
}

impl Session {
    /// Load the artifacts from `loader`'s directory.
    #[must_use]
    pub fn load(loader: &ArtifactLoader) -> Self {
        Self::from_load_result(loader.load().map(|set| {
            let provenance = set.provenance.clone();
            (Predictor::new(Arc::new(ModelContext::from(set))), provenance)
        }))
    }

    fn from_load_result(result: Result<(ArtifactPredictor, ArtifactProvenance), ArtifactError>) -> Self {
        match result {
            Ok((predictor, provenance)) => Self::Ready {
                predictor,
                provenance,
            },
            Err(e) => {
                tracing::error!("Model artifacts unavailable: {}", e);
                Self::Unavailable {
                    message: e.to_string(),
                }
            }
        }
    }
}

/// Main application state
pub struct App {
    session: Session,
    form: ClinicalFormState,
    result: ResultState,
    should_quit: bool,
}

impl App {
    /// Create the application, loading artifacts from the configured directory.
    ///
    /// A load failure does not fail construction; the app then only shows the
    /// error (see [`App::startup_error`]).
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        Self::with_session(Session::load(&ArtifactLoader::new(&config.model_dir)))
    }

    /// Create the application around an already established session.
    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self {
            session,
            form: ClinicalFormState::default(),
            result: ResultState::default(),
            should_quit: false,
        }
    }

    /// Whether the predict trigger does anything.
    #[must_use]
    pub fn prediction_enabled(&self) -> bool {
        matches!(self.session, Session::Ready { .. })
    }

    /// Artifact error message if startup failed.
    #[must_use]
    pub fn startup_error(&self) -> Option<&str> {
        match &self.session {
            Session::Unavailable { message } => Some(message),
            Session::Ready { .. } => None,
        }
    }

    #[must_use]
    pub fn form(&self) -> &ClinicalFormState {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ClinicalFormState {
        &mut self.form
    }

    #[must_use]
    pub fn result(&self) -> &ResultState {
        &self.result
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|f| self.draw(f))?;

            if event::poll(Duration::from_millis(250))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }
        }
        Ok(())
    }

    /// Draw the whole screen.
    pub fn draw(&self, f: &mut Frame) {
        let area = f.area();

        match &self.session {
            Session::Unavailable { message } => {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(2),
                        Constraint::Min(0),
                        Constraint::Length(3),
                    ])
                    .split(area);

                render_header(f, chunks[0], None);
                render_unavailable(f, chunks[1], message);
                render_disclaimer(f, chunks[2]);
            }
            Session::Ready { provenance, .. } => {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(2), // Header
                        Constraint::Min(0),    // Form
                        Constraint::Length(4), // Result
                        Constraint::Length(1), // Keys
                        Constraint::Length(3), // Disclaimer
                    ])
                    .split(area);

                render_header(f, chunks[0], Some(provenance));
                render_clinical_form(f, chunks[1], &self.form);
                render_result(f, chunks[2], &self.result);
                render_key_bar(f, chunks[3]);
                render_disclaimer(f, chunks[4]);
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Quit works on every screen, with or without Ctrl.
        if matches!(key, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q'))
            || (key == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL))
        {
            self.should_quit = true;
            return;
        }

        if !self.prediction_enabled() {
            return;
        }

        match key {
            KeyCode::Up | KeyCode::BackTab => self.form.prev_field(),
            KeyCode::Down | KeyCode::Tab => self.form.next_field(),
            KeyCode::Left => self.edit(|form| form.step_selected(false)),
            KeyCode::Right => self.edit(|form| form.step_selected(true)),
            KeyCode::Char('d') | KeyCode::Char('D') => self.edit(ClinicalFormState::reset_defaults),
            KeyCode::Char(c) => self.edit(|form| form.input_char(c)),
            KeyCode::Backspace => self.edit(ClinicalFormState::delete_char),
            KeyCode::Delete => self.edit(ClinicalFormState::clear_field),
            KeyCode::Enter => self.submit(),
            _ => {}
        }
    }

    /// Apply an input change. A shown result no longer matches the inputs,
    /// so it is cleared.
    fn edit(&mut self, change: impl FnOnce(&mut ClinicalFormState)) {
        change(&mut self.form);
        self.result = ResultState::Idle;
    }

    /// Build a record from the form and run the predictor on it.
    pub fn submit(&mut self) {
        let Session::Ready { predictor, .. } = &self.session else {
            return;
        };

        self.result = match evaluate(&self.form, predictor) {
            Ok(prediction) => ResultState::Ready(prediction),
            Err(HeartcheckError::Field(e)) => {
                self.form.error_message = Some(e.to_string());
                ResultState::Idle
            }
            Err(e) => {
                tracing::error!("{}", e);
                ResultState::Failed {
                    message: e.to_string(),
                }
            }
        };
    }
}

/// One trigger: a fresh record from the controls, then the pipeline.
fn evaluate(form: &ClinicalFormState, predictor: &ArtifactPredictor) -> crate::Result<Prediction> {
    let record = form.to_record()?;
    Ok(predictor.predict(&record)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DiseaseLabel, Feature};
    use ratatui::backend::TestBackend;
    use std::path::Path;
    use tempfile::tempdir;

    fn shipped_app() -> App {
        App::with_session(Session::load(&ArtifactLoader::new(Path::new("ModelUAS"))))
    }

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(160, 40)).expect("terminal");
        terminal.draw(|f| app.draw(f)).expect("draw");
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn press(app: &mut App, key: KeyCode) {
        app.handle_key(key, KeyModifiers::NONE);
    }

    #[test]
    fn test_defaults_produce_exactly_one_message() {
        let mut app = shipped_app();
        assert!(app.prediction_enabled());
        press(&mut app, KeyCode::Enter);

        let ResultState::Ready(prediction) = app.result() else {
            panic!("expected a prediction, got {:?}", app.result());
        };
        let text = screen_text(&app);
        let disease = text.contains("The patient is indicated to have heart disease");
        let healthy = text.contains("The patient is not indicated to have heart disease");
        assert!(disease ^ healthy);
        assert_eq!(disease, prediction.label == DiseaseLabel::Disease);
    }

    #[test]
    fn test_missing_artifacts_disable_prediction() {
        let temp = tempdir().expect("tempdir");
        let mut app = App::with_session(Session::load(&ArtifactLoader::new(temp.path())));

        assert!(!app.prediction_enabled());
        let message = app.startup_error().expect("startup error").to_string();
        assert!(message.contains(&temp.path().display().to_string()));

        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.result(), ResultState::Idle));

        let text = screen_text(&app);
        assert!(text.contains("Model unavailable"));
        assert!(!text.contains("[Enter]"));
        assert!(!text.contains("Age (years)"));
    }

    #[test]
    fn test_out_of_range_input_blocks_prediction() {
        let mut app = shipped_app();
        app.form_mut()
            .field_mut(Feature::Age)
            .expect("age")
            .set_text("121");
        press(&mut app, KeyCode::Enter);

        assert!(matches!(app.result(), ResultState::Idle));
        let err = app.form().error_message.as_deref().expect("error shown");
        assert!(err.contains("between 1 and 120"));
    }

    #[test]
    fn test_editing_clears_stale_result() {
        let mut app = shipped_app();
        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.result(), ResultState::Ready(_)));

        press(&mut app, KeyCode::Right);
        assert!(matches!(app.result(), ResultState::Idle));
    }

    #[test]
    fn test_quit_keys() {
        let mut app = shipped_app();
        app.handle_key(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(app.should_quit());

        let mut app = shipped_app();
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit());
    }
}
