//! TUI module: Terminal User Interface using Ratatui.
//!
//! A single screen with the 13-attribute form in two columns, a result panel
//! and a disclaimer. If the model artifacts failed to load, the form is
//! replaced by the load error.

mod app;
mod styles;
mod ui;

pub use app::{App, ArtifactPredictor, Session};
pub use styles::ClinicalTheme;
pub use ui::form::{ClinicalFormState, FieldInput, FormField, FORM_LAYOUT, LEFT_COLUMN_LEN};
pub use ui::result::ResultState;
