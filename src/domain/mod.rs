//! Domain layer: Core business types and logic.
//!
//! Pure Rust types with no I/O: the clinical record and its column order,
//! the input domains of the form controls, and prediction results.

mod prediction;
mod record;
pub mod schema;

pub use prediction::{
    format_percentage, ClassProbabilities, DiseaseLabel, ModelError, Outcome, Prediction,
};
pub use record::{ClinicalRecord, Feature, RecordBuilder, FEATURE_COUNT, FEATURE_NAMES, FEATURE_ORDER};
pub use schema::{default_record, field_spec, Choice, FieldError, FieldKind, FieldSpec, FIELD_SPECS};
