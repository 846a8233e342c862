//! Model ports: Capabilities the predictor needs from the fitted artifacts.
//!
//! The artifacts are produced by an external training pipeline. Any
//! replacement only has to satisfy these two traits.

use crate::domain::{ClassProbabilities, DiseaseLabel, ModelError};

/// A fitted feature scaler.
pub trait Scaler: Send + Sync {
    /// Short name of the scaler family, for logs and the header.
    fn kind(&self) -> &'static str;

    /// Scale one row of features given in model column order.
    ///
    /// # Errors
    /// Returns `ModelError::Arity` if the row length does not match the fit,
    /// or `ModelError::NonFinite` if scaling produces NaN/inf.
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ModelError>;
}

/// A fitted binary classifier.
pub trait Classifier: Send + Sync {
    /// Short name of the model family, for logs and the header.
    fn kind(&self) -> &'static str;

    /// Predicted class for one scaled row.
    ///
    /// # Errors
    /// Returns `ModelError` if the row does not fit the model.
    fn predict(&self, scaled: &[f64]) -> Result<DiseaseLabel, ModelError>;

    /// Per-class probabilities for one scaled row.
    ///
    /// # Errors
    /// Returns `ModelError` if the row does not fit the model or the
    /// probabilities are not a distribution.
    fn predict_proba(&self, scaled: &[f64]) -> Result<ClassProbabilities, ModelError>;
}
