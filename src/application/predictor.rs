//! Prediction service: scales one record and runs the classifier on it.
//!
//! The fitted artifacts live in a [`ModelContext`] built once at startup and
//! shared read-only. Every call to [`Predictor::predict`] recomputes from
//! scratch; nothing is cached or stored.

use std::sync::Arc;

use crate::adapters::artifacts::{ArtifactSet, ExportedClassifier, ExportedScaler};
use crate::domain::{ClinicalRecord, ModelError, Prediction, FEATURE_COUNT};
use crate::ports::{Classifier, Scaler};

/// The fitted scaler and classifier, immutable for the process lifetime.
pub struct ModelContext<S, C>
where
    S: Scaler,
    C: Classifier,
{
    scaler: S,
    classifier: C,
}

impl<S, C> ModelContext<S, C>
where
    S: Scaler,
    C: Classifier,
{
    pub fn new(scaler: S, classifier: C) -> Self {
        Self { scaler, classifier }
    }

    pub fn scaler(&self) -> &S {
        &self.scaler
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }
}

impl From<ArtifactSet> for ModelContext<ExportedScaler, ExportedClassifier> {
    fn from(set: ArtifactSet) -> Self {
        Self::new(set.scaler, set.classifier)
    }
}

/// Runs the scale -> predict pipeline against a shared [`ModelContext`].
pub struct Predictor<S, C>
where
    S: Scaler,
    C: Classifier,
{
    context: Arc<ModelContext<S, C>>,
}

impl<S, C> Clone for Predictor<S, C>
where
    S: Scaler,
    C: Classifier,
{
    fn clone(&self) -> Self {
        Self {
            context: Arc::clone(&self.context),
        }
    }
}

impl<S, C> Predictor<S, C>
where
    S: Scaler,
    C: Classifier,
{
    pub fn new(context: Arc<ModelContext<S, C>>) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &ModelContext<S, C> {
        &self.context
    }

    /// Run the pipeline on one record.
    ///
    /// 1. Lay the record out in model column order
    /// 2. Apply the scaler
    /// 3. Predict the label and the class probabilities
    ///
    /// # Errors
    /// Returns `ModelError` if the artifacts reject the row.
    pub fn predict(&self, record: &ClinicalRecord) -> Result<Prediction, ModelError> {
        let features = record.to_features();

        tracing::debug!("Step 1: scaling {} features", features.len());
        let scaled = self.context.scaler.transform(&features)?;
        if scaled.len() != FEATURE_COUNT {
            return Err(ModelError::Arity {
                stage: "scaler output",
                expected: FEATURE_COUNT,
                got: scaled.len(),
            });
        }

        tracing::debug!("Step 2: running {}", self.context.classifier.kind());
        let label = self.context.classifier.predict(&scaled)?;
        let probabilities = self.context.classifier.predict_proba(&scaled)?;

        let prediction = Prediction::new(label, probabilities);
        tracing::info!(
            "Prediction complete: label={}, probability={}%",
            prediction.label,
            prediction.reported_percentage()
        );
        Ok(prediction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::artifacts::ArtifactLoader;
    use crate::domain::{
        default_record, ClassProbabilities, DiseaseLabel, Feature, FEATURE_ORDER,
    };
    use std::sync::Mutex;

    /// Scaler that records what it was given and passes it through.
    #[derive(Default)]
    struct RecordingScaler {
        seen: Mutex<Vec<Vec<f64>>>,
    }

    impl Scaler for RecordingScaler {
        fn kind(&self) -> &'static str {
            "Recording"
        }

        fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ModelError> {
            self.seen
                .lock()
                .expect("lock")
                .push(features.to_vec());
            Ok(features.to_vec())
        }
    }

    /// Scaler that drops a column, as a mismatched artifact would.
    struct TruncatingScaler;

    impl Scaler for TruncatingScaler {
        fn kind(&self) -> &'static str {
            "Truncating"
        }

        fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ModelError> {
            Ok(features[1..].to_vec())
        }
    }

    /// Disease iff age (column 0) is above 60.
    struct AgeClassifier;

    impl Classifier for AgeClassifier {
        fn kind(&self) -> &'static str {
            "Age"
        }

        fn predict(&self, scaled: &[f64]) -> Result<DiseaseLabel, ModelError> {
            Ok(if scaled[0] > 60.0 {
                DiseaseLabel::Disease
            } else {
                DiseaseLabel::NoDisease
            })
        }

        fn predict_proba(&self, scaled: &[f64]) -> Result<ClassProbabilities, ModelError> {
            ClassProbabilities::from_disease(if scaled[0] > 60.0 { 0.9 } else { 0.2 })
        }
    }

    #[test]
    fn test_record_reaches_scaler_in_column_order() {
        let context = Arc::new(ModelContext::new(RecordingScaler::default(), AgeClassifier));
        let predictor = Predictor::new(context);
        let record = default_record();

        predictor.predict(&record).expect("predict");

        let seen = predictor.context().scaler().seen.lock().expect("lock");
        let expected: Vec<f64> = FEATURE_ORDER.iter().map(|f| record.get(*f)).collect();
        assert_eq!(seen.as_slice(), &[expected]);
    }

    #[test]
    fn test_prediction_uses_classifier_label() {
        let predictor = Predictor::new(Arc::new(ModelContext::new(
            RecordingScaler::default(),
            AgeClassifier,
        )));

        let young = predictor.predict(&default_record()).expect("predict");
        assert_eq!(young.label, DiseaseLabel::NoDisease);
        assert_eq!(young.reported_percentage(), "80.00");

        let old = ClinicalRecord::builder();
        let old = FEATURE_ORDER
            .iter()
            .fold(old, |b, f| b.set(*f, default_record().get(*f)))
            .set(Feature::Age, 70.0)
            .build()
            .expect("record");
        let old = predictor.predict(&old).expect("predict");
        assert_eq!(old.label, DiseaseLabel::Disease);
        assert_eq!(old.reported_percentage(), "90.00");
    }

    #[test]
    fn test_retrigger_recomputes() {
        let predictor = Predictor::new(Arc::new(ModelContext::new(
            RecordingScaler::default(),
            AgeClassifier,
        )));
        let record = default_record();
        let first = predictor.predict(&record).expect("predict");
        let second = predictor.predict(&record).expect("predict");

        assert_eq!(first.label, second.label);
        assert_eq!(first.probabilities, second.probabilities);
        assert_eq!(predictor.context().scaler().seen.lock().expect("lock").len(), 2);
    }

    #[test]
    fn test_scaler_arity_mismatch_surfaces() {
        let predictor = Predictor::new(Arc::new(ModelContext::new(TruncatingScaler, AgeClassifier)));
        let err = predictor.predict(&default_record()).expect_err("mismatch");
        assert!(matches!(err, ModelError::Arity { got: 12, .. }));
    }

    #[test]
    fn test_shipped_artifacts_end_to_end() {
        let set = ArtifactLoader::new("ModelUAS")
            .load()
            .expect("shipped artifacts should load");
        let predictor = Predictor::new(Arc::new(ModelContext::from(set)));

        let record = ClinicalRecord::builder()
            .set(Feature::Age, 50.0)
            .set(Feature::Sex, 1.0)
            .set(Feature::Cp, 0.0)
            .set(Feature::Trestbps, 120.0)
            .set(Feature::Chol, 200.0)
            .set(Feature::Fbs, 0.0)
            .set(Feature::Restecg, 0.0)
            .set(Feature::Thalach, 150.0)
            .set(Feature::Exang, 0.0)
            .set(Feature::Oldpeak, 1.0)
            .set(Feature::Slope, 0.0)
            .set(Feature::Ca, 0.0)
            .set(Feature::Thal, 1.0)
            .build()
            .expect("record");

        let prediction = predictor.predict(&record).expect("predict");
        let pct: f64 = prediction.reported_percentage().parse().expect("number");
        assert!((0.0..=100.0).contains(&pct));

        let total = prediction.probabilities.no_disease() + prediction.probabilities.disease();
        assert!((total - 1.0).abs() < 1e-9);

        // Exactly one of the two messages.
        let msg = prediction.message();
        let disease = msg.starts_with("The patient is indicated");
        let healthy = msg.starts_with("The patient is not indicated");
        assert!(disease ^ healthy);
    }
}
