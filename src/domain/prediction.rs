//! Prediction result types.
//!
//! Represents the output of the scaler + classifier pipeline for one record.

use serde::{Deserialize, Serialize};

/// Binary class predicted by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiseaseLabel {
    /// Class 0
    NoDisease,
    /// Class 1
    Disease,
}

impl DiseaseLabel {
    /// Map a raw class code to a label.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::NoDisease),
            1 => Some(Self::Disease),
            _ => None,
        }
    }

    /// Raw class code.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::NoDisease => 0,
            Self::Disease => 1,
        }
    }
}

impl std::fmt::Display for DiseaseLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoDisease => write!(f, "NO DISEASE"),
            Self::Disease => write!(f, "DISEASE"),
        }
    }
}

/// Failure inside the scaler or classifier at prediction time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("{stage} expected {expected} features, got {got}")]
    Arity {
        stage: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("{stage} produced a non-finite value")]
    NonFinite { stage: &'static str },

    #[error("class probabilities {no_disease} / {disease} do not form a distribution")]
    InvalidProbabilities { no_disease: f64, disease: f64 },
}

/// Probability per class, summing to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassProbabilities {
    no_disease: f64,
    disease: f64,
}

impl ClassProbabilities {
    const TOLERANCE: f64 = 1e-6;

    /// Build from the two class probabilities.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidProbabilities` unless both are in `[0, 1]`
    /// and sum to 1.
    pub fn new(no_disease: f64, disease: f64) -> Result<Self, ModelError> {
        let valid = (0.0..=1.0).contains(&no_disease)
            && (0.0..=1.0).contains(&disease)
            && ((no_disease + disease) - 1.0).abs() <= Self::TOLERANCE;
        if valid {
            Ok(Self {
                no_disease,
                disease,
            })
        } else {
            Err(ModelError::InvalidProbabilities {
                no_disease,
                disease,
            })
        }
    }

    /// Build from P(disease) alone.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidProbabilities` if outside `[0, 1]`.
    pub fn from_disease(disease: f64) -> Result<Self, ModelError> {
        Self::new(1.0 - disease, disease)
    }

    #[must_use]
    pub fn no_disease(&self) -> f64 {
        self.no_disease
    }

    #[must_use]
    pub fn disease(&self) -> f64 {
        self.disease
    }

    /// Probability of `label`.
    #[must_use]
    pub fn of(&self, label: DiseaseLabel) -> f64 {
        match label {
            DiseaseLabel::NoDisease => self.no_disease,
            DiseaseLabel::Disease => self.disease,
        }
    }
}

/// How the result panel presents a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Disease predicted: alert styling
    Alert,
    /// No disease predicted: success styling
    Reassuring,
}

/// Outcome of one trigger of the predictor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub label: DiseaseLabel,
    pub probabilities: ClassProbabilities,
    pub evaluated_at: chrono::DateTime<chrono::Utc>,
}

impl Prediction {
    #[must_use]
    pub fn new(label: DiseaseLabel, probabilities: ClassProbabilities) -> Self {
        Self {
            label,
            probabilities,
            evaluated_at: chrono::Utc::now(),
        }
    }

    #[must_use]
    pub fn outcome(&self) -> Outcome {
        match self.label {
            DiseaseLabel::Disease => Outcome::Alert,
            DiseaseLabel::NoDisease => Outcome::Reassuring,
        }
    }

    /// Probability reported alongside the message: that of the predicted class.
    #[must_use]
    pub fn reported_probability(&self) -> f64 {
        self.probabilities.of(self.label)
    }

    /// Reported probability as a percentage with two decimals.
    #[must_use]
    pub fn reported_percentage(&self) -> String {
        format_percentage(self.reported_probability())
    }

    /// User-facing result message.
    #[must_use]
    pub fn message(&self) -> String {
        match self.label {
            DiseaseLabel::Disease => format!(
                "The patient is indicated to have heart disease (Probability: {}%)",
                self.reported_percentage()
            ),
            DiseaseLabel::NoDisease => format!(
                "The patient is not indicated to have heart disease (Probability: {}%)",
                self.reported_percentage()
            ),
        }
    }
}

/// Format a probability in `[0, 1]` as a percentage with two decimals.
#[must_use]
pub fn format_percentage(probability: f64) -> String {
    format!("{:.2}", probability * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probabilities_must_sum_to_one() {
        assert!(ClassProbabilities::new(0.3, 0.7).is_ok());
        assert!(ClassProbabilities::new(0.3, 0.3).is_err());
        assert!(ClassProbabilities::from_disease(1.2).is_err());
    }

    #[test]
    fn test_disease_message_reports_disease_probability() {
        let p = Prediction::new(
            DiseaseLabel::Disease,
            ClassProbabilities::from_disease(0.87654).expect("valid"),
        );
        assert_eq!(p.outcome(), Outcome::Alert);
        assert_eq!(
            p.message(),
            "The patient is indicated to have heart disease (Probability: 87.65%)"
        );
    }

    #[test]
    fn test_no_disease_message_reports_no_disease_probability() {
        let p = Prediction::new(
            DiseaseLabel::NoDisease,
            ClassProbabilities::from_disease(0.25).expect("valid"),
        );
        assert_eq!(p.outcome(), Outcome::Reassuring);
        assert_eq!(p.reported_percentage(), "75.00");
        assert!(p.message().contains("not indicated"));
    }

    #[test]
    fn test_percentages_sum_to_hundred() {
        for disease in [0.0, 0.123_456, 0.5, 0.999_95, 1.0] {
            let probs = ClassProbabilities::from_disease(disease).expect("valid");
            let a: f64 = format_percentage(probs.no_disease()).parse().expect("number");
            let b: f64 = format_percentage(probs.disease()).parse().expect("number");
            assert!((a + b - 100.0).abs() <= 0.011, "{a} + {b}");
        }
    }

    #[test]
    fn test_label_codes() {
        assert_eq!(DiseaseLabel::from_code(1), Some(DiseaseLabel::Disease));
        assert_eq!(DiseaseLabel::from_code(2), None);
        assert_eq!(DiseaseLabel::NoDisease.code(), 0);
    }
}
