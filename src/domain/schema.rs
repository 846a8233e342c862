//! Input domains for the 13 clinical attributes.
//!
//! Each attribute is bounded by its own control; there is no cross-field
//! validation.

use super::record::{ClinicalRecord, Feature, FEATURE_COUNT, FEATURE_ORDER};

/// Why a control's value cannot be used.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    #[error("{label}: a value is required")]
    Empty { label: &'static str },

    #[error("{label}: '{input}' is not a valid number")]
    InvalidNumber { label: &'static str, input: String },

    #[error("{label}: must be a whole number")]
    NotInteger { label: &'static str },

    #[error("{label}: value must be between {min} and {max}")]
    OutOfRange {
        label: &'static str,
        min: f64,
        max: f64,
    },

    #[error("{label}: {value} is not one of the allowed codes")]
    UnknownChoice { label: &'static str, value: f64 },

    #[error("missing value for feature '{feature}'")]
    Missing { feature: &'static str },
}

/// A categorical option: the code sent to the model and its display label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Choice {
    pub code: u8,
    pub label: &'static str,
}

/// Kind of control used for an attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// Typed number bounded to `[min, max]`, stepped by `step`.
    Numeric {
        min: f64,
        max: f64,
        step: f64,
        decimals: usize,
    },
    /// Selection among fixed codes.
    Categorical { choices: &'static [Choice] },
}

/// Control definition for one attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub feature: Feature,
    pub label: &'static str,
    pub hint: &'static str,
    pub kind: FieldKind,
    pub default: f64,
}

const fn integer(min: f64, max: f64) -> FieldKind {
    FieldKind::Numeric {
        min,
        max,
        step: 1.0,
        decimals: 0,
    }
}

const BINARY_NO_YES: &[Choice] = &[
    Choice { code: 0, label: "No" },
    Choice { code: 1, label: "Yes" },
];

/// Control definitions, index-aligned with [`FEATURE_ORDER`].
pub const FIELD_SPECS: [FieldSpec; FEATURE_COUNT] = [
    FieldSpec {
        feature: Feature::Age,
        label: "Age (years)",
        hint: "1-120",
        kind: integer(1.0, 120.0),
        default: 50.0,
    },
    FieldSpec {
        feature: Feature::Sex,
        label: "Sex",
        hint: "0: Female, 1: Male",
        kind: FieldKind::Categorical {
            choices: &[
                Choice { code: 0, label: "Female" },
                Choice { code: 1, label: "Male" },
            ],
        },
        default: 0.0,
    },
    FieldSpec {
        feature: Feature::Cp,
        label: "Chest Pain Type (cp)",
        hint: "0: Typical Angina, 1: Atypical Angina, 2: Non-Anginal Pain, 3: Asymptomatic",
        kind: FieldKind::Categorical {
            choices: &[
                Choice { code: 0, label: "Typical Angina" },
                Choice { code: 1, label: "Atypical Angina" },
                Choice { code: 2, label: "Non-Anginal Pain" },
                Choice { code: 3, label: "Asymptomatic" },
            ],
        },
        default: 0.0,
    },
    FieldSpec {
        feature: Feature::Trestbps,
        label: "Resting Blood Pressure (mm Hg)",
        hint: "50-250",
        kind: integer(50.0, 250.0),
        default: 120.0,
    },
    FieldSpec {
        feature: Feature::Chol,
        label: "Serum Cholesterol (mg/dl)",
        hint: "100-600",
        kind: integer(100.0, 600.0),
        default: 200.0,
    },
    FieldSpec {
        feature: Feature::Fbs,
        label: "Fasting Blood Sugar > 120 mg/dl",
        hint: "0: No, 1: Yes",
        kind: FieldKind::Categorical {
            choices: BINARY_NO_YES,
        },
        default: 0.0,
    },
    FieldSpec {
        feature: Feature::Restecg,
        label: "Resting ECG (restecg)",
        hint: "0: Normal, 1: ST-T wave abnormality, 2: Left ventricular hypertrophy",
        kind: FieldKind::Categorical {
            choices: &[
                Choice { code: 0, label: "Normal" },
                Choice { code: 1, label: "ST-T wave abnormality" },
                Choice { code: 2, label: "Left ventricular hypertrophy" },
            ],
        },
        default: 0.0,
    },
    FieldSpec {
        feature: Feature::Thalach,
        label: "Max Heart Rate (thalach)",
        hint: "50-220",
        kind: integer(50.0, 220.0),
        default: 150.0,
    },
    FieldSpec {
        feature: Feature::Exang,
        label: "Exercise Induced Angina (exang)",
        hint: "0: No, 1: Yes",
        kind: FieldKind::Categorical {
            choices: BINARY_NO_YES,
        },
        default: 0.0,
    },
    FieldSpec {
        feature: Feature::Oldpeak,
        label: "Oldpeak",
        hint: "0.0-10.0, step 0.1",
        kind: FieldKind::Numeric {
            min: 0.0,
            max: 10.0,
            step: 0.1,
            decimals: 1,
        },
        default: 1.0,
    },
    FieldSpec {
        feature: Feature::Slope,
        label: "Slope",
        hint: "0: Upsloping, 1: Flat, 2: Downsloping",
        kind: FieldKind::Categorical {
            choices: &[
                Choice { code: 0, label: "Upsloping" },
                Choice { code: 1, label: "Flat" },
                Choice { code: 2, label: "Downsloping" },
            ],
        },
        default: 0.0,
    },
    FieldSpec {
        feature: Feature::Ca,
        label: "Major Vessels (ca)",
        hint: "0-3",
        kind: FieldKind::Categorical {
            choices: &[
                Choice { code: 0, label: "0" },
                Choice { code: 1, label: "1" },
                Choice { code: 2, label: "2" },
                Choice { code: 3, label: "3" },
            ],
        },
        default: 0.0,
    },
    FieldSpec {
        feature: Feature::Thal,
        label: "Thal",
        hint: "1: Normal, 2: Fixed Defect, 3: Reversible Defect",
        kind: FieldKind::Categorical {
            choices: &[
                Choice { code: 1, label: "Normal" },
                Choice { code: 2, label: "Fixed Defect" },
                Choice { code: 3, label: "Reversible Defect" },
            ],
        },
        default: 1.0,
    },
];

/// Control definition for `feature`.
#[must_use]
pub fn field_spec(feature: Feature) -> &'static FieldSpec {
    &FIELD_SPECS[feature.index()]
}

/// Record holding every attribute at its control default.
#[must_use]
pub fn default_record() -> ClinicalRecord {
    FEATURE_ORDER
        .iter()
        .fold(ClinicalRecord::builder(), |builder, feature| {
            builder.set(*feature, field_spec(*feature).default)
        })
        .build()
        .unwrap_or_else(|_| unreachable!("every feature has a default"))
}

impl FieldSpec {
    /// Check a value against this control's domain.
    ///
    /// # Errors
    /// Returns the matching `FieldError` when the value is outside the domain.
    pub fn check(&self, value: f64) -> Result<f64, FieldError> {
        match self.kind {
            FieldKind::Numeric {
                min, max, decimals, ..
            } => {
                if !value.is_finite() || value < min || value > max {
                    return Err(FieldError::OutOfRange {
                        label: self.label,
                        min,
                        max,
                    });
                }
                if decimals == 0 && value.fract() != 0.0 {
                    return Err(FieldError::NotInteger { label: self.label });
                }
                Ok(value)
            }
            FieldKind::Categorical { choices } => {
                if choices.iter().any(|c| f64::from(c.code) == value) {
                    Ok(value)
                } else {
                    Err(FieldError::UnknownChoice {
                        label: self.label,
                        value,
                    })
                }
            }
        }
    }

    /// Parse typed text and check it against the domain.
    ///
    /// # Errors
    /// Returns `FieldError` when the text is empty, not a number, or out of bounds.
    pub fn parse(&self, input: &str) -> Result<f64, FieldError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(FieldError::Empty { label: self.label });
        }
        let value: f64 = trimmed.parse().map_err(|_| FieldError::InvalidNumber {
            label: self.label,
            input: trimmed.to_string(),
        })?;
        self.check(value)
    }

    /// Display text for a value of this control.
    #[must_use]
    pub fn format(&self, value: f64) -> String {
        match self.kind {
            FieldKind::Numeric { decimals, .. } => format!("{value:.decimals$}"),
            FieldKind::Categorical { choices } => choices
                .iter()
                .find(|c| f64::from(c.code) == value)
                .map(|c| format!("{}: {}", c.code, c.label))
                .unwrap_or_else(|| format!("{value}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specs_aligned_with_feature_order() {
        for (i, spec) in FIELD_SPECS.iter().enumerate() {
            assert_eq!(spec.feature, FEATURE_ORDER[i]);
            assert!(spec.check(spec.default).is_ok(), "{} default", spec.label);
        }
    }

    #[test]
    fn test_age_bounds() {
        let age = field_spec(Feature::Age);
        assert!(age.parse("1").is_ok());
        assert!(age.parse("120").is_ok());
        assert!(matches!(age.parse("0"), Err(FieldError::OutOfRange { .. })));
        assert!(matches!(age.parse("121"), Err(FieldError::OutOfRange { .. })));
        assert!(matches!(age.parse("50.5"), Err(FieldError::NotInteger { .. })));
        assert!(matches!(age.parse(""), Err(FieldError::Empty { .. })));
        assert!(matches!(age.parse("abc"), Err(FieldError::InvalidNumber { .. })));
    }

    #[test]
    fn test_oldpeak_accepts_tenths() {
        let oldpeak = field_spec(Feature::Oldpeak);
        assert_eq!(oldpeak.parse("2.3"), Ok(2.3));
        assert!(oldpeak.parse("10.1").is_err());
        assert_eq!(oldpeak.format(1.0), "1.0");
    }

    #[test]
    fn test_categorical_codes() {
        let thal = field_spec(Feature::Thal);
        assert!(thal.check(0.0).is_err());
        assert!(thal.check(3.0).is_ok());
        assert_eq!(thal.format(2.0), "2: Fixed Defect");
    }

    #[test]
    fn test_default_record() {
        let record = default_record();
        assert!((record.get(Feature::Age) - 50.0).abs() < f64::EPSILON);
        assert!((record.get(Feature::Thal) - 1.0).abs() < f64::EPSILON);
        assert!((record.get(Feature::Oldpeak) - 1.0).abs() < f64::EPSILON);
    }
}
