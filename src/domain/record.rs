//! Clinical record types for heart disease risk prediction.
//!
//! The 13 attributes follow the UCI Cleveland heart disease dataset, in the
//! column order the scaler and classifier were fitted with.

use serde::{Deserialize, Serialize};

use super::schema::FieldError;

/// Number of clinical attributes in a record.
pub const FEATURE_COUNT: usize = 13;

/// One clinical attribute. The discriminant is the column index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    /// Age in years
    Age = 0,
    /// Sex: 0 = female, 1 = male
    Sex = 1,
    /// Chest pain type
    Cp = 2,
    /// Resting blood pressure in mm Hg
    Trestbps = 3,
    /// Serum cholesterol in mg/dl
    Chol = 4,
    /// Fasting blood sugar > 120 mg/dl
    Fbs = 5,
    /// Resting electrocardiographic result
    Restecg = 6,
    /// Maximum heart rate achieved
    Thalach = 7,
    /// Exercise induced angina
    Exang = 8,
    /// ST depression induced by exercise relative to rest
    Oldpeak = 9,
    /// Slope of the peak exercise ST segment
    Slope = 10,
    /// Number of major vessels colored by fluoroscopy
    Ca = 11,
    /// Thalassemia
    Thal = 12,
}

/// Column order the artifacts were fitted with.
pub const FEATURE_ORDER: [Feature; FEATURE_COUNT] = [
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

/// Column names, index-aligned with [`FEATURE_ORDER`].
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
    "slope", "ca", "thal",
];

impl Feature {
    /// Column index of this feature.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Column name as used by the training data.
    #[must_use]
    pub const fn name(self) -> &'static str {
        FEATURE_NAMES[self.index()]
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One patient's 13 attributes.
///
/// Values are keyed by [`Feature`] and can only be read back in
/// [`FEATURE_ORDER`], so a record cannot reach the model with its columns
/// shuffled. Build one with [`ClinicalRecord::builder`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClinicalRecord {
    values: [f64; FEATURE_COUNT],
}

impl ClinicalRecord {
    /// Start an empty record.
    #[must_use]
    pub fn builder() -> RecordBuilder {
        RecordBuilder::default()
    }

    /// Value of a single attribute.
    #[must_use]
    pub fn get(&self, feature: Feature) -> f64 {
        self.values[feature.index()]
    }

    /// Values in model column order.
    #[must_use]
    pub fn to_features(&self) -> [f64; FEATURE_COUNT] {
        self.values
    }
}

/// Collects attribute values by name; order of `set` calls is irrelevant.
#[derive(Debug, Clone, Default)]
pub struct RecordBuilder {
    values: [Option<f64>; FEATURE_COUNT],
}

impl RecordBuilder {
    /// Set one attribute, replacing any earlier value.
    #[must_use]
    pub fn set(mut self, feature: Feature, value: f64) -> Self {
        self.values[feature.index()] = Some(value);
        self
    }

    /// Finish the record.
    ///
    /// # Errors
    /// Returns `FieldError::Missing` for the first attribute never set.
    pub fn build(self) -> Result<ClinicalRecord, FieldError> {
        let mut values = [0.0; FEATURE_COUNT];
        for feature in FEATURE_ORDER {
            values[feature.index()] = self.values[feature.index()].ok_or(FieldError::Missing {
                feature: feature.name(),
            })?;
        }
        Ok(ClinicalRecord { values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_record() -> ClinicalRecord {
        ClinicalRecord::builder()
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
            .expect("all features set")
    }

    #[test]
    fn test_feature_order_matches_discriminants() {
        for (i, feature) in FEATURE_ORDER.iter().enumerate() {
            assert_eq!(feature.index(), i);
            assert_eq!(feature.name(), FEATURE_NAMES[i]);
        }
    }

    #[test]
    fn test_to_features_uses_column_order() {
        let v = example_record().to_features();
        assert_eq!(
            v,
            [50.0, 1.0, 0.0, 120.0, 200.0, 0.0, 0.0, 150.0, 0.0, 1.0, 0.0, 0.0, 1.0]
        );
    }

    #[test]
    fn test_set_order_does_not_change_columns() {
        let mut builder = ClinicalRecord::builder();
        let expected = example_record();
        for feature in FEATURE_ORDER.iter().rev() {
            builder = builder.set(*feature, expected.get(*feature));
        }
        assert_eq!(builder.build().expect("complete"), expected);
    }

    #[test]
    fn test_missing_feature_rejected() {
        let err = ClinicalRecord::builder()
            .set(Feature::Age, 50.0)
            .build()
            .expect_err("incomplete record");
        assert!(err.to_string().contains("sex"));
    }

    #[test]
    fn test_feature_serde_names() {
        let json = serde_json::to_string(&Feature::Trestbps).expect("serialize");
        assert_eq!(json, "\"trestbps\"");
    }
}
