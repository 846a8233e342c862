//! Scaler artifacts exported from scikit-learn.

use serde::{Deserialize, Serialize};

use crate::domain::{ModelError, FEATURE_COUNT};
use crate::ports::Scaler;

use super::check_feature_names;

/// Fitted scaler parameters, tagged by `kind`.
///
/// Mirrors the fitted attributes of `StandardScaler` (`mean_`, `scale_`) and
/// `MinMaxScaler` (`min_`, `scale_`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExportedScaler {
    /// `(x - mean) / scale`
    Standard {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        feature_names: Option<Vec<String>>,
        mean: Vec<f64>,
        scale: Vec<f64>,
    },
    /// `x * scale + min`
    MinMax {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        feature_names: Option<Vec<String>>,
        min: Vec<f64>,
        scale: Vec<f64>,
    },
}

impl ExportedScaler {
    /// Shape and value checks run once at load time.
    pub(super) fn validate(&self) -> Result<(), String> {
        let (names, offset, scale, offset_name) = match self {
            Self::Standard {
                feature_names,
                mean,
                scale,
            } => (feature_names, mean, scale, "mean"),
            Self::MinMax {
                feature_names,
                min,
                scale,
            } => (feature_names, min, scale, "min"),
        };

        check_feature_names(names.as_deref())?;
        for (name, values) in [(offset_name, offset), ("scale", scale)] {
            if values.len() != FEATURE_COUNT {
                return Err(format!(
                    "scaler {name} has {} entries, expected {FEATURE_COUNT}",
                    values.len()
                ));
            }
            if values.iter().any(|v| !v.is_finite()) {
                return Err(format!("scaler {name} contains non-finite values"));
            }
        }
        Ok(())
    }
}

impl Scaler for ExportedScaler {
    fn kind(&self) -> &'static str {
        match self {
            Self::Standard { .. } => "StandardScaler",
            Self::MinMax { .. } => "MinMaxScaler",
        }
    }

    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ModelError> {
        let scaled: Vec<f64> = match self {
            Self::Standard { mean, scale, .. } => {
                ensure_arity(features, mean.len())?;
                features
                    .iter()
                    .zip(mean.iter().zip(scale))
                    // Zero variance columns are left unscaled.
                    .map(|(x, (m, s))| if *s == 0.0 { x - m } else { (x - m) / s })
                    .collect()
            }
            Self::MinMax { min, scale, .. } => {
                ensure_arity(features, min.len())?;
                features
                    .iter()
                    .zip(min.iter().zip(scale))
                    .map(|(x, (m, s))| x * s + m)
                    .collect()
            }
        };

        if scaled.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::NonFinite { stage: "scaler" });
        }
        Ok(scaled)
    }
}

fn ensure_arity(features: &[f64], expected: usize) -> Result<(), ModelError> {
    if features.len() == expected {
        Ok(())
    } else {
        Err(ModelError::Arity {
            stage: "scaler",
            expected,
            got: features.len(),
        })
    }
}
