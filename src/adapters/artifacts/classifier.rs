//! Classifier artifacts exported from scikit-learn.
//!
//! Two families are supported: logistic regression (`coef_`, `intercept_`)
//! and random forests, whose trees use the array layout of sklearn's
//! `tree_` attribute.

use serde::{Deserialize, Serialize};

use crate::domain::{ClassProbabilities, DiseaseLabel, ModelError, FEATURE_COUNT};
use crate::ports::Classifier;

use super::check_feature_names;

/// Marker sklearn uses for "no child" in `children_left`/`children_right`.
const TREE_LEAF: i64 = -1;

/// One fitted decision tree in sklearn's parallel-array layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node class weights `[class 0, class 1]`.
    pub value: Vec<[f64; 2]>,
}

/// Fitted classifier parameters, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExportedClassifier {
    LogisticRegression {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        feature_names: Option<Vec<String>>,
        coefficients: Vec<f64>,
        intercept: f64,
    },
    RandomForest {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        feature_names: Option<Vec<String>>,
        trees: Vec<ExportedTree>,
    },
}

impl ExportedTree {
    fn validate(&self, index: usize) -> Result<(), String> {
        let n = self.children_left.len();
        if n == 0 {
            return Err(format!("tree {index} has no nodes"));
        }
        if self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
            || self.value.len() != n
        {
            return Err(format!("tree {index} node arrays differ in length"));
        }

        for node in 0..n {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == TREE_LEAF || right == TREE_LEAF {
                if left != right {
                    return Err(format!("tree {index} node {node} has a single child"));
                }
                let [a, b] = self.value[node];
                if !(a.is_finite() && b.is_finite() && a >= 0.0 && b >= 0.0 && a + b > 0.0) {
                    return Err(format!("tree {index} leaf {node} has invalid class weights"));
                }
                continue;
            }

            // Children always follow their parent, which also rules out cycles.
            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(format!(
                        "tree {index} node {node} points to invalid child {child}"
                    ));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature >= FEATURE_COUNT as i64 {
                return Err(format!(
                    "tree {index} node {node} splits on unknown feature {feature}"
                ));
            }
            if !self.threshold[node].is_finite() {
                return Err(format!("tree {index} node {node} has a non-finite threshold"));
            }
        }
        Ok(())
    }

    /// Normalized class distribution of the leaf `row` falls into.
    fn leaf_distribution(&self, row: &[f64]) -> [f64; 2] {
        let mut node = 0usize;
        while self.children_left[node] != TREE_LEAF {
            let feature = self.feature[node] as usize;
            node = if row[feature] <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        let [a, b] = self.value[node];
        let total = a + b;
        [a / total, b / total]
    }
}

impl ExportedClassifier {
    /// Shape and value checks run once at load time.
    pub(super) fn validate(&self) -> Result<(), String> {
        match self {
            Self::LogisticRegression {
                feature_names,
                coefficients,
                intercept,
            } => {
                check_feature_names(feature_names.as_deref())?;
                if coefficients.len() != FEATURE_COUNT {
                    return Err(format!(
                        "logistic regression has {} coefficients, expected {FEATURE_COUNT}",
                        coefficients.len()
                    ));
                }
                if coefficients.iter().any(|c| !c.is_finite()) || !intercept.is_finite() {
                    return Err("logistic regression has non-finite parameters".to_string());
                }
                Ok(())
            }
            Self::RandomForest {
                feature_names,
                trees,
            } => {
                check_feature_names(feature_names.as_deref())?;
                if trees.is_empty() {
                    return Err("random forest has no trees".to_string());
                }
                trees
                    .iter()
                    .enumerate()
                    .try_for_each(|(i, tree)| tree.validate(i))
            }
        }
    }

    fn ensure_arity(&self, scaled: &[f64]) -> Result<(), ModelError> {
        let expected = match self {
            Self::LogisticRegression { coefficients, .. } => coefficients.len(),
            Self::RandomForest { .. } => FEATURE_COUNT,
        };
        if scaled.len() != expected {
            return Err(ModelError::Arity {
                stage: "classifier",
                expected,
                got: scaled.len(),
            });
        }
        if scaled.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::NonFinite {
                stage: "classifier input",
            });
        }
        Ok(())
    }

    fn decision_function(coefficients: &[f64], intercept: f64, scaled: &[f64]) -> f64 {
        coefficients
            .iter()
            .zip(scaled)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + intercept
    }

    fn forest_distribution(trees: &[ExportedTree], scaled: &[f64]) -> [f64; 2] {
        let mut sum = [0.0, 0.0];
        for tree in trees {
            let [a, b] = tree.leaf_distribution(scaled);
            sum[0] += a;
            sum[1] += b;
        }
        let n = trees.len() as f64;
        [sum[0] / n, sum[1] / n]
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl Classifier for ExportedClassifier {
    fn kind(&self) -> &'static str {
        match self {
            Self::LogisticRegression { .. } => "LogisticRegression",
            Self::RandomForest { .. } => "RandomForestClassifier",
        }
    }

    fn predict(&self, scaled: &[f64]) -> Result<DiseaseLabel, ModelError> {
        self.ensure_arity(scaled)?;
        let label = match self {
            Self::LogisticRegression {
                coefficients,
                intercept,
                ..
            } => {
                if Self::decision_function(coefficients, *intercept, scaled) > 0.0 {
                    DiseaseLabel::Disease
                } else {
                    DiseaseLabel::NoDisease
                }
            }
            Self::RandomForest { trees, .. } => {
                let [no, yes] = Self::forest_distribution(trees, scaled);
                // argmax, ties go to the first class
                if yes > no {
                    DiseaseLabel::Disease
                } else {
                    DiseaseLabel::NoDisease
                }
            }
        };
        Ok(label)
    }

    fn predict_proba(&self, scaled: &[f64]) -> Result<ClassProbabilities, ModelError> {
        self.ensure_arity(scaled)?;
        match self {
            Self::LogisticRegression {
                coefficients,
                intercept,
                ..
            } => {
                let p = sigmoid(Self::decision_function(coefficients, *intercept, scaled));
                ClassProbabilities::from_disease(p)
            }
            Self::RandomForest { trees, .. } => {
                let [no, yes] = Self::forest_distribution(trees, scaled);
                ClassProbabilities::new(no, yes)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logistic(intercept: f64) -> ExportedClassifier {
        let mut coefficients = vec![0.0; FEATURE_COUNT];
        coefficients[0] = 2.0;
        ExportedClassifier::LogisticRegression {
            feature_names: None,
            coefficients,
            intercept,
        }
    }

    /// Stump on feature 0 at 0.5: left leaf favours class 0, right leaf class 1.
    fn stump(left: [f64; 2], right: [f64; 2]) -> ExportedTree {
        ExportedTree {
            children_left: vec![1, TREE_LEAF, TREE_LEAF],
            children_right: vec![2, TREE_LEAF, TREE_LEAF],
            feature: vec![0, -2, -2],
            threshold: vec![0.5, -2.0, -2.0],
            value: vec![[10.0, 10.0], left, right],
        }
    }

    fn row(first: f64) -> Vec<f64> {
        let mut r = vec![0.0; FEATURE_COUNT];
        r[0] = first;
        r
    }

    #[test]
    fn test_logistic_probability_and_label_agree() {
        let model = logistic(-1.0);
        let p = model.predict_proba(&row(1.0)).expect("proba");
        assert!((p.disease() - sigmoid(1.0)).abs() < 1e-12);
        assert_eq!(model.predict(&row(1.0)), Ok(DiseaseLabel::Disease));
        assert_eq!(model.predict(&row(0.0)), Ok(DiseaseLabel::NoDisease));
    }

    #[test]
    fn test_logistic_boundary_is_no_disease() {
        // decision == 0 is not > 0
        let model = logistic(-1.0);
        assert_eq!(model.predict(&row(0.5)), Ok(DiseaseLabel::NoDisease));
    }

    #[test]
    fn test_forest_averages_leaves() {
        let forest = ExportedClassifier::RandomForest {
            feature_names: None,
            trees: vec![stump([8.0, 2.0], [1.0, 3.0]), stump([5.0, 5.0], [0.0, 4.0])],
        };
        assert!(forest.validate().is_ok());

        let p = forest.predict_proba(&row(1.0)).expect("proba");
        assert!((p.disease() - (0.75 + 1.0) / 2.0).abs() < 1e-12);
        assert_eq!(forest.predict(&row(1.0)), Ok(DiseaseLabel::Disease));

        let p = forest.predict_proba(&row(0.0)).expect("proba");
        assert!((p.no_disease() - (0.8 + 0.5) / 2.0).abs() < 1e-12);
        assert_eq!(forest.predict(&row(0.0)), Ok(DiseaseLabel::NoDisease));
    }

    #[test]
    fn test_forest_tie_goes_to_no_disease() {
        let forest = ExportedClassifier::RandomForest {
            feature_names: None,
            trees: vec![stump([1.0, 1.0], [1.0, 1.0])],
        };
        assert_eq!(forest.predict(&row(0.0)), Ok(DiseaseLabel::NoDisease));
    }

    #[test]
    fn test_validate_rejects_backward_child() {
        let mut tree = stump([1.0, 0.0], [0.0, 1.0]);
        tree.children_left[0] = 0;
        let forest = ExportedClassifier::RandomForest {
            feature_names: None,
            trees: vec![tree],
        };
        assert!(forest.validate().unwrap_err().contains("invalid child"));
    }

    #[test]
    fn test_validate_rejects_unknown_split_feature() {
        let mut tree = stump([1.0, 0.0], [0.0, 1.0]);
        tree.feature[0] = 13;
        let forest = ExportedClassifier::RandomForest {
            feature_names: None,
            trees: vec![tree],
        };
        assert!(forest.validate().unwrap_err().contains("unknown feature"));
    }

    #[test]
    fn test_predict_rejects_wrong_arity() {
        let err = logistic(0.0).predict(&[1.0]).expect_err("arity");
        assert!(matches!(err, ModelError::Arity { got: 1, .. }));
    }
}
