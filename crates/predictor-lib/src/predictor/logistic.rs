//! Linear classifier with a logistic link
//!
//! Labels follow the sign of the decision function for binary models and
//! the largest decision value for one-vs-rest multiclass models. The
//! logistic link itself is monotonic, so probabilities are never needed
//! to pick a label.

use super::{argmax, check_finite, check_n_features, Classifier};
use crate::error::{InvalidParams, PredictionError, Result};
use ndarray::{Array1, Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

/// Fitted parameters as stored in `logistic_model.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegressionParams {
    pub n_features_in: usize,
    pub classes: Vec<f64>,
    /// One row per decision function, `n_features_in` columns each
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct LogisticRegression {
    classes: Vec<f64>,
    coef: Array2<f64>,
    intercept: Array1<f64>,
}

impl LogisticRegression {
    pub fn from_params(
        params: LogisticRegressionParams,
    ) -> std::result::Result<Self, InvalidParams> {
        let n = params.n_features_in;
        let n_classes = params.classes.len();
        if n == 0 {
            return Err(InvalidParams("n_features_in must be positive".to_string()));
        }
        if n_classes < 2 {
            return Err(InvalidParams(format!(
                "expected at least 2 classes, got {}",
                n_classes
            )));
        }
        check_finite("classes", &params.classes)?;

        let expected_rows = if n_classes == 2 { 1 } else { n_classes };
        if params.coef.len() != expected_rows {
            return Err(InvalidParams(format!(
                "coef has {} rows, expected {} for {} classes",
                params.coef.len(),
                expected_rows,
                n_classes
            )));
        }
        if params.intercept.len() != expected_rows {
            return Err(InvalidParams(format!(
                "intercept has {} entries, expected {}",
                params.intercept.len(),
                expected_rows
            )));
        }
        check_finite("intercept", &params.intercept)?;

        let mut flat = Vec::with_capacity(expected_rows * n);
        for (idx, row) in params.coef.iter().enumerate() {
            if row.len() != n {
                return Err(InvalidParams(format!(
                    "coef row {} has {} entries, expected {}",
                    idx,
                    row.len(),
                    n
                )));
            }
            check_finite("coef", row)?;
            flat.extend_from_slice(row);
        }
        let coef = Array2::from_shape_vec((expected_rows, n), flat)
            .map_err(|e| InvalidParams(format!("coef: {}", e)))?;

        Ok(Self {
            classes: params.classes,
            coef,
            intercept: Array1::from(params.intercept),
        })
    }

    /// Signed distance of every row to each decision boundary
    pub fn decision_function(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        check_n_features(self.name(), self.n_features_in(), &x)?;
        Ok(x.dot(&self.coef.t()) + &self.intercept)
    }
}

impl Classifier for LogisticRegression {
    fn name(&self) -> &'static str {
        "LogisticRegression"
    }

    fn n_features_in(&self) -> usize {
        self.coef.ncols()
    }

    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        let scores = self.decision_function(x)?;
        let binary = self.coef.nrows() == 1;

        let labels = scores
            .axis_iter(Axis(0))
            .map(|row| {
                let idx = if binary {
                    usize::from(row[0] > 0.0)
                } else {
                    argmax(row.iter().copied()).unwrap_or(0)
                };
                self.classes.get(idx).copied().ok_or_else(|| {
                    PredictionError::inference(format!("class index {} out of range", idx))
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        Ok(Array1::from(labels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn binary() -> LogisticRegression {
        LogisticRegression::from_params(LogisticRegressionParams {
            n_features_in: 2,
            classes: vec![0.0, 1.0],
            coef: vec![vec![1.0, -1.0]],
            intercept: vec![0.5],
        })
        .unwrap()
    }

    #[test]
    fn test_binary_label_follows_decision_sign() {
        let model = binary();
        let x = array![[1.0, 0.0], [0.0, 2.0], [0.0, 0.5]];
        let scores = model.decision_function(x.view()).unwrap();
        assert_eq!(scores, array![[1.5], [-1.5], [0.0]]);
        // A score of exactly zero maps to the first class
        assert_eq!(model.predict(x.view()).unwrap(), array![1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_multiclass_picks_largest_score() {
        let model = LogisticRegression::from_params(LogisticRegressionParams {
            n_features_in: 2,
            classes: vec![0.0, 1.0, 2.0],
            coef: vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![-1.0, -1.0]],
            intercept: vec![0.0, 0.0, 0.0],
        })
        .unwrap();
        let x = array![[3.0, 1.0], [1.0, 3.0], [-2.0, -2.0]];
        assert_eq!(model.predict(x.view()).unwrap(), array![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_rejects_wrong_feature_count() {
        let err = binary().predict(array![[1.0, 2.0, 3.0]].view()).unwrap_err();
        assert!(err.to_string().contains("X has 3 features"));
    }

    #[test]
    fn test_from_params_checks_row_count() {
        let err = LogisticRegression::from_params(LogisticRegressionParams {
            n_features_in: 2,
            classes: vec![0.0, 1.0],
            coef: vec![vec![1.0, 0.0], vec![0.0, 1.0]],
            intercept: vec![0.0, 0.0],
        })
        .unwrap_err();
        assert_eq!(err.0, "coef has 2 rows, expected 1 for 2 classes");
    }

    #[test]
    fn test_from_params_checks_row_width() {
        let result = LogisticRegression::from_params(LogisticRegressionParams {
            n_features_in: 3,
            classes: vec![0.0, 1.0],
            coef: vec![vec![1.0, 0.0]],
            intercept: vec![0.0],
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_from_params_requires_two_classes() {
        let result = LogisticRegression::from_params(LogisticRegressionParams {
            n_features_in: 1,
            classes: vec![1.0],
            coef: vec![vec![1.0]],
            intercept: vec![0.0],
        });
        assert!(result.is_err());
    }
}
