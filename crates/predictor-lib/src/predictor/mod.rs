//! Inference over pre-trained classifiers and the feature scaler

mod logistic;
mod scaler;
mod service;
mod tree;

pub use logistic::{LogisticRegression, LogisticRegressionParams};
pub use scaler::{ScalerParams, StandardScaler};
pub use service::{LoadedModels, PredictionService, DEFAULT_SLOW_INFERENCE_MS};
pub use tree::{DecisionTree, DecisionTreeParams};

use crate::error::{InvalidParams, PredictionError, Result};
use ndarray::{Array1, Array2, ArrayView2};

/// A fitted classifier producing one label per input row
pub trait Classifier: Send + Sync {
    /// Model name used in error messages
    fn name(&self) -> &'static str;

    /// Number of columns the model was fitted on
    fn n_features_in(&self) -> usize;

    /// Predict a class label for every row of `x`
    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>>;
}

/// A fitted column-wise transform applied before inference
pub trait Transformer: Send + Sync {
    fn transform(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>>;
}

/// Reject inputs whose column count differs from the fitted one
fn check_n_features(name: &str, expected: usize, x: &ArrayView2<'_, f64>) -> Result<()> {
    let actual = x.ncols();
    if actual != expected {
        return Err(PredictionError::inference(format!(
            "X has {} features, but {} is expecting {} features as input.",
            actual, name, expected
        )));
    }
    Ok(())
}

fn check_finite(what: &str, values: &[f64]) -> std::result::Result<(), InvalidParams> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(InvalidParams(format!("{} contains non-finite values", what)))
    }
}

/// Index of the first maximum, `None` for an empty slice
fn argmax(values: impl IntoIterator<Item = f64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, value) in values.into_iter().enumerate() {
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((idx, value)),
        }
    }
    best.map(|(idx, _)| idx)
}
