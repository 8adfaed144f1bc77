//! Prediction context built once at startup
//!
//! Holds the three fitted artifacts (or nothing, when loading failed) and
//! runs both classifiers for a single feature vector. The logistic
//! regression model consumes the scaled matrix and the decision tree
//! consumes the raw one, matching how each was fitted.

use super::{Classifier, DecisionTree, LogisticRegression, StandardScaler, Transformer};
use crate::error::{PredictionError, Result};
use crate::models::{FeatureVector, PredictionResult, NUM_FEATURES};
use ndarray::{Array1, Array2};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Inference latency above which a warning is logged
pub const DEFAULT_SLOW_INFERENCE_MS: u64 = 5;

/// All three artifacts, present together or not at all
#[derive(Debug, Clone)]
pub struct LoadedModels {
    pub logistic: LogisticRegression,
    pub tree: DecisionTree,
    pub scaler: StandardScaler,
}

/// Immutable prediction context shared by all requests
#[derive(Debug, Clone)]
pub struct PredictionService {
    models: Option<LoadedModels>,
    slow_inference: Duration,
}

impl PredictionService {
    pub fn new(models: LoadedModels) -> Self {
        Self {
            models: Some(models),
            slow_inference: Duration::from_millis(DEFAULT_SLOW_INFERENCE_MS),
        }
    }

    /// Context for a process whose artifacts failed to load
    pub fn without_models() -> Self {
        Self {
            models: None,
            slow_inference: Duration::from_millis(DEFAULT_SLOW_INFERENCE_MS),
        }
    }

    pub fn from_option(models: Option<LoadedModels>) -> Self {
        match models {
            Some(models) => Self::new(models),
            None => Self::without_models(),
        }
    }

    pub fn with_slow_inference_threshold(mut self, threshold: Duration) -> Self {
        self.slow_inference = threshold;
        self
    }

    pub fn models_loaded(&self) -> bool {
        self.models.is_some()
    }

    /// Run both classifiers on one feature vector
    pub fn predict(&self, features: &FeatureVector) -> Result<PredictionResult> {
        let models = self
            .models
            .as_ref()
            .ok_or(PredictionError::ArtifactsUnavailable)?;

        let start = Instant::now();

        let raw = Array2::from_shape_vec((1, NUM_FEATURES), features.to_vec())
            .map_err(|e| PredictionError::inference(e.to_string()))?;
        let scaled = models.scaler.transform(raw.view())?;

        let logistic = first_label(models.logistic.predict(scaled.view())?)?;
        let tree = first_label(models.tree.predict(raw.view())?)?;

        let elapsed = start.elapsed();
        if elapsed > self.slow_inference {
            warn!(
                elapsed_ms = elapsed.as_millis() as u64,
                threshold_ms = self.slow_inference.as_millis() as u64,
                "Inference exceeded latency threshold"
            );
        } else {
            debug!(elapsed_us = elapsed.as_micros() as u64, "Inference completed");
        }

        Ok(PredictionResult {
            logistic_regression: logistic,
            decision_tree: tree,
        })
    }
}

/// Take the only row's label and coerce it to an integer
fn first_label(labels: Array1<f64>) -> Result<i64> {
    let label = labels
        .get(0)
        .copied()
        .ok_or_else(|| PredictionError::inference("model returned no predictions"))?;
    if !label.is_finite() {
        return Err(PredictionError::inference(format!(
            "cannot convert label {} to integer",
            label
        )));
    }
    Ok(label.trunc() as i64)
}
