//! Structured logging for service events
//!
//! Every event carries an `event` field so JSON log lines can be
//! filtered without parsing the message text.

use crate::error::{ArtifactError, PredictionError};
use crate::models::PredictionResult;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Structured logger for prediction service events
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    service_name: String,
}

impl StructuredLogger {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Log service startup
    pub fn log_startup(&self, version: &str, addr: &str, model_dir: &Path) {
        info!(
            event = "service_started",
            service = %self.service_name,
            version = %version,
            addr = %addr,
            model_dir = %model_dir.display(),
            "Prediction service started"
        );
    }

    /// Log a successful artifact load
    pub fn log_artifacts_loaded(&self, model_dir: &Path) {
        info!(
            event = "artifacts_loaded",
            service = %self.service_name,
            model_dir = %model_dir.display(),
            "Models loaded successfully"
        );
    }

    /// Log a failed artifact load; the service keeps running without models
    pub fn log_artifact_load_failed(&self, model_dir: &Path, err: &ArtifactError) {
        error!(
            event = "artifact_load_failed",
            service = %self.service_name,
            model_dir = %model_dir.display(),
            error = %err,
            "Error loading models, predictions will be rejected"
        );
    }

    /// Log a served prediction
    pub fn log_prediction(&self, result: &PredictionResult) {
        debug!(
            event = "prediction_served",
            service = %self.service_name,
            logistic_regression = result.logistic_regression,
            decision_tree = result.decision_tree,
            "Prediction served"
        );
    }

    /// Log a rejected or failed prediction
    pub fn log_prediction_failed(&self, err: &PredictionError) {
        match err {
            PredictionError::ArtifactsUnavailable => {
                warn!(
                    event = "prediction_failed",
                    service = %self.service_name,
                    reason = "artifacts_unavailable",
                    "Prediction rejected, models not loaded"
                );
            }
            _ => {
                error!(
                    event = "prediction_failed",
                    service = %self.service_name,
                    reason = "inference_failure",
                    error = %err,
                    "Prediction failed"
                );
            }
        }
    }

    /// Log service shutdown
    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            service = %self.service_name,
            reason = %reason,
            "Prediction service shutting down"
        );
    }
}
