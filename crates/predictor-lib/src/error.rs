//! Error types for artifact loading and prediction

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading model artifacts at startup
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// Artifact file could not be read
    #[error("failed to read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Artifact file is not valid JSON for its format
    #[error("failed to parse artifact {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Artifact digest does not match the manifest
    #[error("checksum mismatch for {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    /// Artifact parsed but its parameters are inconsistent
    #[error("invalid artifact {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

/// Fitted parameters that cannot describe a usable model
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct InvalidParams(pub String);

/// Errors raised while serving a prediction
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    /// Startup loading failed, so no model can run
    #[error("Models not loaded")]
    ArtifactsUnavailable,

    /// Input does not have the expected number of features
    #[error("expected {expected} features, got {actual}")]
    InvalidInputShape { expected: usize, actual: usize },

    /// Scaling or inference failed
    #[error("Prediction error: {0}")]
    InferenceFailure(String),
}

impl PredictionError {
    pub fn inference(message: impl Into<String>) -> Self {
        Self::InferenceFailure(message.into())
    }
}

/// Result alias for prediction operations
pub type Result<T> = std::result::Result<T, PredictionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifacts_unavailable_message() {
        assert_eq!(
            PredictionError::ArtifactsUnavailable.to_string(),
            "Models not loaded"
        );
    }

    #[test]
    fn test_inference_failure_embeds_cause() {
        let err = PredictionError::inference("X has 12 features");
        assert_eq!(err.to_string(), "Prediction error: X has 12 features");
    }

    #[test]
    fn test_checksum_mismatch_names_path() {
        let err = ArtifactError::ChecksumMismatch {
            path: PathBuf::from("models/scaler.json"),
            expected: "aa".to_string(),
            actual: "bb".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("models/scaler.json"));
        assert!(message.contains("expected aa"));
    }
}
