//! Library for the heart disease prediction service
//!
//! This crate provides:
//! - Feature vector and prediction types, plus the feature catalogue
//! - Loading and validation of the fitted model artifacts
//! - Inference for the scaler, logistic regression and decision tree
//! - Health checks and structured logging

pub mod artifacts;
pub mod error;
pub mod health;
pub mod models;
pub mod observability;
pub mod predictor;

pub use artifacts::ArtifactLoader;
pub use error::{ArtifactError, PredictionError};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::StructuredLogger;
pub use predictor::{LoadedModels, PredictionService};
