//! Startup wiring: artifact loading and shared state construction

use crate::api::AppState;
use predictor_lib::{
    health::{components, HealthRegistry},
    ArtifactLoader, PredictionService, StructuredLogger,
};
use std::path::Path;
use std::time::Duration;

/// Load the artifacts and build the state shared by every request.
///
/// A failed load is logged and leaves the service running without
/// models; the `artifacts` health component carries the failure text.
pub async fn build_state(
    model_dir: &Path,
    slow_inference: Duration,
    logger: StructuredLogger,
) -> AppState {
    let health_registry = HealthRegistry::new();
    health_registry.register(components::ARTIFACTS).await;
    health_registry.register(components::PREDICTOR).await;

    let models = match ArtifactLoader::new(model_dir).load() {
        Ok(models) => {
            logger.log_artifacts_loaded(model_dir);
            Some(models)
        }
        Err(err) => {
            logger.log_artifact_load_failed(model_dir, &err);
            health_registry
                .set_unhealthy(components::ARTIFACTS, err.to_string())
                .await;
            None
        }
    };

    let service =
        PredictionService::from_option(models).with_slow_inference_threshold(slow_inference);

    // Startup is complete either way; readiness still reflects the artifacts
    health_registry.set_ready(true).await;

    AppState::new(service, health_registry, logger)
}
