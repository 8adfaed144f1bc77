//! HTTP API for predictions and health checks

use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use predictor_lib::{
    health::{components, ComponentStatus, HealthRegistry},
    PredictRequest, PredictionError, PredictionResult, PredictionService, StructuredLogger,
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// Body of `GET /`
pub const ROOT_MESSAGE: &str = "Heart Disease Prediction API is running.";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PredictionService>,
    pub health_registry: HealthRegistry,
    pub logger: StructuredLogger,
}

impl AppState {
    pub fn new(
        service: PredictionService,
        health_registry: HealthRegistry,
        logger: StructuredLogger,
    ) -> Self {
        Self {
            service: Arc::new(service),
            health_registry,
            logger,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}

/// Error body, always a single textual detail
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Errors returned by the HTTP handlers
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Prediction(#[from] PredictionError),

    /// Body rejected before reaching the handler
    #[error("{detail}")]
    InvalidRequest { status: StatusCode, detail: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Prediction(PredictionError::InvalidInputShape { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Prediction(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InvalidRequest { status, .. } => *status,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidRequest {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            detail: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Liveness message, independent of model state
async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: ROOT_MESSAGE.to_string(),
    })
}

/// Run both classifiers on one feature vector
async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictionResult>, ApiError> {
    let Json(request) = payload?;

    match state.service.predict(&request.features) {
        Ok(result) => {
            state.logger.log_prediction(&result);
            state
                .health_registry
                .record_inference(components::PREDICTOR, None)
                .await;
            Ok(Json(result))
        }
        Err(err) => {
            state.logger.log_prediction_failed(&err);
            if matches!(err, PredictionError::InferenceFailure(_)) {
                state
                    .health_registry
                    .record_inference(components::PREDICTOR, Some(&err.to_string()))
                    .await;
            }
            Err(err.into())
        }
    }
}

/// Health check response - returns 200 if healthy, 503 if unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy => StatusCode::OK,
        ComponentStatus::Degraded => StatusCode::OK, // Still serving
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Readiness check response - returns 200 if ready, 503 if not ready
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/predict", post(predict))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Start the API server, returning once `shutdown` resolves
pub async fn serve<F>(addr: &str, state: Arc<AppState>, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router(state);

    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
