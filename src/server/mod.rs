//! HTTP request surfaces for the inference pipeline.
//!
//! Two variants of the same surface exist: `validated` enforces field
//! types, numeric ranges and the cap-shape enumeration before
//! normalization; `naive` passes loosely-typed input straight through and
//! leaves correctness to the normalizer. Exactly one variant is served
//! per process, selected by configuration. Both converge on the same
//! normalize → predict path.

pub mod naive;
pub mod validated;

use crate::config::SurfaceVariant;
use crate::error::{InferenceError, NormalizeError};
use crate::metrics::ServiceMetrics;
use crate::models::inference::PredictionService;
use crate::normalizer::InputNormalizer;
use crate::types::mushroom::FieldViolation;
use crate::types::prediction::Prediction;
use crate::types::record::FeatureRecord;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::error;

/// Shared per-process state handed to every request handler.
///
/// The prediction service holds the read-only model artifact; requests
/// never mutate it.
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<PredictionService>,
    pub normalizer: InputNormalizer,
    pub metrics: Arc<ServiceMetrics>,
}

impl AppState {
    pub fn new(predictor: Arc<PredictionService>, metrics: Arc<ServiceMetrics>) -> Self {
        Self {
            predictor,
            normalizer: InputNormalizer::new(),
            metrics,
        }
    }
}

/// Request-level error mapped to an HTTP status and JSON body.
#[derive(Debug)]
pub enum ApiError {
    /// Validated surface: field constraint violations (HTTP 422)
    Validation(Vec<FieldViolation>),
    /// Naive surface: body could not be coerced into the five fields (HTTP 400)
    Malformed(Vec<FieldViolation>),
    /// Categorical value outside the fixed mapping (HTTP 400)
    UnknownCategory(NormalizeError),
    /// Preprocessor or classifier failure (HTTP 500)
    Inference(InferenceError),
}

impl From<NormalizeError> for ApiError {
    fn from(err: NormalizeError) -> Self {
        ApiError::UnknownCategory(err)
    }
}

impl From<InferenceError> for ApiError {
    fn from(err: InferenceError) -> Self {
        ApiError::Inference(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(violations) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": "validation failed", "violations": violations }),
            ),
            ApiError::Malformed(violations) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "malformed request body", "violations": violations }),
            ),
            ApiError::UnknownCategory(err) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": err.to_string(), "field": "cap_shape" }),
            ),
            ApiError::Inference(err) => {
                error!(error = %err, "Inference failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "inference failed" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Build the router for the configured surface variant.
pub fn router(state: AppState, variant: SurfaceVariant) -> Router {
    let routes = match variant {
        SurfaceVariant::Validated => Router::new()
            .route("/mushroom_query", get(validated::mushroom_query))
            .route("/mushroom_post", post(validated::mushroom_post)),
        SurfaceVariant::Naive => Router::new()
            .route("/mushroom_query", get(naive::mushroom_query))
            .route("/mushroom_post", post(naive::mushroom_post)),
    };

    routes.route("/", get(root)).with_state(state)
}

/// Liveness probe. Fixed greeting, independent of model state.
pub async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "Hello World" }))
}

/// Shared predict step for both surfaces: run the record through the
/// model and record metrics.
pub(crate) fn run_prediction(
    state: &AppState,
    record: &FeatureRecord,
) -> Result<Json<Prediction>, ApiError> {
    let start = Instant::now();

    match state.predictor.predict(record) {
        Ok(prediction) => {
            state
                .metrics
                .record_prediction(start.elapsed(), prediction.prediction);
            Ok(Json(prediction))
        }
        Err(err) => {
            state.metrics.record_failure();
            Err(ApiError::Inference(err))
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::error::InferenceError;
    use crate::models::inference::Artifact;

    struct FixedLabelArtifact {
        label: i64,
    }

    impl Artifact for FixedLabelArtifact {
        fn transform(&self, record: &FeatureRecord) -> Result<Vec<f32>, InferenceError> {
            Ok(vec![record.cap_diameter as f32])
        }

        fn predict(&self, _features: &[f32]) -> Result<i64, InferenceError> {
            Ok(self.label)
        }
    }

    /// App state backed by a stub artifact returning a fixed label.
    pub(crate) fn stub_state(label: i64) -> AppState {
        AppState::new(
            Arc::new(PredictionService::new(Arc::new(FixedLabelArtifact {
                label,
            }))),
            Arc::new(ServiceMetrics::new()),
        )
    }
}
