//! Validated request surface.
//!
//! Field types and the cap-shape enumeration are enforced by typed
//! deserialization; numeric ranges by an explicit check that enumerates
//! every offending field. Nothing out of range ever reaches the
//! normalizer or the model.

use super::{run_prediction, ApiError, AppState};
use crate::types::mushroom::MushroomInput;
use crate::types::prediction::Prediction;
use axum::extract::{Query, State};
use axum::Json;
use tracing::debug;

/// Handles `GET /mushroom_query` with five typed query parameters.
pub async fn mushroom_query(
    State(state): State<AppState>,
    Query(input): Query<MushroomInput>,
) -> Result<Json<Prediction>, ApiError> {
    classify(&state, input)
}

/// Handles `POST /mushroom_post`, one typed JSON body with the same
/// fields and constraints as the query channel.
pub async fn mushroom_post(
    State(state): State<AppState>,
    Json(input): Json<MushroomInput>,
) -> Result<Json<Prediction>, ApiError> {
    classify(&state, input)
}

/// Shared path for both channels: range check, normalize, predict.
fn classify(state: &AppState, input: MushroomInput) -> Result<Json<Prediction>, ApiError> {
    if let Err(violations) = input.validate() {
        state.metrics.record_rejection();
        debug!(violations = violations.len(), "Request rejected by validation");
        return Err(ApiError::Validation(violations));
    }

    let record = state.normalizer.normalize(
        input.cap_diameter,
        input.cap_shape.as_str(),
        input.has_ring,
        input.stem_height,
        input.stem_width,
    )?;

    run_prediction(state, &record)
}
