//! Naive request surface.
//!
//! No range or enumeration checks: numbers must merely parse as numbers
//! and `cap_shape` is any string. The POST body is an untyped JSON value
//! held as an explicit raw record with a strict coercion step (numbers
//! must be JSON numbers, `has_ring` a JSON boolean). Unknown cap-shape
//! names surface from the shared normalizer as a clean client error
//! instead of an uncaught lookup failure.

use super::{run_prediction, ApiError, AppState};
use crate::types::mushroom::RawMushroom;
use crate::types::prediction::Prediction;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

/// Loosely-typed query parameters: only transport-level coercion.
#[derive(Debug, Clone, Deserialize)]
pub struct NaiveParams {
    pub cap_diameter: f64,
    pub cap_shape: String,
    pub has_ring: bool,
    pub stem_height: f64,
    pub stem_width: f64,
}

/// Handles `GET /mushroom_query` with loosely-typed query parameters.
pub async fn mushroom_query(
    State(state): State<AppState>,
    Query(params): Query<NaiveParams>,
) -> Result<Json<Prediction>, ApiError> {
    let record = state
        .normalizer
        .normalize(
            params.cap_diameter,
            &params.cap_shape,
            params.has_ring,
            params.stem_height,
            params.stem_width,
        )
        .map_err(|err| {
            state.metrics.record_rejection();
            ApiError::UnknownCategory(err)
        })?;

    run_prediction(&state, &record)
}

/// Handles `POST /mushroom_post`, coercing an untyped JSON body into a
/// raw record.
pub async fn mushroom_post(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Prediction>, ApiError> {
    let raw = RawMushroom::from_value(&body).map_err(|violations| {
        state.metrics.record_rejection();
        ApiError::Malformed(violations)
    })?;

    let record = state
        .normalizer
        .normalize(
            raw.cap_diameter,
            &raw.cap_shape,
            raw.has_ring,
            raw.stem_height,
            raw.stem_width,
        )
        .map_err(|err| {
            state.metrics.record_rejection();
            ApiError::UnknownCategory(err)
        })?;

    run_prediction(&state, &record)
}
