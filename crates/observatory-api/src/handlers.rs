//! REST API endpoint handlers for the observation resource.
//!
//! Each handler validates its inputs, makes exactly one store call, and
//! turns the result into a JSON response. Failures are converted through
//! [`ApiError`], which owns the status mapping.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Plain-text liveness message |
//! | `POST` | `/api/observations` | Create an observation |
//! | `GET` | `/api/observations` | List all observations |
//! | `GET` | `/api/observations/{id}` | Get one observation |
//! | `PUT` | `/api/observations/{id}` | Merge fields into an observation |
//! | `DELETE` | `/api/observations/{id}` | Delete an observation |
//!
//! Every identifier-taking route parses the path segment before touching
//! the store, so a malformed id is always a 400. A body sent without a JSON
//! content type is read as an empty object.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use observatory_types::{Fields, ObservationId};

use crate::error::ApiError;
use crate::state::AppState;

/// Body returned by `GET /`.
pub const LIVENESS_MESSAGE: &str = "Hello, Server is connected!";

// ---------------------------------------------------------------------------
// GET / -- liveness
// ---------------------------------------------------------------------------

/// Report that the server is up.
pub async fn index() -> &'static str {
    LIVENESS_MESSAGE
}

// ---------------------------------------------------------------------------
// POST /api/observations -- create
// ---------------------------------------------------------------------------

/// Create an observation from an arbitrary JSON object.
pub async fn create_observation(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Fields>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let fields = body_fields(body)?;

    let observation = state.store.create(fields).await?;
    tracing::debug!(observation_id = %observation.id, "Observation created");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Observation Created",
            "observation": observation,
        })),
    ))
}

// ---------------------------------------------------------------------------
// GET /api/observations -- list
// ---------------------------------------------------------------------------

/// List every stored observation.
pub async fn list_observations(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let observations = state.store.list_all().await?;

    Ok(Json(serde_json::json!({
        "observations": observations,
    })))
}

// ---------------------------------------------------------------------------
// GET /api/observations/{id} -- read one
// ---------------------------------------------------------------------------

/// Return a single observation.
pub async fn get_observation(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(path)?;

    let observation = state.store.get_by_id(id).await?;

    Ok(Json(serde_json::json!({
        "observation": observation,
    })))
}

// ---------------------------------------------------------------------------
// PUT /api/observations/{observationId} -- update
// ---------------------------------------------------------------------------

/// Merge the request body into an existing observation.
///
/// Only the keys present in the body change; the response carries the
/// post-update document.
pub async fn update_observation(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<Fields>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(path)?;
    let fields = body_fields(body)?;

    let observation = state.store.update_by_id(id, fields).await?;
    tracing::debug!(observation_id = %id, "Observation updated");

    Ok(Json(serde_json::json!({
        "message": "Observation updated",
        "observation": observation,
    })))
}

// ---------------------------------------------------------------------------
// DELETE /api/observations/{observationId} -- delete
// ---------------------------------------------------------------------------

/// Delete an observation and return the document as it was just before
/// removal.
pub async fn delete_observation(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(path)?;

    let observation = state.store.delete_by_id(id).await?;
    tracing::debug!(observation_id = %id, "Observation deleted");

    Ok(Json(serde_json::json!({
        "message": "Observation deleted",
        "observation": observation,
    })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse an observation id from a path segment.
///
/// A segment that does not even decode (bad percent-encoding, invalid
/// UTF-8) is reported the same way as one that is not a valid id.
fn parse_id(path: Result<Path<String>, PathRejection>) -> Result<ObservationId, ApiError> {
    let Path(raw) = path.map_err(|rejection| {
        tracing::warn!(reason = %rejection.body_text(), "Rejected undecodable observation id");
        ApiError::from(rejection)
    })?;

    ObservationId::parse(&raw).map_err(|e| {
        tracing::warn!(id = %raw, "Rejected malformed observation id");
        ApiError::from(e)
    })
}

/// Extract the request body as a field map.
///
/// Without a JSON content type the body is not parsed at all and counts as
/// an empty object. A JSON body that is malformed or not an object is
/// still a 400.
fn body_fields(body: Result<Json<Fields>, JsonRejection>) -> Result<Fields, ApiError> {
    match body {
        Ok(Json(fields)) => Ok(fields),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(Fields::new()),
        Err(rejection) => Err(ApiError::from(rejection)),
    }
}
