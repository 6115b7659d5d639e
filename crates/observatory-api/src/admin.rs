//! Admin route group mounted under `/api/admin`.
//!
//! The group is independent of the observation routes. Every request must
//! present `Authorization: Bearer <ADMIN_API_KEY>`; the group is only
//! mounted when a key is configured.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/admin/status` | Service status and observation count |

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use crate::error::ApiError;
use crate::state::AppState;

/// Mount path of the admin group.
pub const ADMIN_PREFIX: &str = "/api/admin";

/// Build the admin router, guarded by the bearer-token middleware.
pub fn admin_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/status", get(status))
        .route_layer(middleware::from_fn_with_state(state, require_admin_key))
}

/// Reject requests that do not carry the configured bearer token.
async fn require_admin_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let expected = state.admin_key.as_deref().ok_or(ApiError::Unauthorized)?;

    let presented = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if presented.is_some_and(|token| tokens_match(token.as_bytes(), expected.as_bytes())) {
        Ok(next.run(request).await)
    } else {
        tracing::warn!(path = %request.uri().path(), "Rejected admin request");
        Err(ApiError::Unauthorized)
    }
}

/// Report service status and the number of stored observations.
async fn status(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let observations = state.store.count().await?;

    Ok(Json(serde_json::json!({
        "status": "operational",
        "version": env!("CARGO_PKG_VERSION"),
        "observations": observations,
    })))
}

/// Compare two tokens in time independent of where they first differ.
///
/// Only the length is allowed to leak.
fn tokens_match(presented: &[u8], expected: &[u8]) -> bool {
    if presented.len() != expected.len() {
        return false;
    }
    presented
        .iter()
        .zip(expected)
        .fold(0_u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_tokens_match() {
        assert!(tokens_match(b"s3cret-key", b"s3cret-key"));
    }

    #[test]
    fn differing_tokens_do_not_match() {
        assert!(!tokens_match(b"s3cret-key", b"s3cret-kez"));
        assert!(!tokens_match(b"x3cret-key", b"s3cret-key"));
    }

    #[test]
    fn length_mismatch_does_not_match() {
        assert!(!tokens_match(b"s3cret", b"s3cret-key"));
        assert!(!tokens_match(b"", b"s3cret-key"));
    }
}
