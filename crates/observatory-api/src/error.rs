//! Error types for the observation API.
//!
//! [`ApiError`] unifies every failure a handler can report into one enum,
//! and its [`IntoResponse`] implementation is the single mapping from
//! error kind to HTTP status and body:
//!
//! | Variant | Status | Body |
//! |---------|--------|------|
//! | `NotFound` | 404 | `{"message": "Observation not found"}` |
//! | `InvalidIdentifier` | 400 | `{"message": "Invalid observation ID"}` |
//! | `InvalidBody` | 400 | `{"message": <rejection text>}` |
//! | `Unauthorized` | 401 | `{"message": "Unauthorized"}` |
//! | `Store` | 500 | `{"error": <store error text>}` |
//!
//! Store failures pass the underlying driver message through verbatim.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use observatory_db::DbError;
use observatory_types::IdError;

/// Message returned when an observation does not exist.
pub const NOT_FOUND_MESSAGE: &str = "Observation not found";

/// Message returned when a path identifier is malformed.
pub const INVALID_ID_MESSAGE: &str = "Invalid observation ID";

/// Errors that can occur in the observation API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested observation does not exist.
    #[error("Observation not found")]
    NotFound,

    /// The path identifier is not a valid observation id.
    #[error("Invalid observation ID: {0}")]
    InvalidIdentifier(String),

    /// The JSON request body is malformed or not an object.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// The admin bearer token is missing or wrong.
    #[error("Unauthorized")]
    Unauthorized,

    /// Any other store failure.
    #[error(transparent)]
    Store(DbError),
}

impl ApiError {
    /// The HTTP status this error maps to.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InvalidIdentifier(_) | Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(_) => Self::NotFound,
            DbError::InvalidIdentifier(raw) => Self::InvalidIdentifier(raw),
            other => Self::Store(other),
        }
    }
}

impl From<IdError> for ApiError {
    fn from(err: IdError) -> Self {
        match err {
            IdError::Invalid(raw) => Self::InvalidIdentifier(raw),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::InvalidIdentifier(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            Self::NotFound => serde_json::json!({ "message": NOT_FOUND_MESSAGE }),
            Self::InvalidIdentifier(_) => serde_json::json!({ "message": INVALID_ID_MESSAGE }),
            Self::InvalidBody(msg) => serde_json::json!({ "message": msg }),
            Self::Unauthorized => serde_json::json!({ "message": "Unauthorized" }),
            Self::Store(e) => {
                tracing::error!(error = %e, "Store operation failed");
                serde_json::json!({ "error": e.to_string() })
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use observatory_types::ObservationId;

    use super::*;

    #[test]
    fn db_not_found_maps_to_404() {
        let err = ApiError::from(DbError::NotFound(ObservationId::new()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn db_invalid_identifier_maps_to_400() {
        let err = ApiError::from(DbError::InvalidIdentifier("xyz".to_owned()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn other_db_errors_map_to_500() {
        let err = ApiError::from(DbError::Config("boom".to_owned()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Configuration error: boom");
    }

    #[test]
    fn id_error_maps_to_400() {
        let err = ApiError::from(IdError::Invalid("nope".to_owned()));
        assert!(matches!(err, ApiError::InvalidIdentifier(ref raw) if raw == "nope"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unauthorized_maps_to_401() {
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
    }
}
