//! Error types for the data layer.
//!
//! All errors are propagated via [`DbError`] which wraps the underlying
//! [`sqlx`] errors and adds the two lookup failures every store reports:
//! a missing document and a malformed identifier.

use observatory_types::{IdError, ObservationId};

/// Errors that can occur in the data layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// No document exists with the given identifier.
    #[error("Observation not found: {0}")]
    NotFound(ObservationId),

    /// The identifier is not valid for the store's identifier format.
    ///
    /// Kept so callers parsing raw ids share one taxonomy with the stores;
    /// the shipped stores take typed ids and never emit it.
    #[error("Invalid observation ID: {0}")]
    InvalidIdentifier(String),

    /// A `PostgreSQL` operation failed.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// A `PostgreSQL` migration failed.
    #[error("PostgreSQL migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization or deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored row does not hold a JSON object document.
    #[error("Corrupt document {0}: data is not a JSON object")]
    Corrupt(ObservationId),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<IdError> for DbError {
    fn from(err: IdError) -> Self {
        match err {
            IdError::Invalid(raw) => Self::InvalidIdentifier(raw),
        }
    }
}
