//! Observation API server for the Observatory service.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **Observation REST endpoints** (`/api/observations`) for creating,
//!   listing, reading, updating and deleting observation documents
//! - **Admin route group** (`/api/admin`) guarded by a bearer token
//! - **Liveness message** (`GET /`)
//!
//! # Architecture
//!
//! Handlers are thin: each one validates its inputs, calls the injected
//! [`ObservationStore`] once, and maps the result through [`ApiError`].
//! The store client is built at startup from [`AppConfig`] and closed after
//! the server drains.
//!
//! [`ObservationStore`]: observatory_db::ObservationStore
//! [`ApiError`]: error::ApiError

pub mod admin;
pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use config::{AppConfig, ConfigError, StoreKind};
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
