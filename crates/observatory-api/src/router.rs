//! Axum router construction for the observation API.
//!
//! Assembles the observation routes and, when an admin key is configured,
//! the admin group into a single [`Router`] with CORS and request tracing.

use std::sync::Arc;

use axum::Router;
use axum::http::Method;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::admin::{ADMIN_PREFIX, admin_router};
use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /` -- liveness message
/// - `POST /api/observations` -- create
/// - `GET /api/observations` -- list
/// - `GET /api/observations/{id}` -- read one
/// - `PUT /api/observations/{id}` -- update
/// - `DELETE /api/observations/{id}` -- delete
/// - `/api/admin/*` -- admin group (only with an admin key)
///
/// CORS allows any origin for development. In production this should be
/// restricted.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/", get(handlers::index))
        .route(
            "/api/observations",
            get(handlers::list_observations).post(handlers::create_observation),
        )
        .route(
            "/api/observations/{id}",
            get(handlers::get_observation)
                .put(handlers::update_observation)
                .delete(handlers::delete_observation),
        );

    if state.admin_key.is_some() {
        router = router.nest(ADMIN_PREFIX, admin_router(Arc::clone(&state)));
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
