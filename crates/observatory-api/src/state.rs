//! Shared application state for the observation API.
//!
//! [`AppState`] carries the injected store client and the admin bearer
//! token. It holds no per-request data: every observation lives in the
//! store, so handlers are stateless between requests.

use std::sync::Arc;

use observatory_db::{MemoryObservationStore, ObservationStore};

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor. The store
/// is constructed once at startup and shared by every request; its own
/// concurrency control governs conflicting writes.
#[derive(Clone)]
pub struct AppState {
    /// The observation store client.
    pub store: Arc<dyn ObservationStore>,
    /// Bearer token required by the admin route group, if enabled.
    pub admin_key: Option<String>,
}

impl AppState {
    /// Create application state around an already constructed store.
    pub const fn new(store: Arc<dyn ObservationStore>) -> Self {
        Self {
            store,
            admin_key: None,
        }
    }

    /// Create application state backed by a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryObservationStore::new()))
    }

    /// Enable the admin route group with the given bearer token.
    #[must_use]
    pub fn with_admin_key(mut self, key: impl Into<String>) -> Self {
        self.admin_key = Some(key.into());
        self
    }
}
