//! The persistence seam between the HTTP layer and the document store.
//!
//! [`ObservationStore`] is object-safe so the server can hold a single
//! `Arc<dyn ObservationStore>` built at startup and injected into every
//! handler. Implementations own all persisted observation state; callers
//! hold none across requests.

use async_trait::async_trait;
use observatory_types::{Fields, Observation, ObservationId};

use crate::error::DbError;

/// CRUD operations over observation documents.
///
/// Every lookup by identifier reports a missing document as
/// [`DbError::NotFound`]. Any other failure (connection, write rejection,
/// decoding) is reported as the corresponding [`DbError`] variant.
#[async_trait]
pub trait ObservationStore: Send + Sync {
    /// Insert a new document holding `fields` and a freshly generated id.
    ///
    /// No validation of the field shape is performed.
    async fn create(&self, fields: Fields) -> Result<Observation, DbError>;

    /// Return every stored document in insertion order.
    ///
    /// An empty store yields an empty vector, not an error.
    async fn list_all(&self) -> Result<Vec<Observation>, DbError>;

    /// Fetch a single document.
    async fn get_by_id(&self, id: ObservationId) -> Result<Observation, DbError>;

    /// Merge `fields` into an existing document and return its new state.
    ///
    /// This is a shallow merge: top-level keys in `fields` overwrite, all
    /// other keys keep their prior values.
    async fn update_by_id(&self, id: ObservationId, fields: Fields)
    -> Result<Observation, DbError>;

    /// Remove a document and return the value it held just before removal.
    async fn delete_by_id(&self, id: ObservationId) -> Result<Observation, DbError>;

    /// Number of stored documents.
    async fn count(&self) -> Result<u64, DbError>;

    /// Release any held connections. Safe to call more than once.
    async fn close(&self);
}
