//! Process-local observation store.
//!
//! Keeps documents in insertion order behind a [`RwLock`]. Semantics match
//! [`PgObservationStore`](crate::PgObservationStore) so the HTTP layer can
//! be exercised without a database, and the service can run locally with
//! `OBSERVATORY_STORE=memory`. Nothing survives a restart.

use async_trait::async_trait;
use observatory_types::{Fields, Observation, ObservationId};
use tokio::sync::RwLock;

use crate::error::DbError;
use crate::store::ObservationStore;

/// In-memory [`ObservationStore`].
#[derive(Debug, Default)]
pub struct MemoryObservationStore {
    documents: RwLock<Vec<Observation>>,
}

impl MemoryObservationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ObservationStore for MemoryObservationStore {
    async fn create(&self, fields: Fields) -> Result<Observation, DbError> {
        let observation = Observation::new(ObservationId::new(), fields);
        self.documents.write().await.push(observation.clone());
        tracing::debug!(observation_id = %observation.id, "Inserted observation");
        Ok(observation)
    }

    async fn list_all(&self) -> Result<Vec<Observation>, DbError> {
        Ok(self.documents.read().await.clone())
    }

    async fn get_by_id(&self, id: ObservationId) -> Result<Observation, DbError> {
        self.documents
            .read()
            .await
            .iter()
            .find(|o| o.id == id)
            .cloned()
            .ok_or(DbError::NotFound(id))
    }

    async fn update_by_id(
        &self,
        id: ObservationId,
        fields: Fields,
    ) -> Result<Observation, DbError> {
        let mut documents = self.documents.write().await;
        let observation = documents
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(DbError::NotFound(id))?;
        observation.merge(fields);
        tracing::debug!(observation_id = %id, "Updated observation");
        Ok(observation.clone())
    }

    async fn delete_by_id(&self, id: ObservationId) -> Result<Observation, DbError> {
        let mut documents = self.documents.write().await;
        let position = documents
            .iter()
            .position(|o| o.id == id)
            .ok_or(DbError::NotFound(id))?;
        let removed = documents.remove(position);
        tracing::debug!(observation_id = %id, "Deleted observation");
        Ok(removed)
    }

    async fn count(&self) -> Result<u64, DbError> {
        let len = self.documents.read().await.len();
        Ok(u64::try_from(len).unwrap_or(u64::MAX))
    }

    async fn close(&self) {}
}
