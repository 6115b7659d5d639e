//! `PostgreSQL` persistence for observation documents.
//!
//! Each observation is one row in the `observations` table: the UUID key
//! plus the caller's fields as a `JSONB` object. Updates use the `JSONB`
//! concatenation operator (`data || $patch`), which is exactly a shallow
//! top-level merge. Deletes use `RETURNING` so the pre-delete document is
//! read and removed in a single statement.

use async_trait::async_trait;
use observatory_types::{Fields, Observation, ObservationId, strip_id};
use uuid::Uuid;

use crate::error::DbError;
use crate::postgres::{PostgresConfig, PostgresPool};
use crate::store::ObservationStore;

/// Operations on the `observations` table.
#[derive(Clone)]
pub struct PgObservationStore {
    pool: PostgresPool,
}

impl PgObservationStore {
    /// Create a store over an already connected pool.
    pub const fn new(pool: PostgresPool) -> Self {
        Self { pool }
    }

    /// Connect to `PostgreSQL` and apply pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the connection or a migration fails.
    pub async fn connect(config: &PostgresConfig) -> Result<Self, DbError> {
        let pool = PostgresPool::connect(config).await?;
        pool.run_migrations().await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl ObservationStore for PgObservationStore {
    async fn create(&self, fields: Fields) -> Result<Observation, DbError> {
        let id = ObservationId::new();
        let data = serde_json::Value::Object(strip_id(fields));

        let row = sqlx::query_as::<_, ObservationRow>(
            r"INSERT INTO observations (id, data)
              VALUES ($1, $2)
              RETURNING id, data",
        )
        .bind(id.into_inner())
        .bind(&data)
        .fetch_one(self.pool.pool())
        .await?;

        tracing::debug!(observation_id = %id, "Inserted observation");

        row.into_observation()
    }

    async fn list_all(&self) -> Result<Vec<Observation>, DbError> {
        let rows = sqlx::query_as::<_, ObservationRow>(
            r"SELECT id, data
              FROM observations
              ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(self.pool.pool())
        .await?;

        rows.into_iter().map(ObservationRow::into_observation).collect()
    }

    async fn get_by_id(&self, id: ObservationId) -> Result<Observation, DbError> {
        let row = sqlx::query_as::<_, ObservationRow>(
            r"SELECT id, data
              FROM observations
              WHERE id = $1",
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool.pool())
        .await?;

        row.ok_or(DbError::NotFound(id))?.into_observation()
    }

    async fn update_by_id(
        &self,
        id: ObservationId,
        fields: Fields,
    ) -> Result<Observation, DbError> {
        let patch = serde_json::Value::Object(strip_id(fields));

        let row = sqlx::query_as::<_, ObservationRow>(
            r"UPDATE observations
              SET data = data || $2, updated_at = now()
              WHERE id = $1
              RETURNING id, data",
        )
        .bind(id.into_inner())
        .bind(&patch)
        .fetch_optional(self.pool.pool())
        .await?;

        tracing::debug!(observation_id = %id, found = row.is_some(), "Updated observation");

        row.ok_or(DbError::NotFound(id))?.into_observation()
    }

    async fn delete_by_id(&self, id: ObservationId) -> Result<Observation, DbError> {
        let row = sqlx::query_as::<_, ObservationRow>(
            r"DELETE FROM observations
              WHERE id = $1
              RETURNING id, data",
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool.pool())
        .await?;

        tracing::debug!(observation_id = %id, found = row.is_some(), "Deleted observation");

        row.ok_or(DbError::NotFound(id))?.into_observation()
    }

    async fn count(&self) -> Result<u64, DbError> {
        let row: (i64,) = sqlx::query_as(r"SELECT COUNT(*) FROM observations")
            .fetch_one(self.pool.pool())
            .await?;

        Ok(u64::try_from(row.0).unwrap_or(0))
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// A row from the `observations` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ObservationRow {
    /// Document UUID.
    pub id: Uuid,
    /// Document fields as stored (`JSONB`).
    pub data: serde_json::Value,
}

impl ObservationRow {
    /// Convert the raw row into an [`Observation`].
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Corrupt`] if `data` is not a JSON object.
    pub fn into_observation(self) -> Result<Observation, DbError> {
        let id = ObservationId::from(self.id);
        match self.data {
            serde_json::Value::Object(fields) => Ok(Observation::new(id, fields)),
            _ => Err(DbError::Corrupt(id)),
        }
    }
}
