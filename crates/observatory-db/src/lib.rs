//! Data layer for the Observatory observation service.
//!
//! Observation documents live in `PostgreSQL` as one `JSONB` row each. The
//! HTTP layer never talks to the database directly: it holds an
//! [`ObservationStore`] trait object that is constructed once at startup
//! and closed on shutdown.
//!
//! ```text
//! HTTP handler
//!     |
//!     +-- Arc<dyn ObservationStore>
//!         |-- PgObservationStore      (PostgreSQL, production)
//!         +-- MemoryObservationStore  (process-local, tests and dev)
//! ```
//!
//! # Modules
//!
//! - [`store`] -- The [`ObservationStore`] trait
//! - [`observation_store`] -- `PostgreSQL` implementation
//! - [`memory`] -- In-memory implementation
//! - [`postgres`] -- `PostgreSQL` connection pool and configuration
//! - [`error`] -- Shared error types

pub mod error;
pub mod memory;
pub mod observation_store;
pub mod postgres;
pub mod store;

// Re-export primary types for convenience.
pub use error::DbError;
pub use memory::MemoryObservationStore;
pub use observation_store::{ObservationRow, PgObservationStore};
pub use postgres::{PostgresConfig, PostgresPool};
pub use store::ObservationStore;
