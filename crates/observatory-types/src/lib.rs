//! Shared type definitions for the Observatory observation service.
//!
//! This crate is the single source of truth for the observation document
//! and its identifier. Both the data layer and the HTTP layer depend on it.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrapper for observation identifiers
//! - [`observation`] -- The open-schema observation document

pub mod ids;
pub mod observation;

// Re-export all public types at crate root for convenience.
pub use ids::{IdError, ObservationId};
pub use observation::{Fields, ID_FIELD, Observation, strip_id};
