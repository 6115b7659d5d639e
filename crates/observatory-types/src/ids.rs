//! Type-safe identifier wrapper around [`Uuid`].
//!
//! Observations are keyed by UUID v7 (time-ordered) so that the natural
//! key order follows insertion order and indexes stay compact. The
//! identifier is generated application-side on create and never changes
//! afterwards.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors produced when parsing an identifier from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The string is not a syntactically valid identifier.
    #[error("invalid observation id: {0}")]
    Invalid(String),
}

/// Unique identifier for an observation document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObservationId(pub Uuid);

impl ObservationId {
    /// Create a new identifier using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Parse an identifier from its textual form.
    ///
    /// Accepts every form [`Uuid::parse_str`] accepts (hyphenated, simple,
    /// braced, URN). Anything else is an [`IdError::Invalid`].
    pub fn parse(s: &str) -> Result<Self, IdError> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_e| IdError::Invalid(s.to_owned()))
    }

    /// Return the inner [`Uuid`] value.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for ObservationId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for ObservationId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ObservationId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Uuid> for ObservationId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<ObservationId> for Uuid {
    fn from(id: ObservationId) -> Self {
        id.0
    }
}
