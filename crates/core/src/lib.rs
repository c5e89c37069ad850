//! Shared primitives for all Rust crates in tradecore.

#![forbid(unsafe_code)]

/// Caller identity primitives shared across services.
pub mod auth;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use auth::UserIdentity;

/// Result type used across tradecore crates.
pub type AppResult<T> = Result<T, AppError>;

/// Unique identifier for a user record.
///
/// The authorization core never navigates from a user to an embedded
/// role collection; assignments reference users by this key only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a random user identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a user identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for UserId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Role type not present in the closed catalog enumeration.
    /// Rejected before any storage access; never retried.
    #[error("unknown role type '{0}'")]
    UnknownRoleType(String),

    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Transient write conflict after the serialization strategy gave
    /// up. Safe for the caller to retry.
    #[error("concurrency conflict: {0}")]
    Conflict(String),

    /// Persistence dependency unreachable. Surfaces as a service
    /// availability failure, never as an authorization denial.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}
