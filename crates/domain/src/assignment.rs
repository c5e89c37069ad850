use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tradecore_core::UserId;
use uuid::Uuid;

use crate::RoleType;

/// Persisted link between one user and one role type.
///
/// At most one row exists per `(user_id, role_type)` pair; removal is
/// soft (`is_active` cleared), rows are never physically deleted. An
/// inactive row may keep `is_primary` set; the flag is inert while
/// the row is inactive and ignored by permission resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    /// Stable row identifier.
    pub id: Uuid,
    /// Owning user key.
    pub user_id: UserId,
    /// Assigned role type.
    pub role_type: RoleType,
    /// Marks the user's principal role; at most one active primary
    /// per user at any observable instant.
    pub is_primary: bool,
    /// Soft-removal flag.
    pub is_active: bool,
    /// First assignment time; reactivation preserves it.
    pub assigned_at: DateTime<Utc>,
}
