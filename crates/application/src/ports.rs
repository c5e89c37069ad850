use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tradecore_core::{AppResult, UserId};
use tradecore_domain::{AuditAction, RoleAssignment, RoleType};

/// Projection of one active role for display surfaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRoleView {
    /// Canonical role type.
    pub role_type: RoleType,
    /// Human-readable role name.
    pub display_name: String,
    /// Display/ranking weight of the role.
    pub priority: u8,
    /// Marks the user's principal role.
    pub is_primary: bool,
}

/// Audit event emitted by assignment mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Affected user.
    pub user_id: UserId,
    /// Stable action identifier.
    pub action: AuditAction,
    /// Optional event detail.
    pub detail: Option<String>,
}

/// Repository port for persisted role assignments.
///
/// Implementations must serialize writes for the same user against
/// each other while writes for different users never share a lock.
/// Reads are snapshot reads and may run with unbounded concurrency.
#[async_trait]
pub trait RoleAssignmentRepository: Send + Sync {
    /// Reactivates or creates the `(user, role type)` row as one
    /// atomic unit.
    ///
    /// An existing row is reactivated with the requested primary flag
    /// and its `assigned_at` preserved; a missing row is created with
    /// `assigned_at = now`. When `is_primary` is true, every other
    /// active row of the user has its primary flag cleared inside the
    /// same unit; no reader may observe two active primaries, even
    /// transiently.
    async fn upsert_active(
        &self,
        user_id: UserId,
        role_type: RoleType,
        is_primary: bool,
        now: DateTime<Utc>,
    ) -> AppResult<RoleAssignment>;

    /// Soft-removes the matching active row.
    ///
    /// Returns `false` when no active row matched; the primary flag is
    /// left as stored (inert while inactive). Rows are never deleted.
    async fn deactivate(&self, user_id: UserId, role_type: RoleType) -> AppResult<bool>;

    /// Returns the user's active assignments.
    async fn list_active(&self, user_id: UserId) -> AppResult<Vec<RoleAssignment>>;

    /// Returns the `(user, role type)` row in any lifecycle state.
    async fn find(
        &self,
        user_id: UserId,
        role_type: RoleType,
    ) -> AppResult<Option<RoleAssignment>>;
}

/// Port for appending audit events.
#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// Appends one audit event.
    async fn append_event(&self, event: AuditEvent) -> AppResult<()>;
}
