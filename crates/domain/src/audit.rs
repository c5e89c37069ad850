use serde::{Deserialize, Serialize};

/// Stable audit actions emitted by assignment mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when a role is assigned or reactivated for a user.
    RoleAssigned,
    /// Emitted when a role assignment is soft-removed.
    RoleRemoved,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RoleAssigned => "role.assigned",
            Self::RoleRemoved => "role.removed",
        }
    }
}
