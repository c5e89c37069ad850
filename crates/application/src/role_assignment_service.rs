use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use tradecore_core::{AppResult, UserId};
use tradecore_domain::{
    AuditAction, Permission, RoleAssignment, RoleCatalog, has_permission, has_role,
    most_authoritative_role, resolve_permissions,
};

use crate::ports::{AuditEvent, AuditRepository, RoleAssignmentRepository, UserRoleView};

/// Application service orchestrating role-assignment mutations.
///
/// Role type values are validated against the catalog before any
/// storage access; the atomicity of the demote-and-upsert step is the
/// repository's contract.
#[derive(Clone)]
pub struct RoleAssignmentService {
    catalog: Arc<RoleCatalog>,
    repository: Arc<dyn RoleAssignmentRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl RoleAssignmentService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        catalog: Arc<RoleCatalog>,
        repository: Arc<dyn RoleAssignmentRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            catalog,
            repository,
            audit_repository,
        }
    }

    /// Returns the shared role catalog.
    #[must_use]
    pub fn catalog(&self) -> &RoleCatalog {
        self.catalog.as_ref()
    }

    /// Assigns a role to a user, creating or reactivating the row.
    ///
    /// Fails with `UnknownRoleType` for an unrecognized value before
    /// touching storage. When `is_primary` is requested, any other
    /// active primary of the user is demoted in the same atomic unit.
    pub async fn assign_role(
        &self,
        user_id: UserId,
        role_type: &str,
        is_primary: bool,
    ) -> AppResult<RoleAssignment> {
        let role_type = self.catalog.lookup(role_type)?.role_type;

        let assignment = self
            .repository
            .upsert_active(user_id, role_type, is_primary, Utc::now())
            .await?;

        self.audit_repository
            .append_event(AuditEvent {
                user_id,
                action: AuditAction::RoleAssigned,
                detail: Some(format!(
                    "assigned role '{}' (primary: {is_primary})",
                    role_type.as_str()
                )),
            })
            .await?;

        Ok(assignment)
    }

    /// Soft-removes a role from a user.
    ///
    /// Returns whether an active row was found; removing an unassigned
    /// or already-inactive role is a no-op, not a failure.
    pub async fn remove_role(&self, user_id: UserId, role_type: &str) -> AppResult<bool> {
        let role_type = self.catalog.lookup(role_type)?.role_type;

        let removed = self.repository.deactivate(user_id, role_type).await?;
        if removed {
            self.audit_repository
                .append_event(AuditEvent {
                    user_id,
                    action: AuditAction::RoleRemoved,
                    detail: Some(format!("removed role '{}'", role_type.as_str())),
                })
                .await?;
        }

        Ok(removed)
    }

    /// Returns the user's active assignments.
    pub async fn active_roles(&self, user_id: UserId) -> AppResult<Vec<RoleAssignment>> {
        self.repository.list_active(user_id).await
    }

    /// Returns the unique active primary assignment, if any.
    pub async fn primary_role(&self, user_id: UserId) -> AppResult<Option<RoleAssignment>> {
        let assignments = self.repository.list_active(user_id).await?;
        Ok(assignments
            .into_iter()
            .find(|assignment| assignment.is_primary))
    }

    /// Returns the user's active roles as display projections, most
    /// authoritative first.
    pub async fn user_roles(&self, user_id: UserId) -> AppResult<Vec<UserRoleView>> {
        let assignments = self.repository.list_active(user_id).await?;

        let mut views: Vec<UserRoleView> = assignments
            .iter()
            .map(|assignment| self.view_for(assignment))
            .collect();
        views.sort_by(|left, right| right.priority.cmp(&left.priority));

        Ok(views)
    }

    /// Returns the deduplicated union of permissions granted by the
    /// user's active roles.
    pub async fn user_permissions(&self, user_id: UserId) -> AppResult<BTreeSet<Permission>> {
        let assignments = self.repository.list_active(user_id).await?;
        Ok(resolve_permissions(&self.catalog, &assignments))
    }

    /// Returns whether any of the user's active roles grants the
    /// permission.
    pub async fn user_has_permission(
        &self,
        user_id: UserId,
        permission: Permission,
    ) -> AppResult<bool> {
        let assignments = self.repository.list_active(user_id).await?;
        Ok(has_permission(&self.catalog, &assignments, permission))
    }

    /// Returns whether the user holds the role type, ignoring the
    /// primary flag. The value is canonicalized before comparison.
    pub async fn user_has_role(&self, user_id: UserId, role_type: &str) -> AppResult<bool> {
        let role_type = self.catalog.lookup(role_type)?.role_type;
        let assignments = self.repository.list_active(user_id).await?;
        Ok(has_role(&assignments, role_type))
    }

    /// Returns the user's highest-priority active role for display.
    pub async fn most_authoritative_role(
        &self,
        user_id: UserId,
    ) -> AppResult<Option<UserRoleView>> {
        let assignments = self.repository.list_active(user_id).await?;
        Ok(most_authoritative_role(&self.catalog, &assignments)
            .map(|assignment| self.view_for(assignment)))
    }

    fn view_for(&self, assignment: &RoleAssignment) -> UserRoleView {
        let definition = self.catalog.definition(assignment.role_type);
        UserRoleView {
            role_type: assignment.role_type,
            display_name: definition.display_name.to_owned(),
            priority: definition.priority,
            is_primary: assignment.is_primary,
        }
    }
}
