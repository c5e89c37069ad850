use tradecore_core::UserIdentity;
use tradecore_domain::{Permission, RoleType, has_permission, has_role};
use tracing::warn;

use crate::role_assignment_service::RoleAssignmentService;

/// Outcome of an authorization check.
///
/// Verdicts are ordinary return values, not errors; the transport
/// layer owns the mapping to status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// At least one candidate matched.
    Allowed,
    /// The identity resolved but no candidate matched.
    Denied,
    /// The caller supplied no resolvable identity.
    Unauthenticated,
    /// The assignment store could not be reached. Never downgraded to
    /// a denial.
    ServiceUnavailable,
}

/// Boundary object answering permission and role checks for the
/// request pipeline.
///
/// Each check performs exactly one assignment lookup regardless of the
/// candidate list length, then evaluates candidates match-any with
/// short-circuit on the first hit.
#[derive(Clone)]
pub struct AuthorizationGate {
    service: RoleAssignmentService,
}

impl AuthorizationGate {
    /// Creates a gate over the assignment service.
    #[must_use]
    pub fn new(service: RoleAssignmentService) -> Self {
        Self { service }
    }

    /// Checks whether the identity holds any of the candidate
    /// permissions. An empty candidate list denies.
    pub async fn require_permission(
        &self,
        identity: Option<&UserIdentity>,
        required: &[Permission],
    ) -> Verdict {
        let Some(identity) = identity else {
            return Verdict::Unauthenticated;
        };

        let assignments = match self.service.active_roles(identity.user_id()).await {
            Ok(assignments) => assignments,
            Err(error) => {
                warn!(user_id = %identity.user_id(), %error, "permission check degraded: assignment lookup failed");
                return Verdict::ServiceUnavailable;
            }
        };

        let catalog = self.service.catalog();
        if required
            .iter()
            .any(|permission| has_permission(catalog, &assignments, *permission))
        {
            Verdict::Allowed
        } else {
            Verdict::Denied
        }
    }

    /// Checks whether the identity holds any of the candidate role
    /// types, ignoring the primary flag. An empty candidate list
    /// denies.
    pub async fn require_role(
        &self,
        identity: Option<&UserIdentity>,
        required: &[RoleType],
    ) -> Verdict {
        let Some(identity) = identity else {
            return Verdict::Unauthenticated;
        };

        let assignments = match self.service.active_roles(identity.user_id()).await {
            Ok(assignments) => assignments,
            Err(error) => {
                warn!(user_id = %identity.user_id(), %error, "role check degraded: assignment lookup failed");
                return Verdict::ServiceUnavailable;
            }
        };

        if required
            .iter()
            .any(|role_type| has_role(&assignments, *role_type))
        {
            Verdict::Allowed
        } else {
            Verdict::Denied
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use tradecore_core::{AppError, AppResult, UserId, UserIdentity};
    use tradecore_domain::{Permission, RoleAssignment, RoleCatalog, RoleType};
    use uuid::Uuid;

    use crate::ports::{AuditEvent, AuditRepository, RoleAssignmentRepository};
    use crate::role_assignment_service::RoleAssignmentService;

    use super::{AuthorizationGate, Verdict};

    struct FixedRoleAssignmentRepository {
        assignments: Vec<RoleAssignment>,
        unavailable: bool,
        read_calls: AtomicUsize,
    }

    impl FixedRoleAssignmentRepository {
        fn with_roles(user_id: UserId, role_types: &[RoleType]) -> Self {
            Self {
                assignments: role_types
                    .iter()
                    .map(|role_type| RoleAssignment {
                        id: Uuid::new_v4(),
                        user_id,
                        role_type: *role_type,
                        is_primary: false,
                        is_active: true,
                        assigned_at: Utc::now(),
                    })
                    .collect(),
                unavailable: false,
                read_calls: AtomicUsize::new(0),
            }
        }

        fn unavailable() -> Self {
            Self {
                assignments: Vec::new(),
                unavailable: true,
                read_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl RoleAssignmentRepository for FixedRoleAssignmentRepository {
        async fn upsert_active(
            &self,
            _user_id: UserId,
            _role_type: RoleType,
            _is_primary: bool,
            _now: DateTime<Utc>,
        ) -> AppResult<RoleAssignment> {
            Err(AppError::Internal("read-only fixture".to_owned()))
        }

        async fn deactivate(&self, _user_id: UserId, _role_type: RoleType) -> AppResult<bool> {
            Err(AppError::Internal("read-only fixture".to_owned()))
        }

        async fn list_active(&self, user_id: UserId) -> AppResult<Vec<RoleAssignment>> {
            self.read_calls.fetch_add(1, Ordering::SeqCst);
            if self.unavailable {
                return Err(AppError::Unavailable("connection refused".to_owned()));
            }
            Ok(self
                .assignments
                .iter()
                .filter(|assignment| assignment.user_id == user_id)
                .cloned()
                .collect())
        }

        async fn find(
            &self,
            _user_id: UserId,
            _role_type: RoleType,
        ) -> AppResult<Option<RoleAssignment>> {
            Ok(None)
        }
    }

    #[derive(Default)]
    struct NullAuditRepository;

    #[async_trait]
    impl AuditRepository for NullAuditRepository {
        async fn append_event(&self, _event: AuditEvent) -> AppResult<()> {
            Ok(())
        }
    }

    fn gate(repository: Arc<FixedRoleAssignmentRepository>) -> AuthorizationGate {
        AuthorizationGate::new(RoleAssignmentService::new(
            Arc::new(RoleCatalog::standard()),
            repository,
            Arc::new(NullAuditRepository),
        ))
    }

    fn identity(user_id: UserId) -> UserIdentity {
        UserIdentity::new(user_id, "alice", None)
    }

    #[tokio::test]
    async fn missing_identity_is_unauthenticated() {
        let user_id = UserId::new();
        let gate = gate(Arc::new(FixedRoleAssignmentRepository::with_roles(
            user_id,
            &[RoleType::Admin],
        )));

        let verdict = gate
            .require_permission(None, &[Permission::AdminRoleManage])
            .await;
        assert_eq!(verdict, Verdict::Unauthenticated);
    }

    #[tokio::test]
    async fn empty_candidate_list_denies() {
        let user_id = UserId::new();
        let gate = gate(Arc::new(FixedRoleAssignmentRepository::with_roles(
            user_id,
            &[RoleType::Admin],
        )));

        let verdict = gate.require_permission(Some(&identity(user_id)), &[]).await;
        assert_eq!(verdict, Verdict::Denied);
    }

    #[tokio::test]
    async fn any_matching_permission_allows() {
        let user_id = UserId::new();
        let gate = gate(Arc::new(FixedRoleAssignmentRepository::with_roles(
            user_id,
            &[RoleType::Moderator],
        )));

        let verdict = gate
            .require_permission(
                Some(&identity(user_id)),
                &[
                    Permission::AdminRoleManage,
                    Permission::ModerationReportResolve,
                ],
            )
            .await;
        assert_eq!(verdict, Verdict::Allowed);
    }

    #[tokio::test]
    async fn no_matching_role_denies() {
        let user_id = UserId::new();
        let gate = gate(Arc::new(FixedRoleAssignmentRepository::with_roles(
            user_id,
            &[RoleType::User],
        )));

        let verdict = gate
            .require_role(
                Some(&identity(user_id)),
                &[RoleType::Admin, RoleType::Moderator],
            )
            .await;
        assert_eq!(verdict, Verdict::Denied);
    }

    #[tokio::test]
    async fn unreachable_store_is_service_unavailable_not_denied() {
        let user_id = UserId::new();
        let gate = gate(Arc::new(FixedRoleAssignmentRepository::unavailable()));

        let verdict = gate
            .require_permission(Some(&identity(user_id)), &[Permission::FeedRead])
            .await;
        assert_eq!(verdict, Verdict::ServiceUnavailable);
    }

    #[tokio::test]
    async fn check_performs_one_lookup_regardless_of_list_length() {
        let user_id = UserId::new();
        let repository = Arc::new(FixedRoleAssignmentRepository::with_roles(
            user_id,
            &[RoleType::User],
        ));
        let gate = gate(repository.clone());

        let verdict = gate
            .require_permission(
                Some(&identity(user_id)),
                &[
                    Permission::AdminRoleManage,
                    Permission::AdminUserManage,
                    Permission::ModerationUserSuspend,
                    Permission::FeedRead,
                ],
            )
            .await;
        assert_eq!(verdict, Verdict::Allowed);
        assert_eq!(repository.read_calls.load(Ordering::SeqCst), 1);
    }
}
