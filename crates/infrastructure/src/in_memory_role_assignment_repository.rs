use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tradecore_application::RoleAssignmentRepository;
use tradecore_core::{AppResult, UserId};
use tradecore_domain::{RoleAssignment, RoleType};
use uuid::Uuid;

/// In-memory role assignment repository.
///
/// One map entry per user: the entry guard scopes the
/// demote-and-upsert step to that user's slots, so writes for the same
/// user serialize against each other while writes for different users
/// land on different entries and never share a lock. Reads clone out
/// of a shard read guard.
#[derive(Debug, Default)]
pub struct InMemoryRoleAssignmentRepository {
    assignments: DashMap<UserId, Vec<RoleAssignment>>,
}

impl InMemoryRoleAssignmentRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            assignments: DashMap::new(),
        }
    }
}

#[async_trait]
impl RoleAssignmentRepository for InMemoryRoleAssignmentRepository {
    async fn upsert_active(
        &self,
        user_id: UserId,
        role_type: RoleType,
        is_primary: bool,
        now: DateTime<Utc>,
    ) -> AppResult<RoleAssignment> {
        let mut slots = self.assignments.entry(user_id).or_default();

        if is_primary {
            for slot in slots.iter_mut() {
                if slot.is_active && slot.role_type != role_type {
                    slot.is_primary = false;
                }
            }
        }

        if let Some(slot) = slots.iter_mut().find(|slot| slot.role_type == role_type) {
            // Reactivation keeps the original assignment time.
            slot.is_active = true;
            slot.is_primary = is_primary;
            return Ok(slot.clone());
        }

        let assignment = RoleAssignment {
            id: Uuid::new_v4(),
            user_id,
            role_type,
            is_primary,
            is_active: true,
            assigned_at: now,
        };
        slots.push(assignment.clone());
        Ok(assignment)
    }

    async fn deactivate(&self, user_id: UserId, role_type: RoleType) -> AppResult<bool> {
        let Some(mut slots) = self.assignments.get_mut(&user_id) else {
            return Ok(false);
        };

        match slots
            .iter_mut()
            .find(|slot| slot.role_type == role_type && slot.is_active)
        {
            Some(slot) => {
                slot.is_active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_active(&self, user_id: UserId) -> AppResult<Vec<RoleAssignment>> {
        Ok(self
            .assignments
            .get(&user_id)
            .map(|slots| {
                slots
                    .iter()
                    .filter(|slot| slot.is_active)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find(
        &self,
        user_id: UserId,
        role_type: RoleType,
    ) -> AppResult<Option<RoleAssignment>> {
        Ok(self.assignments.get(&user_id).and_then(|slots| {
            slots
                .iter()
                .find(|slot| slot.role_type == role_type)
                .cloned()
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};
    use tradecore_application::RoleAssignmentRepository;
    use tradecore_core::UserId;
    use tradecore_domain::RoleType;

    use super::InMemoryRoleAssignmentRepository;

    #[tokio::test]
    async fn upsert_creates_then_reactivates_one_row() {
        let repository = InMemoryRoleAssignmentRepository::new();
        let user_id = UserId::new();
        let first_assigned_at = Utc::now() - Duration::days(30);

        let created = repository
            .upsert_active(user_id, RoleType::Plumber, false, first_assigned_at)
            .await;
        assert!(created.is_ok());

        let removed = repository.deactivate(user_id, RoleType::Plumber).await;
        assert_eq!(removed.ok(), Some(true));

        let reactivated = repository
            .upsert_active(user_id, RoleType::Plumber, true, Utc::now())
            .await;
        let Ok(reactivated) = reactivated else {
            panic!("reactivation failed");
        };
        assert!(reactivated.is_active);
        assert!(reactivated.is_primary);
        // Reactivation is not a fresh assignment.
        assert_eq!(reactivated.assigned_at, first_assigned_at);

        let row = repository.find(user_id, RoleType::Plumber).await;
        assert_eq!(row.ok().flatten().map(|r| r.id), Some(reactivated.id));
    }

    #[tokio::test]
    async fn deactivate_without_active_row_returns_false() {
        let repository = InMemoryRoleAssignmentRepository::new();
        let user_id = UserId::new();

        let removed = repository.deactivate(user_id, RoleType::Mason).await;
        assert_eq!(removed.ok(), Some(false));

        let created = repository
            .upsert_active(user_id, RoleType::Mason, false, Utc::now())
            .await;
        assert!(created.is_ok());
        let first = repository.deactivate(user_id, RoleType::Mason).await;
        let second = repository.deactivate(user_id, RoleType::Mason).await;
        assert_eq!(first.ok(), Some(true));
        assert_eq!(second.ok(), Some(false));
    }

    #[tokio::test]
    async fn deactivated_rows_are_retained_but_not_listed() {
        let repository = InMemoryRoleAssignmentRepository::new();
        let user_id = UserId::new();

        let created = repository
            .upsert_active(user_id, RoleType::Roofer, true, Utc::now())
            .await;
        assert!(created.is_ok());
        let removed = repository.deactivate(user_id, RoleType::Roofer).await;
        assert_eq!(removed.ok(), Some(true));

        let active = repository.list_active(user_id).await;
        assert_eq!(active.ok().map(|rows| rows.len()), Some(0));

        let retained = repository.find(user_id, RoleType::Roofer).await;
        assert!(retained.ok().flatten().is_some_and(|row| !row.is_active));
    }

    #[tokio::test]
    async fn concurrent_primary_assigns_leave_exactly_one_primary() {
        let repository = Arc::new(InMemoryRoleAssignmentRepository::new());
        let user_id = UserId::new();

        let first = {
            let repository = repository.clone();
            tokio::spawn(async move {
                repository
                    .upsert_active(user_id, RoleType::Plumber, true, Utc::now())
                    .await
            })
        };
        let second = {
            let repository = repository.clone();
            tokio::spawn(async move {
                repository
                    .upsert_active(user_id, RoleType::Electrician, true, Utc::now())
                    .await
            })
        };

        let (first, second) = tokio::join!(first, second);
        assert!(first.is_ok_and(|result| result.is_ok()));
        assert!(second.is_ok_and(|result| result.is_ok()));

        let active = repository.list_active(user_id).await.unwrap_or_default();
        let primaries = active.iter().filter(|row| row.is_primary).count();
        assert_eq!(active.len(), 2);
        assert_eq!(primaries, 1);
    }

    #[tokio::test]
    async fn writes_for_different_users_do_not_interfere() {
        let repository = InMemoryRoleAssignmentRepository::new();
        let first_user = UserId::new();
        let second_user = UserId::new();

        let first = repository
            .upsert_active(first_user, RoleType::Admin, true, Utc::now())
            .await;
        let second = repository
            .upsert_active(second_user, RoleType::Admin, true, Utc::now())
            .await;
        assert!(first.is_ok());
        assert!(second.is_ok());

        let first_active = repository.list_active(first_user).await.unwrap_or_default();
        let second_active = repository
            .list_active(second_user)
            .await
            .unwrap_or_default();
        assert!(first_active.iter().all(|row| row.is_primary));
        assert!(second_active.iter().all(|row| row.is_primary));
    }
}
