use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::debug;

use tradecore_application::RoleAssignmentRepository;
use tradecore_core::{AppError, AppResult, UserId};
use tradecore_domain::{RoleAssignment, RoleType};
use uuid::Uuid;

/// PostgreSQL-backed role assignment repository.
///
/// Every write runs in one transaction holding an advisory lock keyed
/// by the user id, so same-user writers serialize while different
/// users never contend. Reads are plain snapshot selects.
#[derive(Clone)]
pub struct PostgresRoleAssignmentRepository {
    pool: PgPool,
}

impl PostgresRoleAssignmentRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RoleAssignmentRow {
    id: Uuid,
    user_id: Uuid,
    role_type: String,
    is_primary: bool,
    is_active: bool,
    assigned_at: DateTime<Utc>,
}

impl RoleAssignmentRow {
    fn into_assignment(self) -> AppResult<RoleAssignment> {
        let role_type = RoleType::from_str(self.role_type.as_str()).map_err(|_| {
            AppError::Internal(format!(
                "stored role type '{}' is not in the catalog",
                self.role_type
            ))
        })?;

        Ok(RoleAssignment {
            id: self.id,
            user_id: UserId::from_uuid(self.user_id),
            role_type,
            is_primary: self.is_primary,
            is_active: self.is_active,
            assigned_at: self.assigned_at,
        })
    }
}

#[async_trait]
impl RoleAssignmentRepository for PostgresRoleAssignmentRepository {
    async fn upsert_active(
        &self,
        user_id: UserId,
        role_type: RoleType,
        is_primary: bool,
        now: DateTime<Utc>,
    ) -> AppResult<RoleAssignment> {
        let mut transaction = self
            .pool
            .begin()
            .await
            .map_err(|error| map_storage_error("failed to begin transaction", error))?;

        // Serializes same-user writers; different users hash to
        // different lock keys and never contend.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1::text, 0))")
            .bind(user_id.as_uuid())
            .execute(&mut *transaction)
            .await
            .map_err(|error| map_storage_error("failed to take user write lock", error))?;

        if is_primary {
            sqlx::query(
                r#"
                UPDATE role_assignments
                SET is_primary = FALSE
                WHERE user_id = $1
                    AND is_active
                    AND is_primary
                    AND role_type <> $2
                "#,
            )
            .bind(user_id.as_uuid())
            .bind(role_type.as_str())
            .execute(&mut *transaction)
            .await
            .map_err(|error| map_storage_error("failed to demote previous primary", error))?;
        }

        // `assigned_at` is only written on first insert; reactivation
        // keeps the original assignment time.
        let row = sqlx::query_as::<_, RoleAssignmentRow>(
            r#"
            INSERT INTO role_assignments (id, user_id, role_type, is_primary, is_active, assigned_at)
            VALUES ($1, $2, $3, $4, TRUE, $5)
            ON CONFLICT (user_id, role_type)
            DO UPDATE SET is_active = TRUE, is_primary = EXCLUDED.is_primary
            RETURNING id, user_id, role_type, is_primary, is_active, assigned_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id.as_uuid())
        .bind(role_type.as_str())
        .bind(is_primary)
        .bind(now)
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| map_storage_error("failed to upsert role assignment", error))?;

        transaction
            .commit()
            .await
            .map_err(|error| map_storage_error("failed to commit transaction", error))?;

        debug!(%user_id, role_type = role_type.as_str(), is_primary, "role assignment upserted");
        row.into_assignment()
    }

    async fn deactivate(&self, user_id: UserId, role_type: RoleType) -> AppResult<bool> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE role_assignments
            SET is_active = FALSE
            WHERE user_id = $1
                AND role_type = $2
                AND is_active
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(role_type.as_str())
        .execute(&self.pool)
        .await
        .map_err(|error| map_storage_error("failed to deactivate role assignment", error))?
        .rows_affected();

        if rows_affected > 0 {
            debug!(%user_id, role_type = role_type.as_str(), "role assignment deactivated");
        }

        Ok(rows_affected > 0)
    }

    async fn list_active(&self, user_id: UserId) -> AppResult<Vec<RoleAssignment>> {
        let rows = sqlx::query_as::<_, RoleAssignmentRow>(
            r#"
            SELECT id, user_id, role_type, is_primary, is_active, assigned_at
            FROM role_assignments
            WHERE user_id = $1
                AND is_active
            ORDER BY assigned_at, role_type
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| map_storage_error("failed to list active assignments", error))?;

        rows.into_iter()
            .map(RoleAssignmentRow::into_assignment)
            .collect()
    }

    async fn find(
        &self,
        user_id: UserId,
        role_type: RoleType,
    ) -> AppResult<Option<RoleAssignment>> {
        let row = sqlx::query_as::<_, RoleAssignmentRow>(
            r#"
            SELECT id, user_id, role_type, is_primary, is_active, assigned_at
            FROM role_assignments
            WHERE user_id = $1
                AND role_type = $2
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(role_type.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_storage_error("failed to find assignment", error))?;

        row.map(RoleAssignmentRow::into_assignment).transpose()
    }
}

fn map_storage_error(context: &str, error: sqlx::Error) -> AppError {
    match &error {
        sqlx::Error::Database(database_error) => match database_error.code().as_deref() {
            // serialization_failure / deadlock_detected: transient,
            // the caller may retry.
            Some("40001" | "40P01") => AppError::Conflict(format!("{context}: {error}")),
            _ => AppError::Internal(format!("{context}: {error}")),
        },
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            AppError::Unavailable(format!("{context}: {error}"))
        }
        _ => AppError::Internal(format!("{context}: {error}")),
    }
}

#[cfg(test)]
mod tests;
