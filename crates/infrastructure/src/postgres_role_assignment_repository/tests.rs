use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use tradecore_application::RoleAssignmentRepository;
use tradecore_core::UserId;
use tradecore_domain::RoleType;

use super::PostgresRoleAssignmentRepository;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(4)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for role assignment tests: {error}");
    }

    Some(pool)
}

#[tokio::test]
async fn upsert_then_list_roundtrip() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresRoleAssignmentRepository::new(pool);
    let user_id = UserId::new();

    let created = repository
        .upsert_active(user_id, RoleType::Plumber, true, chrono::Utc::now())
        .await;
    assert!(created.is_ok());

    let active = repository.list_active(user_id).await;
    let Ok(active) = active else {
        panic!("listing active assignments failed");
    };
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].role_type, RoleType::Plumber);
    assert!(active[0].is_primary);
}

#[tokio::test]
async fn reactivation_preserves_assigned_at() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresRoleAssignmentRepository::new(pool);
    let user_id = UserId::new();

    let first_assigned_at = chrono::Utc::now() - chrono::Duration::days(7);
    let created = repository
        .upsert_active(user_id, RoleType::Mason, false, first_assigned_at)
        .await;
    let Ok(created) = created else {
        panic!("initial upsert failed");
    };

    let removed = repository.deactivate(user_id, RoleType::Mason).await;
    assert_eq!(removed.ok(), Some(true));

    let reactivated = repository
        .upsert_active(user_id, RoleType::Mason, false, chrono::Utc::now())
        .await;
    let Ok(reactivated) = reactivated else {
        panic!("reactivation failed");
    };

    assert_eq!(reactivated.id, created.id);
    assert_eq!(
        reactivated.assigned_at.timestamp_micros(),
        created.assigned_at.timestamp_micros()
    );
}

#[tokio::test]
async fn primary_assignment_demotes_previous_primary() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresRoleAssignmentRepository::new(pool);
    let user_id = UserId::new();

    let plumber = repository
        .upsert_active(user_id, RoleType::Plumber, true, chrono::Utc::now())
        .await;
    let admin = repository
        .upsert_active(user_id, RoleType::Admin, true, chrono::Utc::now())
        .await;
    assert!(plumber.is_ok());
    assert!(admin.is_ok());

    let active = repository.list_active(user_id).await;
    let Ok(active) = active else {
        panic!("listing active assignments failed");
    };
    assert_eq!(active.len(), 2);
    let primaries: Vec<_> = active.iter().filter(|row| row.is_primary).collect();
    assert_eq!(primaries.len(), 1);
    assert_eq!(primaries[0].role_type, RoleType::Admin);
}

#[tokio::test]
async fn deactivate_missing_row_returns_false() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresRoleAssignmentRepository::new(pool);
    let user_id = UserId::new();

    let removed = repository.deactivate(user_id, RoleType::Tiler).await;
    assert_eq!(removed.ok(), Some(false));
}
