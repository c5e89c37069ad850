use std::env;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tradecore_core::{AppError, AppResult};

/// Environment-driven configuration for the durable assignment store.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Upper bound for pooled connections.
    pub max_connections: u32,
}

impl StorageConfig {
    /// Loads storage settings from the environment.
    ///
    /// `DATABASE_URL` is required; `DATABASE_MAX_CONNECTIONS` defaults
    /// to 5.
    pub fn load() -> AppResult<Self> {
        let database_url = required_env("DATABASE_URL")?;
        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(5);

        Ok(Self {
            database_url,
            max_connections,
        })
    }

    /// Opens a connection pool against the configured database.
    pub async fn connect(&self) -> AppResult<PgPool> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .connect(self.database_url.as_str())
            .await
            .map_err(|error| {
                AppError::Unavailable(format!("failed to connect to database: {error}"))
            })
    }
}

fn required_env(name: &str) -> AppResult<String> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} must be set")))
}
