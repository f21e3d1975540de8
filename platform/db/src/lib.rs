//! Database primitives shared by the server and the HR product slice.

use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use thiserror::Error;
use tracing::debug;

/// Shared connection pool alias.
pub type DbPool = DatabaseConnection;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database url missing (set {0})")]
    MissingUrl(String),
    #[error("failed to connect to database: {0}")]
    Connect(#[from] DbErr),
}

pub type DbResult<T> = Result<T, DbError>;

/// Environment-driven connection settings.
#[derive(Clone, Debug)]
pub struct DatabaseSettings {
    env_key: String,
    url: Option<String>,
    max_connections: u32,
}

fn default_url_key() -> String {
    "DATABASE_URL".to_string()
}

fn default_max_connections() -> u32 {
    10
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            env_key: default_url_key(),
            url: None,
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseSettings {
    pub fn new(env_key: impl Into<String>) -> Self {
        Self {
            env_key: env_key.into(),
            ..Self::default()
        }
    }

    /// Settings read from `DATABASE_URL` and `DATABASE_MAX_CONNECTIONS`.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        settings.url = std::env::var(&settings.env_key).ok();
        if let Some(max) = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|raw| raw.parse::<u32>().ok())
        {
            settings.max_connections = max;
        }
        settings
    }

    /// Settings pinned to an explicit url, bypassing the environment.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn database_url(&self) -> DbResult<String> {
        match &self.url {
            Some(url) if !url.trim().is_empty() => Ok(url.clone()),
            _ => std::env::var(&self.env_key).map_err(|_| DbError::MissingUrl(self.env_key.clone())),
        }
    }
}

/// Open a pool for the configured database.
pub async fn connect(settings: &DatabaseSettings) -> DbResult<DbPool> {
    let url = settings.database_url()?;
    // Every SQLite in-memory connection is its own database.
    let in_memory = url.contains(":memory:");
    let mut options = ConnectOptions::new(url);
    options
        .max_connections(if in_memory { 1 } else { settings.max_connections })
        .min_connections(if in_memory { 1 } else { 0 })
        .connect_timeout(Duration::from_secs(8))
        .sqlx_logging(false);
    let pool = Database::connect(options).await?;
    debug!(backend = ?pool.get_database_backend(), "database pool ready");
    Ok(pool)
}

/// Round-trip a trivial statement; used by the health endpoint.
pub async fn ping(pool: &DbPool) -> bool {
    let backend = pool.get_database_backend();
    pool.execute(Statement::from_string(backend, "SELECT 1".to_string()))
        .await
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_url_wins_over_environment() {
        let settings = DatabaseSettings::with_url("sqlite::memory:");
        assert_eq!(settings.database_url().unwrap(), "sqlite::memory:");
    }

    #[test]
    fn missing_url_names_the_variable() {
        let settings = DatabaseSettings::new("EMPLOYEES_TEST_UNSET_DATABASE_URL");
        let err = settings.database_url().unwrap_err();
        assert!(err.to_string().contains("EMPLOYEES_TEST_UNSET_DATABASE_URL"));
    }

    #[tokio::test]
    async fn connects_and_pings_sqlite() {
        let pool = connect(&DatabaseSettings::with_url("sqlite::memory:"))
            .await
            .unwrap();
        assert!(ping(&pool).await);
    }
}
