//! Pool creation and schema installation

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{info, instrument};

use crate::error::DatabaseError;

/// Catalog schema, applied by [`run_migrations`]
pub const SCHEMA: &str = include_str!("../../../migrations/20250101_000001_catalog_schema.sql");

/// Pool settings for the catalog database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// How long a caller waits for a free connection
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            acquire_timeout: Duration::from_secs(30),
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    /// The URL with any password replaced, for logging
    pub fn redacted_url(&self) -> String {
        let Some((scheme, rest)) = self.url.split_once("://") else {
            return self.url.clone();
        };
        match rest.split_once('@') {
            Some((credentials, host)) => {
                let user = credentials.split(':').next().unwrap_or_default();
                format!("{scheme}://{user}:***@{host}")
            }
            None => self.url.clone(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::new("postgres://localhost/catalog")
    }
}

/// Opens a connection pool
///
/// # Errors
///
/// Returns `DatabaseError::ConnectionFailed` if no connection can be made
#[instrument(skip(config), fields(url = %config.redacted_url(), max = config.max_connections))]
pub async fn create_pool(config: DatabaseConfig) -> Result<PgPool, DatabaseError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.url)
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    info!("Database pool ready");
    Ok(pool)
}

/// Installs the catalog schema; safe to run repeatedly
pub async fn run_migrations(pool: &PgPool) -> Result<(), DatabaseError> {
    sqlx::raw_sql(SCHEMA)
        .execute(pool)
        .await
        .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
    info!("Catalog schema is up to date");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = DatabaseConfig::new("postgres://test")
            .max_connections(50)
            .acquire_timeout(Duration::from_secs(5));

        assert_eq!(config.max_connections, 50);
        assert_eq!(config.acquire_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_default_targets_catalog_database() {
        assert!(DatabaseConfig::default().url.ends_with("/catalog"));
    }

    #[test]
    fn test_redacted_url_hides_password() {
        let config = DatabaseConfig::new("postgres://app:s3cret@db:5432/catalog");
        assert_eq!(config.redacted_url(), "postgres://app:***@db:5432/catalog");

        let bare = DatabaseConfig::new("postgres://localhost/catalog");
        assert_eq!(bare.redacted_url(), "postgres://localhost/catalog");
    }

    #[test]
    fn test_schema_creates_every_table() {
        for table in ["assets", "tags", "asset_tags", "lineage_edges", "scored_claims"] {
            assert!(
                SCHEMA.contains(&format!("CREATE TABLE IF NOT EXISTS {table}")),
                "missing table {table}"
            );
        }
    }
}
