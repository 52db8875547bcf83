//! Application configuration
//!
//! Values come from `CATALOG_*` environment variables, after an optional
//! `.env` file has been loaded. Every field has a default, so an empty
//! environment yields a runnable in-memory configuration.

use rust_decimal::Decimal;
use serde::Deserialize;

use domain_fraud::ScoringConfig;
use infra_db::DatabaseConfig;

use crate::error::AppError;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// PostgreSQL connection string; the in-memory stores are used when unset
    pub database_url: Option<String>,
    /// Maximum pool connections
    pub max_connections: u32,
    /// Log filter directive: trace, debug, info, warn, error
    pub log_level: String,
    /// Emit JSON log lines instead of plain text
    pub log_json: bool,
    /// Score at or above which a claim is suspicious
    pub fraud_threshold: Decimal,
    /// Load the demo catalog on start
    pub seed_demo: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let scoring = ScoringConfig::default();
        Self {
            database_url: None,
            max_connections: 10,
            log_level: "info".to_string(),
            log_json: false,
            fraud_threshold: scoring.threshold,
            seed_demo: true,
        }
    }
}

impl AppConfig {
    /// Loads configuration from `.env` and the environment
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Loads configuration from `CATALOG_*` environment variables
    pub fn from_env() -> Result<Self, AppError> {
        let config: Self = config::Config::builder()
            .add_source(config::Environment::with_prefix("CATALOG"))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.max_connections == 0 {
            return Err(AppError::config("max_connections must be at least 1"));
        }
        if let Some(url) = &self.database_url {
            if url.trim().is_empty() {
                return Err(AppError::config("database_url must not be blank"));
            }
        }
        self.scoring().validate()?;
        Ok(())
    }

    /// Scoring thresholds derived from this configuration
    pub fn scoring(&self) -> ScoringConfig {
        ScoringConfig::default().with_threshold(self.fraud_threshold)
    }

    /// Pool settings, if a database is configured
    pub fn database(&self) -> Option<DatabaseConfig> {
        self.database_url
            .as_ref()
            .map(|url| DatabaseConfig::new(url.clone()).max_connections(self.max_connections))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert!(config.database_url.is_none());
        assert!(config.database().is_none());
        assert_eq!(config.fraud_threshold, dec!(60));
        assert!(config.seed_demo);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_threshold_out_of_range() {
        let config = AppConfig {
            fraud_threshold: dec!(150),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_database_settings() {
        let config = AppConfig {
            database_url: Some("postgres://localhost/catalog".to_string()),
            max_connections: 4,
            ..Default::default()
        };

        let db = config.database().unwrap();
        assert_eq!(db.url, "postgres://localhost/catalog");
        assert_eq!(db.max_connections, 4);
    }

    #[test]
    fn test_blank_database_url_rejected() {
        let config = AppConfig {
            database_url: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    proptest! {
        #[test]
        fn prop_threshold_within_max_score_is_valid(hundredths in -10_000i64..20_000) {
            let config = AppConfig {
                fraud_threshold: Decimal::new(hundredths, 2),
                ..Default::default()
            };
            let in_range = (0..=10_000).contains(&hundredths);
            prop_assert_eq!(config.validate().is_ok(), in_range);
        }
    }
}
