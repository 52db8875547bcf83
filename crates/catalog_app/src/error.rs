//! Application error handling

use thiserror::Error;

use core_kernel::{AccessError, CoreError, Role};
use domain_catalog::CatalogError;
use domain_fraud::FraudError;
use infra_db::DatabaseError;

/// Errors returned by the application facade
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or unknown API key
    #[error("Unauthorized")]
    Unauthorized,

    /// The caller's role lacks the permission
    #[error("Forbidden for role: {0}")]
    Forbidden(Role),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Fraud(#[from] FraudError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn config(message: impl Into<String>) -> Self {
        AppError::Config(message.into())
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AppError::Unauthorized)
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, AppError::Forbidden(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::Catalog(e) if e.is_not_found())
    }

    pub fn is_validation(&self) -> bool {
        match self {
            AppError::Catalog(e) => e.is_validation(),
            AppError::Fraud(e) => e.is_validation(),
            _ => false,
        }
    }
}

impl From<AccessError> for AppError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::Unauthorized => AppError::Unauthorized,
            AccessError::Forbidden(role) => AppError::Forbidden(role),
        }
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}
