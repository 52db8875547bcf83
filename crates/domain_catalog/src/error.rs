//! Catalog domain errors

use core_kernel::PortError;
use thiserror::Error;

/// Errors that can occur in the catalog domain
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Missing or malformed input; the caller can correct it
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("Tag already exists: {0}")]
    TagExists(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Underlying persistence failure
    #[error("Store error: {0}")]
    Store(#[source] PortError),
}

impl CatalogError {
    pub fn validation(message: impl Into<String>) -> Self {
        CatalogError::Validation(message.into())
    }

    pub fn not_found(entity: impl Into<String>, id: impl std::fmt::Display) -> Self {
        CatalogError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, CatalogError::Validation(_))
    }
}

impl From<PortError> for CatalogError {
    fn from(error: PortError) -> Self {
        match error {
            PortError::NotFound { entity_type, id } => CatalogError::NotFound {
                entity: entity_type,
                id,
            },
            PortError::Validation { message, .. } => CatalogError::Validation(message),
            PortError::Conflict { message } => CatalogError::Conflict(message),
            other => CatalogError::Store(other),
        }
    }
}

impl From<validator::ValidationErrors> for CatalogError {
    fn from(errors: validator::ValidationErrors) -> Self {
        CatalogError::Validation(errors.to_string())
    }
}
