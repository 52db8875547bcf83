//! Repository errors
//!
//! PostgreSQL failures are classified by SQLSTATE so adapters can tell a
//! taken tag name or a vanished lineage endpoint from an outage. Anything
//! unclassified keeps the original `sqlx::Error` as its source.

use std::fmt;

use core_kernel::PortError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("{entity} with id '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    /// Unique violation (23505)
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    /// Foreign key violation (23503)
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check violation (23514)
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Serialization failure or deadlock (40001, 40P01)
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// A stored value that does not map back to a domain value
    #[error("Corrupt row: {0}")]
    CorruptRow(String),

    #[error("SQL error: {0}")]
    Sql(#[source] sqlx::Error),
}

impl DatabaseError {
    pub fn not_found(entity: &'static str, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn duplicate(entity: &str, field: &str, value: impl fmt::Display) -> Self {
        Self::DuplicateEntry(format!("{entity} with {field} '{value}' already exists"))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// True when retrying against a healthy database may succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_) | Self::PoolExhausted | Self::TransactionFailed(_)
        )
    }
}

/// Maps the errors adapters react to; `None` for everything else
fn classify(error: &sqlx::Error) -> Option<DatabaseError> {
    match error {
        sqlx::Error::PoolTimedOut => Some(DatabaseError::PoolExhausted),
        sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
            Some(DatabaseError::ConnectionFailed(error.to_string()))
        }
        sqlx::Error::Database(db_err) => {
            let message = db_err.message().to_string();
            match db_err.code().as_deref()? {
                "23505" => Some(DatabaseError::DuplicateEntry(message)),
                "23503" => Some(DatabaseError::ForeignKeyViolation(message)),
                "23514" => Some(DatabaseError::ConstraintViolation(message)),
                "40001" | "40P01" => Some(DatabaseError::TransactionFailed(message)),
                _ => None,
            }
        }
        _ => None,
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        classify(&error).unwrap_or(DatabaseError::Sql(error))
    }
}

impl From<DatabaseError> for PortError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::NotFound { entity, id } => PortError::not_found(entity, id),
            DatabaseError::DuplicateEntry(message) | DatabaseError::ForeignKeyViolation(message) => {
                PortError::conflict(message)
            }
            DatabaseError::ConstraintViolation(message) => PortError::validation(message),
            transient if transient.is_transient() => PortError::Connection {
                message: transient.to_string(),
                source: Some(Box::new(transient)),
            },
            other => PortError::Internal {
                message: other.to_string(),
                source: Some(Box::new(other)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_port_not_found() {
        let port: PortError = DatabaseError::not_found("Asset", "AST-1").into();
        assert!(port.is_not_found());
        assert!(port.to_string().contains("AST-1"));
    }

    #[test]
    fn test_duplicate_maps_to_conflict() {
        let error = DatabaseError::duplicate("Tag", "name", "PII");
        assert_eq!(error.to_string(), "Duplicate entry: Tag with name 'PII' already exists");

        let port: PortError = error.into();
        assert!(port.is_conflict());
    }

    #[test]
    fn test_pool_errors_are_transient() {
        assert!(DatabaseError::from(sqlx::Error::PoolTimedOut).is_transient());

        let port: PortError = DatabaseError::PoolExhausted.into();
        assert!(port.is_transient());
    }

    #[test]
    fn test_row_not_found_is_unclassified() {
        let error = DatabaseError::from(sqlx::Error::RowNotFound);
        assert!(matches!(error, DatabaseError::Sql(_)));
        assert!(!error.is_not_found());

        let port: PortError = error.into();
        assert!(matches!(port, PortError::Internal { .. }));
    }

    #[test]
    fn test_corrupt_row_is_internal() {
        let port: PortError = DatabaseError::CorruptRow("asset AST-1: bad type".into()).into();
        assert!(!port.is_transient());
        assert!(port.to_string().contains("bad type"));
    }
}
