//! Store port contracts
//!
//! The catalog and claim stores are reached through port traits declared in
//! their domain crates (`CatalogPort`, `ClaimStorePort`). Those traits build
//! on the two markers here and report failures as [`PortError`], so the
//! PostgreSQL adapters in `infra_db` and the in-memory stores behind the
//! `mock` feature are interchangeable.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Failure of a store operation
#[derive(Debug, Error)]
pub enum PortError {
    #[error("Not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// Duplicate tag name, or a record stored twice
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// The store could not be reached; retrying may succeed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },
}

impl PortError {
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Validation failure pinned to one request field
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            source: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Marker for store ports shared across async tasks
pub trait DomainPort: Send + Sync + 'static {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterHealth {
    Healthy,
    Unhealthy,
}

/// Outcome of probing one store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    pub adapter_id: String,
    pub status: AdapterHealth,
    pub latency_ms: u64,
    /// Why the store is unhealthy
    pub message: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl HealthCheckResult {
    pub fn healthy(adapter_id: impl Into<String>, latency: Duration) -> Self {
        Self {
            adapter_id: adapter_id.into(),
            status: AdapterHealth::Healthy,
            latency_ms: latency.as_millis().try_into().unwrap_or(u64::MAX),
            message: None,
            checked_at: Utc::now(),
        }
    }

    pub fn unhealthy(
        adapter_id: impl Into<String>,
        latency: Duration,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status: AdapterHealth::Unhealthy,
            message: Some(message.into()),
            ..Self::healthy(adapter_id, latency)
        }
    }

    /// Result for stores with nothing to probe
    pub fn always_healthy(adapter_id: impl Into<String>) -> Self {
        Self::healthy(adapter_id, Duration::ZERO)
    }

    pub fn is_healthy(&self) -> bool {
        self.status == AdapterHealth::Healthy
    }
}

#[async_trait::async_trait]
pub trait HealthCheckable: Send + Sync {
    async fn health_check(&self) -> HealthCheckResult;
}
