//! Core Kernel - Foundational types for the asset catalog and claim scoring system
//!
//! This crate provides the building blocks shared by every domain crate:
//! - Strongly-typed identifiers for catalog and claim records
//! - Port contracts (errors, health checks) for store adapters
//! - Caller roles and the access policy used to gate operations

pub mod identifiers;
pub mod error;
pub mod ports;
pub mod access;

pub use identifiers::{AssetId, TagId, LineageEdgeId, ScoredClaimId, UserId};
pub use error::CoreError;
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
};
pub use access::{AccessPolicy, AccessError, ApiKeyAccessPolicy, Permission, Principal, Role};
