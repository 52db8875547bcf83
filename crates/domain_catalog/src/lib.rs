//! Data Asset Catalog Domain
//!
//! This crate catalogs data assets (policy, claim, and reserve-model
//! datasets), the tags attached to them, and the directed lineage edges
//! between them.
//!
//! # Lineage
//!
//! Lineage is a directed multigraph. It is never loaded as a whole: every
//! query derives a radius-1 view around one asset from two indexed scans
//! (edges by source, edges by destination).
//!
//! ```text
//!   Policy_Master --feeds--> Claim_Intake_2025 --drives--> Reserve_Model_v1
//! ```

pub mod asset;
pub mod lineage;
pub mod ports;
pub mod services;
pub mod error;

pub use asset::{Asset, AssetType, Tag, CreateAssetRequest, UpdateAssetRequest, AssetQuery};
pub use lineage::{LineageEdge, NewLineageEdge, EdgeView, Neighborhood, LineageGraph, DEFAULT_RELATION};
pub use ports::CatalogPort;
pub use services::AssetService;
pub use error::CatalogError;
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::InMemoryCatalogPort;
