//! Infrastructure Database Layer
//!
//! PostgreSQL storage for the asset catalog, lineage edges and scored
//! claims, built on SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern. Repositories own the SQL and
//! return row types; adapters implement the domain ports on top of them and
//! translate rows and errors into domain types.
//!
//! ```text
//! CatalogPort    <- PostgresCatalogAdapter <- AssetRepository, LineageRepository
//! ClaimStorePort <- PostgresClaimStore     <- ScoredClaimRepository
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresCatalogAdapter};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/catalog")).await?;
//! run_migrations(&pool).await?;
//! let catalog = PostgresCatalogAdapter::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{create_pool, run_migrations, DatabaseConfig, SCHEMA};
pub use error::DatabaseError;
pub use adapters::{PostgresCatalogAdapter, PostgresClaimStore};
