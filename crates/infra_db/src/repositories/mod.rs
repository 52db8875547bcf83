//! Repository implementations
//!
//! Repositories own the SQL for one table group and return plain row types.
//! Queries are checked at runtime (`sqlx::query_as` with `bind`) so the crate
//! builds without a live database.
//!
//! Multi-statement writes run in a single transaction; lineage inserts lock
//! both endpoint asset rows before inserting.

pub mod assets;
pub mod lineage;
pub mod claims;

pub use assets::{AssetRepository, AssetRow, TagRow};
pub use lineage::{LineageRepository, EdgeRow};
pub use claims::{ScoredClaimRepository, ScoredClaimRow};
