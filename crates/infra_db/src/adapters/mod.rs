//! PostgreSQL implementations of the catalog and claim store ports.
//!
//! Adapters own the conversion between domain records and the row types of
//! the repository layer; SQL lives in the repositories only.

pub mod catalog;
pub mod claims;

pub use catalog::PostgresCatalogAdapter;
pub use claims::PostgresClaimStore;

use std::time::Instant;

use sqlx::PgPool;

use core_kernel::HealthCheckResult;

/// Probes the pool with `SELECT 1`
pub(crate) async fn probe(pool: &PgPool, adapter_id: &str) -> HealthCheckResult {
    let start = Instant::now();
    let result = sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await;

    match result {
        Ok(_) => HealthCheckResult::healthy(adapter_id, start.elapsed()),
        Err(e) => HealthCheckResult::unhealthy(
            adapter_id,
            start.elapsed(),
            format!("Database error: {e}"),
        ),
    }
}
