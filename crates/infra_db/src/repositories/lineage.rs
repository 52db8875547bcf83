//! Lineage edge repository

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use core_kernel::AssetId;

use crate::error::DatabaseError;

/// Lineage edge row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EdgeRow {
    pub edge_id: Uuid,
    pub source_id: Uuid,
    pub dest_id: Uuid,
    pub relation: String,
    pub created_at: DateTime<Utc>,
}

/// Repository for directed lineage edges
#[derive(Debug, Clone)]
pub struct LineageRepository {
    pool: PgPool,
}

impl LineageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Edges leaving `asset_id`, oldest first
    pub async fn find_by_source(&self, asset_id: Uuid) -> Result<Vec<EdgeRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, EdgeRow>(
            r#"
            SELECT edge_id, source_id, dest_id, relation, created_at
            FROM lineage_edges
            WHERE source_id = $1
            ORDER BY created_at, edge_id
            "#,
        )
        .bind(asset_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Edges entering `asset_id`, oldest first
    pub async fn find_by_dest(&self, asset_id: Uuid) -> Result<Vec<EdgeRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, EdgeRow>(
            r#"
            SELECT edge_id, source_id, dest_id, relation, created_at
            FROM lineage_edges
            WHERE dest_id = $1
            ORDER BY created_at, edge_id
            "#,
        )
        .bind(asset_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Inserts an edge once both endpoints are confirmed to exist.
    ///
    /// The endpoint rows are locked `FOR SHARE` inside the insert transaction,
    /// so a concurrent delete of either asset waits for this insert to finish
    /// or makes it fail.
    pub async fn insert(&self, edge: EdgeRow) -> Result<EdgeRow, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let present = sqlx::query_scalar::<_, Uuid>(
            "SELECT asset_id FROM assets WHERE asset_id = ANY($1) FOR SHARE",
        )
        .bind(vec![edge.source_id, edge.dest_id])
        .fetch_all(&mut *tx)
        .await?;

        for id in [edge.source_id, edge.dest_id] {
            if !present.contains(&id) {
                return Err(DatabaseError::not_found("Asset", AssetId::from(id)));
            }
        }

        let row = sqlx::query_as::<_, EdgeRow>(
            r#"
            INSERT INTO lineage_edges (edge_id, source_id, dest_id, relation, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING edge_id, source_id, dest_id, relation, created_at
            "#,
        )
        .bind(edge.edge_id)
        .bind(edge.source_id)
        .bind(edge.dest_id)
        .bind(&edge.relation)
        .bind(edge.created_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!(edge_id = %row.edge_id, "Lineage edge inserted");
        Ok(row)
    }

    /// Number of edges touching `asset_id` in either direction
    pub async fn count_touching(&self, asset_id: Uuid) -> Result<i64, DatabaseError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM lineage_edges WHERE source_id = $1 OR dest_id = $1",
        )
        .bind(asset_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
