//! Asset and tag repository
//!
//! Assets are stored in `assets`, tags in `tags`, and the many-to-many link in
//! `asset_tags`. Reads aggregate tag names into a `text[]` column so an asset
//! and its tags come back in one row.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use tracing::debug;
use uuid::Uuid;

use core_kernel::AssetId;

use crate::error::DatabaseError;

const ASSET_SELECT: &str = r#"
    SELECT
        a.asset_id,
        a.name,
        a.asset_type,
        a.description,
        a.created_at,
        COALESCE(array_agg(t.name ORDER BY t.name) FILTER (WHERE t.name IS NOT NULL), '{}') AS tags
    FROM assets a
    LEFT JOIN asset_tags atg ON atg.asset_id = a.asset_id
    LEFT JOIN tags t ON t.tag_id = atg.tag_id
"#;

/// Asset row with its aggregated tag names
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AssetRow {
    pub asset_id: Uuid,
    pub name: String,
    pub asset_type: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub tags: Vec<String>,
}

/// Tag row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TagRow {
    pub tag_id: Uuid,
    pub name: String,
}

/// Data for inserting an asset
#[derive(Debug, Clone)]
pub struct NewAsset {
    pub asset_id: Uuid,
    pub name: String,
    pub asset_type: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub tags: Vec<String>,
}

/// Partial asset update; `None` leaves a column unchanged
#[derive(Debug, Clone, Default)]
pub struct AssetChanges {
    pub name: Option<String>,
    pub asset_type: Option<String>,
    pub description: Option<String>,
    /// Replaces the full tag set when present
    pub tags: Option<Vec<String>>,
}

/// Repository for assets and tags
#[derive(Debug, Clone)]
pub struct AssetRepository {
    pool: PgPool,
}

impl AssetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Retrieves an asset by its identifier
    pub async fn get(&self, asset_id: Uuid) -> Result<AssetRow, DatabaseError> {
        let sql = format!("{ASSET_SELECT} WHERE a.asset_id = $1 GROUP BY a.asset_id");

        sqlx::query_as::<_, AssetRow>(&sql)
            .bind(asset_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Asset", AssetId::from(asset_id)))
    }

    /// Retrieves the assets among `ids` that exist
    pub async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<AssetRow>, DatabaseError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "{ASSET_SELECT} WHERE a.asset_id = ANY($1) GROUP BY a.asset_id ORDER BY a.asset_id"
        );

        let rows = sqlx::query_as::<_, AssetRow>(&sql)
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn exists(&self, asset_id: Uuid) -> Result<bool, DatabaseError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM assets WHERE asset_id = $1)",
        )
        .bind(asset_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Lists assets, optionally filtered by type and by tag name
    pub async fn find(
        &self,
        asset_type: Option<&str>,
        tag: Option<&str>,
    ) -> Result<Vec<AssetRow>, DatabaseError> {
        let sql = format!(
            r#"{ASSET_SELECT}
            WHERE ($1::text IS NULL OR a.asset_type = $1)
              AND ($2::text IS NULL OR EXISTS (
                    SELECT 1
                    FROM asset_tags x
                    JOIN tags y ON y.tag_id = x.tag_id
                    WHERE x.asset_id = a.asset_id AND y.name = $2))
            GROUP BY a.asset_id
            ORDER BY a.asset_id"#
        );

        let rows = sqlx::query_as::<_, AssetRow>(&sql)
            .bind(asset_type)
            .bind(tag)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Inserts an asset and links its tags, creating unknown tags
    pub async fn insert(&self, asset: NewAsset) -> Result<AssetRow, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO assets (asset_id, name, asset_type, description, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(asset.asset_id)
        .bind(&asset.name)
        .bind(&asset.asset_type)
        .bind(&asset.description)
        .bind(asset.created_at)
        .execute(&mut *tx)
        .await?;

        link_tags(&mut tx, asset.asset_id, &asset.tags).await?;
        tx.commit().await?;

        debug!(asset_id = %asset.asset_id, tags = asset.tags.len(), "Asset inserted");
        self.get(asset.asset_id).await
    }

    /// Applies a partial update
    pub async fn update(
        &self,
        asset_id: Uuid,
        changes: AssetChanges,
    ) -> Result<AssetRow, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE assets
            SET name = COALESCE($2, name),
                asset_type = COALESCE($3, asset_type),
                description = COALESCE($4, description)
            WHERE asset_id = $1
            RETURNING asset_id
            "#,
        )
        .bind(asset_id)
        .bind(changes.name)
        .bind(changes.asset_type)
        .bind(changes.description)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            return Err(DatabaseError::not_found("Asset", AssetId::from(asset_id)));
        }

        if let Some(tags) = changes.tags {
            sqlx::query("DELETE FROM asset_tags WHERE asset_id = $1")
                .bind(asset_id)
                .execute(&mut *tx)
                .await?;
            link_tags(&mut tx, asset_id, &tags).await?;
        }

        tx.commit().await?;
        self.get(asset_id).await
    }

    /// Deletes an asset together with its tag links and every lineage edge
    /// that references it
    pub async fn delete(&self, asset_id: Uuid) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let edges = sqlx::query("DELETE FROM lineage_edges WHERE source_id = $1 OR dest_id = $1")
            .bind(asset_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM asset_tags WHERE asset_id = $1")
            .bind(asset_id)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM assets WHERE asset_id = $1")
            .bind(asset_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            // Dropping the transaction rolls it back
            return Err(DatabaseError::not_found("Asset", AssetId::from(asset_id)));
        }

        tx.commit().await?;
        debug!(asset_id = %asset_id, edges, "Asset deleted");
        Ok(())
    }

    /// Inserts a tag; a taken name fails with `DuplicateEntry`
    pub async fn insert_tag(&self, tag_id: Uuid, name: &str) -> Result<TagRow, DatabaseError> {
        let row = sqlx::query_as::<_, TagRow>(
            "INSERT INTO tags (tag_id, name) VALUES ($1, $2) RETURNING tag_id, name",
        )
        .bind(tag_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match DatabaseError::from(e) {
            DatabaseError::DuplicateEntry(_) => DatabaseError::duplicate("Tag", "name", name),
            other => other,
        })?;
        Ok(row)
    }

    /// All tags ordered by name
    pub async fn list_tags(&self) -> Result<Vec<TagRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, TagRow>("SELECT tag_id, name FROM tags ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

/// Creates missing tags and links all of `names` to the asset
async fn link_tags(
    conn: &mut PgConnection,
    asset_id: Uuid,
    names: &[String],
) -> Result<(), DatabaseError> {
    if names.is_empty() {
        return Ok(());
    }

    for name in names {
        sqlx::query("INSERT INTO tags (tag_id, name) VALUES ($1, $2) ON CONFLICT (name) DO NOTHING")
            .bind(Uuid::now_v7())
            .bind(name.as_str())
            .execute(&mut *conn)
            .await?;
    }

    sqlx::query(
        r#"
        INSERT INTO asset_tags (asset_id, tag_id)
        SELECT $1, tag_id FROM tags WHERE name = ANY($2)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(asset_id)
    .bind(names.to_vec())
    .execute(&mut *conn)
    .await?;

    Ok(())
}
