//! PostgreSQL Catalog Adapter
//!
//! Implements `CatalogPort` on top of [`AssetRepository`] and
//! [`LineageRepository`].
//!
//! # Error Handling
//!
//! Database errors are translated to `PortError` variants:
//! - `DatabaseError::NotFound` -> `PortError::NotFound`
//! - `DatabaseError::DuplicateEntry` -> `PortError::Conflict`
//! - connection failures -> `PortError::Connection`
//! - everything else -> `PortError::Internal`

use async_trait::async_trait;
use tracing::{debug, instrument};
use uuid::Uuid;

use core_kernel::{
    AssetId, DomainPort, HealthCheckResult, HealthCheckable, LineageEdgeId, PortError, TagId,
};
use domain_catalog::{
    Asset, AssetQuery, AssetType, CatalogPort, CreateAssetRequest, LineageEdge, NewLineageEdge,
    Tag, UpdateAssetRequest,
};

use crate::error::DatabaseError;
use crate::repositories::assets::{AssetChanges, AssetRepository, AssetRow, NewAsset, TagRow};
use crate::repositories::lineage::{EdgeRow, LineageRepository};

/// PostgreSQL-backed implementation of the CatalogPort trait
#[derive(Debug, Clone)]
pub struct PostgresCatalogAdapter {
    assets: AssetRepository,
    lineage: LineageRepository,
    pool: sqlx::PgPool,
}

impl PostgresCatalogAdapter {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self {
            assets: AssetRepository::new(pool.clone()),
            lineage: LineageRepository::new(pool.clone()),
            pool,
        }
    }

    /// The underlying asset repository
    pub fn assets(&self) -> &AssetRepository {
        &self.assets
    }

    /// The underlying lineage repository
    pub fn lineage(&self) -> &LineageRepository {
        &self.lineage
    }
}

impl DomainPort for PostgresCatalogAdapter {}

#[async_trait]
impl HealthCheckable for PostgresCatalogAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        super::probe(&self.pool, "postgres-catalog-adapter").await
    }
}

#[async_trait]
impl CatalogPort for PostgresCatalogAdapter {
    #[instrument(skip(self), fields(asset_id = %id))]
    async fn get_asset(&self, id: AssetId) -> Result<Asset, PortError> {
        let row = self.assets.get(id.into()).await?;
        row_to_asset(row)
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn get_assets(&self, ids: Vec<AssetId>) -> Result<Vec<Asset>, PortError> {
        let ids: Vec<Uuid> = ids.into_iter().map(Uuid::from).collect();
        self.assets
            .get_many(&ids)
            .await?
            .into_iter()
            .map(row_to_asset)
            .collect()
    }

    async fn asset_exists(&self, id: AssetId) -> Result<bool, PortError> {
        Ok(self.assets.exists(id.into()).await?)
    }

    #[instrument(skip(self))]
    async fn find_assets(&self, query: AssetQuery) -> Result<Vec<Asset>, PortError> {
        debug!("Finding assets with query: {:?}", query);

        let asset_type = query.asset_type.as_ref().map(AssetType::as_str);
        self.assets
            .find(asset_type, query.tag.as_deref())
            .await?
            .into_iter()
            .map(row_to_asset)
            .collect()
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    async fn create_asset(&self, request: CreateAssetRequest) -> Result<Asset, PortError> {
        let template = Asset::new(request.name, request.asset_type);

        let row = self
            .assets
            .insert(NewAsset {
                asset_id: template.id.into(),
                name: template.name,
                asset_type: template.asset_type.as_str().to_string(),
                description: request.description,
                created_at: template.created_at,
                tags: dedup(request.tags),
            })
            .await?;
        row_to_asset(row)
    }

    #[instrument(skip(self, request), fields(asset_id = %id))]
    async fn update_asset(
        &self,
        id: AssetId,
        request: UpdateAssetRequest,
    ) -> Result<Asset, PortError> {
        let changes = AssetChanges {
            name: request.name,
            asset_type: request.asset_type.map(String::from),
            description: request.description,
            tags: request.tags.map(dedup),
        };
        let row = self.assets.update(id.into(), changes).await?;
        row_to_asset(row)
    }

    #[instrument(skip(self), fields(asset_id = %id))]
    async fn delete_asset(&self, id: AssetId) -> Result<(), PortError> {
        Ok(self.assets.delete(id.into()).await?)
    }

    #[instrument(skip(self))]
    async fn create_tag(&self, name: &str) -> Result<Tag, PortError> {
        let row = self.assets.insert_tag(TagId::new_v7().into(), name).await?;
        Ok(row_to_tag(row))
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, PortError> {
        let rows = self.assets.list_tags().await?;
        Ok(rows.into_iter().map(row_to_tag).collect())
    }

    #[instrument(skip(self), fields(asset_id = %id))]
    async fn find_edges_by_source(&self, id: AssetId) -> Result<Vec<LineageEdge>, PortError> {
        let rows = self.lineage.find_by_source(id.into()).await?;
        Ok(rows.into_iter().map(row_to_edge).collect())
    }

    #[instrument(skip(self), fields(asset_id = %id))]
    async fn find_edges_by_dest(&self, id: AssetId) -> Result<Vec<LineageEdge>, PortError> {
        let rows = self.lineage.find_by_dest(id.into()).await?;
        Ok(rows.into_iter().map(row_to_edge).collect())
    }

    #[instrument(skip(self, edge), fields(source = %edge.source_id, dest = %edge.dest_id))]
    async fn insert_edge(&self, edge: NewLineageEdge) -> Result<LineageEdge, PortError> {
        let edge = LineageEdge::from(edge);
        let row = self
            .lineage
            .insert(EdgeRow {
                edge_id: edge.id.into(),
                source_id: edge.source_id.into(),
                dest_id: edge.dest_id.into(),
                relation: edge.relation,
                created_at: edge.created_at,
            })
            .await
            .map_err(|e| match e {
                // The foreign keys catch a delete that slipped past the row locks
                DatabaseError::ForeignKeyViolation(_) => {
                    PortError::not_found("Asset", format!("{} or {}", edge.source_id, edge.dest_id))
                }
                other => other.into(),
            })?;
        Ok(row_to_edge(row))
    }
}

fn dedup(mut names: Vec<String>) -> Vec<String> {
    names.sort();
    names.dedup();
    names
}

fn row_to_asset(row: AssetRow) -> Result<Asset, PortError> {
    let asset_type: AssetType = row.asset_type.parse().map_err(|e| {
        PortError::from(DatabaseError::CorruptRow(format!(
            "asset {}: {}",
            row.asset_id, e
        )))
    })?;

    Ok(Asset {
        id: AssetId::from(row.asset_id),
        name: row.name,
        asset_type,
        description: row.description,
        created_at: row.created_at,
        tags: row.tags.into_iter().collect(),
    })
}

fn row_to_tag(row: TagRow) -> Tag {
    Tag {
        id: TagId::from(row.tag_id),
        name: row.name,
    }
}

fn row_to_edge(row: EdgeRow) -> LineageEdge {
    LineageEdge {
        id: LineageEdgeId::from(row.edge_id),
        source_id: AssetId::from(row.source_id),
        dest_id: AssetId::from(row.dest_id),
        relation: row.relation,
        created_at: row.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_row_to_asset_parses_type_and_tags() {
        let row = AssetRow {
            asset_id: Uuid::now_v7(),
            name: "Reserve_Model_v1".to_string(),
            asset_type: "reserve_model".to_string(),
            description: String::new(),
            created_at: Utc::now(),
            tags: vec!["internal".to_string(), "PII".to_string()],
        };

        let asset = row_to_asset(row).unwrap();
        assert_eq!(asset.asset_type, AssetType::ReserveModel);
        assert!(asset.has_tag("PII"));
        assert_eq!(asset.tags.len(), 2);
    }

    #[test]
    fn test_row_to_asset_rejects_blank_type() {
        let row = AssetRow {
            asset_id: Uuid::now_v7(),
            name: "Broken".to_string(),
            asset_type: " ".to_string(),
            description: String::new(),
            created_at: Utc::now(),
            tags: Vec::new(),
        };

        assert!(row_to_asset(row).is_err());
    }

    #[test]
    fn test_dedup_tags() {
        let names = vec!["PII".to_string(), "GDPR".to_string(), "PII".to_string()];
        assert_eq!(dedup(names), vec!["GDPR", "PII"]);
    }
}
