//! Catalog Domain Ports
//!
//! The `CatalogPort` trait is the catalog's view of the entity store. It is
//! implemented by the PostgreSQL adapter in `infra_db` and by the in-memory
//! [`mock::InMemoryCatalogPort`] used in tests and demos.
//!
//! # Atomicity
//!
//! `insert_edge` must check that both endpoint assets exist and insert the
//! edge as one atomic step, and `delete_asset` must remove the asset together
//! with every edge that references it. Together these guarantee no edge ever
//! points at a missing asset, even with concurrent deletes.
//!
//! ```rust,ignore
//! pub struct LineageGraph {
//!     port: Arc<dyn CatalogPort>,
//! }
//! ```

use async_trait::async_trait;

use core_kernel::{AssetId, DomainPort, HealthCheckable, PortError};

use crate::asset::{Asset, AssetQuery, CreateAssetRequest, Tag, UpdateAssetRequest};
use crate::lineage::{LineageEdge, NewLineageEdge};

/// The store operations the catalog domain depends on
#[async_trait]
pub trait CatalogPort: DomainPort + HealthCheckable {
    // ========================================================================
    // Assets
    // ========================================================================

    /// Retrieves an asset by ID, or `PortError::NotFound`
    async fn get_asset(&self, id: AssetId) -> Result<Asset, PortError>;

    /// Retrieves the assets that exist among `ids`; missing ids are skipped
    async fn get_assets(&self, ids: Vec<AssetId>) -> Result<Vec<Asset>, PortError>;

    /// Checks whether an asset exists
    async fn asset_exists(&self, id: AssetId) -> Result<bool, PortError>;

    /// Lists assets matching the query
    async fn find_assets(&self, query: AssetQuery) -> Result<Vec<Asset>, PortError>;

    /// Creates an asset, creating or reusing the named tags
    async fn create_asset(&self, request: CreateAssetRequest) -> Result<Asset, PortError>;

    /// Applies a partial update to an asset
    async fn update_asset(
        &self,
        id: AssetId,
        request: UpdateAssetRequest,
    ) -> Result<Asset, PortError>;

    /// Deletes an asset along with its tag links and every edge touching it
    async fn delete_asset(&self, id: AssetId) -> Result<(), PortError>;

    // ========================================================================
    // Tags
    // ========================================================================

    /// Creates a tag; `PortError::Conflict` if the name is taken
    async fn create_tag(&self, name: &str) -> Result<Tag, PortError>;

    /// Lists all tags
    async fn list_tags(&self) -> Result<Vec<Tag>, PortError>;

    // ========================================================================
    // Lineage
    // ========================================================================

    /// Edges whose source is `id`, oldest first
    async fn find_edges_by_source(&self, id: AssetId) -> Result<Vec<LineageEdge>, PortError>;

    /// Edges whose destination is `id`, oldest first
    async fn find_edges_by_dest(&self, id: AssetId) -> Result<Vec<LineageEdge>, PortError>;

    /// Inserts an edge after checking, atomically with the insert, that both
    /// endpoints exist. Fails with `PortError::NotFound` otherwise.
    async fn insert_edge(&self, edge: NewLineageEdge) -> Result<LineageEdge, PortError>;
}

/// In-memory implementation of CatalogPort
///
/// Stores everything behind a single lock so that edge insertion and asset
/// deletion are atomic with respect to each other.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::{BTreeMap, BTreeSet, HashMap};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::HealthCheckResult;

    #[derive(Debug, Default)]
    struct CatalogState {
        assets: HashMap<AssetId, Asset>,
        tags: BTreeMap<String, Tag>,
        edges: Vec<LineageEdge>,
    }

    impl CatalogState {
        fn ensure_tags(&mut self, names: &[String]) -> Result<BTreeSet<String>, PortError> {
            let mut resolved = BTreeSet::new();
            for name in names {
                if name.trim().is_empty() {
                    return Err(PortError::validation_field("Tag name must not be empty", "tags"));
                }
                self.tags
                    .entry(name.clone())
                    .or_insert_with(|| Tag::new(name.clone()));
                resolved.insert(name.clone());
            }
            Ok(resolved)
        }
    }

    /// In-memory catalog store
    #[derive(Debug, Default, Clone)]
    pub struct InMemoryCatalogPort {
        state: Arc<RwLock<CatalogState>>,
    }

    impl InMemoryCatalogPort {
        /// Creates an empty store
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with assets for testing
        pub async fn with_assets(assets: Vec<Asset>) -> Self {
            let port = Self::new();
            {
                let mut state = port.state.write().await;
                for asset in assets {
                    for tag in &asset.tags {
                        state
                            .tags
                            .entry(tag.clone())
                            .or_insert_with(|| Tag::new(tag.clone()));
                    }
                    state.assets.insert(asset.id, asset);
                }
            }
            port
        }

        /// Number of stored edges
        pub async fn edge_count(&self) -> usize {
            self.state.read().await.edges.len()
        }
    }

    impl DomainPort for InMemoryCatalogPort {}

    #[async_trait]
    impl HealthCheckable for InMemoryCatalogPort {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::always_healthy("in-memory-catalog-port")
        }
    }

    #[async_trait]
    impl CatalogPort for InMemoryCatalogPort {
        async fn get_asset(&self, id: AssetId) -> Result<Asset, PortError> {
            self.state
                .read()
                .await
                .assets
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Asset", id))
        }

        async fn get_assets(&self, ids: Vec<AssetId>) -> Result<Vec<Asset>, PortError> {
            let state = self.state.read().await;
            let unique: BTreeSet<AssetId> = ids.into_iter().collect();
            Ok(unique
                .into_iter()
                .filter_map(|id| state.assets.get(&id).cloned())
                .collect())
        }

        async fn asset_exists(&self, id: AssetId) -> Result<bool, PortError> {
            Ok(self.state.read().await.assets.contains_key(&id))
        }

        async fn find_assets(&self, query: AssetQuery) -> Result<Vec<Asset>, PortError> {
            let state = self.state.read().await;
            let mut results: Vec<Asset> = state
                .assets
                .values()
                .filter(|a| query.matches(a))
                .cloned()
                .collect();
            results.sort_by(|a, b| a.id.cmp(&b.id));
            Ok(results)
        }

        async fn create_asset(&self, request: CreateAssetRequest) -> Result<Asset, PortError> {
            let mut state = self.state.write().await;
            let tags = state.ensure_tags(&request.tags)?;
            let asset = Asset::new(request.name, request.asset_type)
                .with_description(request.description)
                .with_tags(tags);
            state.assets.insert(asset.id, asset.clone());
            Ok(asset)
        }

        async fn update_asset(
            &self,
            id: AssetId,
            mut request: UpdateAssetRequest,
        ) -> Result<Asset, PortError> {
            let mut state = self.state.write().await;
            if !state.assets.contains_key(&id) {
                return Err(PortError::not_found("Asset", id));
            }
            if let Some(names) = request.tags.take() {
                request.tags = Some(state.ensure_tags(&names)?.into_iter().collect());
            }
            let asset = state
                .assets
                .get_mut(&id)
                .ok_or_else(|| PortError::not_found("Asset", id))?;
            asset.apply(request);
            Ok(asset.clone())
        }

        async fn delete_asset(&self, id: AssetId) -> Result<(), PortError> {
            let mut state = self.state.write().await;
            if state.assets.remove(&id).is_none() {
                return Err(PortError::not_found("Asset", id));
            }
            state
                .edges
                .retain(|e| e.source_id != id && e.dest_id != id);
            Ok(())
        }

        async fn create_tag(&self, name: &str) -> Result<Tag, PortError> {
            let mut state = self.state.write().await;
            if state.tags.contains_key(name) {
                return Err(PortError::conflict(format!("Tag exists: {name}")));
            }
            let tag = Tag::new(name);
            state.tags.insert(name.to_string(), tag.clone());
            Ok(tag)
        }

        async fn list_tags(&self) -> Result<Vec<Tag>, PortError> {
            Ok(self.state.read().await.tags.values().cloned().collect())
        }

        async fn find_edges_by_source(&self, id: AssetId) -> Result<Vec<LineageEdge>, PortError> {
            let state = self.state.read().await;
            Ok(state
                .edges
                .iter()
                .filter(|e| e.source_id == id)
                .cloned()
                .collect())
        }

        async fn find_edges_by_dest(&self, id: AssetId) -> Result<Vec<LineageEdge>, PortError> {
            let state = self.state.read().await;
            Ok(state
                .edges
                .iter()
                .filter(|e| e.dest_id == id)
                .cloned()
                .collect())
        }

        async fn insert_edge(&self, edge: NewLineageEdge) -> Result<LineageEdge, PortError> {
            let mut state = self.state.write().await;
            for id in [edge.source_id, edge.dest_id] {
                if !state.assets.contains_key(&id) {
                    return Err(PortError::not_found("Asset", id));
                }
            }
            let edge = LineageEdge::from(edge);
            state.edges.push(edge.clone());
            Ok(edge)
        }
    }
}
