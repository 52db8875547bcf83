//! Application facade
//!
//! [`CatalogApp`] wires the catalog and scoring services to their stores and
//! gates every operation through an [`AccessPolicy`]. Callers pass the API
//! key they presented; reads need [`Permission::View`], writes and scoring
//! need [`Permission::Edit`].

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, instrument};

use core_kernel::{
    AccessPolicy, ApiKeyAccessPolicy, AssetId, HealthCheckResult, LineageEdgeId, Permission,
    Principal,
};
use domain_catalog::{
    Asset, AssetQuery, AssetService, CatalogPort, CreateAssetRequest, LineageGraph, Neighborhood,
    Tag, UpdateAssetRequest,
};
use domain_fraud::{
    ClaimScoreRequest, ClaimScoringService, ClaimStorePort, FraudScoringEngine, RuleTable,
    ScoreOutcome, ScoredClaim,
};
use infra_db::{create_pool, run_migrations, PostgresCatalogAdapter, PostgresClaimStore};

use crate::config::AppConfig;
use crate::error::AppError;

/// Access-gated catalog, lineage and scoring operations
#[derive(Clone)]
pub struct CatalogApp {
    access: Arc<dyn AccessPolicy>,
    catalog: Arc<dyn CatalogPort>,
    claims: Arc<dyn ClaimStorePort>,
    assets: AssetService,
    lineage: LineageGraph,
    scoring: ClaimScoringService,
}

impl CatalogApp {
    pub fn new(
        catalog: Arc<dyn CatalogPort>,
        claims: Arc<dyn ClaimStorePort>,
        engine: FraudScoringEngine,
        access: Arc<dyn AccessPolicy>,
    ) -> Self {
        Self {
            assets: AssetService::new(catalog.clone()),
            lineage: LineageGraph::new(catalog.clone()),
            scoring: ClaimScoringService::new(engine, claims.clone()),
            access,
            catalog,
            claims,
        }
    }

    /// In-memory stores, the standard rules and the demo users
    #[cfg(feature = "in-memory")]
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(domain_catalog::InMemoryCatalogPort::new()),
            Arc::new(domain_fraud::InMemoryClaimStore::new()),
            FraudScoringEngine::standard(),
            Arc::new(ApiKeyAccessPolicy::demo()),
        )
    }

    /// Builds the application described by `config`.
    ///
    /// Connects to PostgreSQL and installs the schema when a database URL is
    /// configured, otherwise falls back to the in-memory stores.
    pub async fn connect(config: &AppConfig) -> Result<Self, AppError> {
        config.validate()?;
        let engine = FraudScoringEngine::new(RuleTable::standard(), config.scoring())?;
        let access: Arc<dyn AccessPolicy> = Arc::new(ApiKeyAccessPolicy::demo());

        match config.database() {
            Some(db) => {
                let pool = create_pool(db).await?;
                run_migrations(&pool).await?;
                info!("Using PostgreSQL stores");
                Ok(Self::new(
                    Arc::new(PostgresCatalogAdapter::new(pool.clone())),
                    Arc::new(PostgresClaimStore::new(pool)),
                    engine,
                    access,
                ))
            }
            None => Self::memory_fallback(engine, access),
        }
    }

    #[cfg(feature = "in-memory")]
    fn memory_fallback(
        engine: FraudScoringEngine,
        access: Arc<dyn AccessPolicy>,
    ) -> Result<Self, AppError> {
        info!("No database configured, using in-memory stores");
        Ok(Self::new(
            Arc::new(domain_catalog::InMemoryCatalogPort::new()),
            Arc::new(domain_fraud::InMemoryClaimStore::new()),
            engine,
            access,
        ))
    }

    #[cfg(not(feature = "in-memory"))]
    fn memory_fallback(
        _engine: FraudScoringEngine,
        _access: Arc<dyn AccessPolicy>,
    ) -> Result<Self, AppError> {
        Err(AppError::config(
            "database_url is required when the in-memory stores are disabled",
        ))
    }

    fn authorize(&self, api_key: Option<&str>, permission: Permission) -> Result<Principal, AppError> {
        let principal = self.access.authorize(api_key, permission)?;
        debug!(user = %principal.name, role = %principal.role, ?permission, "Access granted");
        Ok(principal)
    }

    pub(crate) fn asset_service(&self) -> &AssetService {
        &self.assets
    }

    pub(crate) fn lineage_graph(&self) -> &LineageGraph {
        &self.lineage
    }

    pub(crate) fn scoring_service(&self) -> &ClaimScoringService {
        &self.scoring
    }

    pub(crate) fn catalog_port(&self) -> &Arc<dyn CatalogPort> {
        &self.catalog
    }

    // ========================================================================
    // Assets and tags
    // ========================================================================

    pub async fn list_assets(
        &self,
        api_key: Option<&str>,
        query: AssetQuery,
    ) -> Result<Vec<Asset>, AppError> {
        self.authorize(api_key, Permission::View)?;
        Ok(self.assets.list_assets(query).await?)
    }

    pub async fn get_asset(&self, api_key: Option<&str>, id: AssetId) -> Result<Asset, AppError> {
        self.authorize(api_key, Permission::View)?;
        Ok(self.assets.get_asset(id).await?)
    }

    #[instrument(skip(self, api_key, request))]
    pub async fn create_asset(
        &self,
        api_key: Option<&str>,
        request: CreateAssetRequest,
    ) -> Result<Asset, AppError> {
        let principal = self.authorize(api_key, Permission::Edit)?;
        let asset = self.assets.create_asset(request).await?;
        info!(user = %principal.name, asset_id = %asset.id, "Asset created by user");
        Ok(asset)
    }

    #[instrument(skip(self, api_key, request))]
    pub async fn update_asset(
        &self,
        api_key: Option<&str>,
        id: AssetId,
        request: UpdateAssetRequest,
    ) -> Result<Asset, AppError> {
        self.authorize(api_key, Permission::Edit)?;
        Ok(self.assets.update_asset(id, request).await?)
    }

    #[instrument(skip(self, api_key))]
    pub async fn delete_asset(&self, api_key: Option<&str>, id: AssetId) -> Result<(), AppError> {
        self.authorize(api_key, Permission::Edit)?;
        Ok(self.assets.delete_asset(id).await?)
    }

    pub async fn list_tags(&self, api_key: Option<&str>) -> Result<Vec<Tag>, AppError> {
        self.authorize(api_key, Permission::View)?;
        Ok(self.assets.list_tags().await?)
    }

    #[instrument(skip(self, api_key))]
    pub async fn create_tag(&self, api_key: Option<&str>, name: &str) -> Result<Tag, AppError> {
        self.authorize(api_key, Permission::Edit)?;
        Ok(self.assets.create_tag(name).await?)
    }

    // ========================================================================
    // Lineage
    // ========================================================================

    #[instrument(skip(self, api_key))]
    pub async fn create_edge(
        &self,
        api_key: Option<&str>,
        source_id: Option<AssetId>,
        dest_id: Option<AssetId>,
        relation: Option<String>,
    ) -> Result<LineageEdgeId, AppError> {
        self.authorize(api_key, Permission::Edit)?;
        Ok(self.lineage.create_edge(source_id, dest_id, relation).await?)
    }

    pub async fn neighborhood(
        &self,
        api_key: Option<&str>,
        asset_id: AssetId,
    ) -> Result<Neighborhood, AppError> {
        self.authorize(api_key, Permission::View)?;
        Ok(self.lineage.neighborhood(asset_id).await?)
    }

    // ========================================================================
    // Claim scoring
    // ========================================================================

    pub async fn score_claim(
        &self,
        api_key: Option<&str>,
        request: ClaimScoreRequest,
    ) -> Result<ScoreOutcome, AppError> {
        self.authorize(api_key, Permission::Edit)?;
        Ok(self.scoring.score_claim(request).await?)
    }

    /// Scores a JSON claim body with lenient numeric coercion
    pub async fn score_json(
        &self,
        api_key: Option<&str>,
        body: &Value,
    ) -> Result<ScoreOutcome, AppError> {
        self.authorize(api_key, Permission::Edit)?;
        Ok(self.scoring.score_json(body).await?)
    }

    pub async fn list_scored_claims(
        &self,
        api_key: Option<&str>,
    ) -> Result<Vec<ScoredClaim>, AppError> {
        self.authorize(api_key, Permission::View)?;
        Ok(self.scoring.list_scored_claims().await?)
    }

    // ========================================================================
    // Health
    // ========================================================================

    /// Health of both stores
    pub async fn health(&self) -> Vec<HealthCheckResult> {
        vec![
            self.catalog.health_check().await,
            self.claims.health_check().await,
        ]
    }
}
