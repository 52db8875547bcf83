//! Demo catalog
//!
//! Loads the demo tags, assets, lineage and scored claims. Each item is only
//! created when missing, so seeding twice leaves the catalog unchanged.

use rust_decimal_macros::dec;
use serde::Serialize;
use tracing::{info, instrument};

use domain_catalog::{Asset, AssetQuery, AssetType, CatalogError, CreateAssetRequest};
use domain_fraud::ClaimScoreRequest;

use crate::app::CatalogApp;
use crate::error::AppError;

/// Tags every demo catalog starts with
pub const DEMO_TAGS: [&str; 6] = ["PII", "GDPR", "HIPAA", "PCI", "internal", "public"];

pub const POLICY_MASTER: &str = "Policy_Master";
pub const CLAIM_INTAKE: &str = "Claim_Intake_2025";
pub const RESERVE_MODEL: &str = "Reserve_Model_v1";

/// What a seeding run created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub tags: usize,
    pub assets: usize,
    pub edges: usize,
    pub claims: usize,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn demo_assets() -> Vec<CreateAssetRequest> {
    vec![
        CreateAssetRequest::new(POLICY_MASTER, AssetType::Policy)
            .description("Master policy dataset")
            .tag("PII"),
        CreateAssetRequest::new(CLAIM_INTAKE, AssetType::Claim).description("Raw claim intake"),
        CreateAssetRequest::new(RESERVE_MODEL, AssetType::ReserveModel)
            .description("Chain-ladder outputs"),
    ]
}

fn demo_claims() -> Vec<ClaimScoreRequest> {
    vec![
        ClaimScoreRequest::new()
            .claim_number("C-1001")
            .policy_number("P-9001")
            .amount(dec!(12000))
            .channel("online")
            .city("Chennai")
            .prior_claims(0),
        ClaimScoreRequest::new()
            .claim_number("C-1002")
            .policy_number("P-9002")
            .amount(dec!(450000))
            .channel("online")
            .city("Unknown")
            .prior_claims(3),
    ]
}

impl CatalogApp {
    /// Loads the demo catalog; items that already exist are skipped
    #[instrument(skip(self))]
    pub async fn seed_demo(&self) -> Result<SeedReport, AppError> {
        let mut report = SeedReport::default();
        let assets = self.asset_service();

        for name in DEMO_TAGS {
            match assets.create_tag(name).await {
                Ok(_) => report.tags += 1,
                Err(CatalogError::TagExists(_)) => {}
                Err(e) => return Err(e.into()),
            }
        }

        let mut existing = assets.list_assets(AssetQuery::default()).await?;
        for request in demo_assets() {
            if existing.iter().any(|a| a.name == request.name) {
                continue;
            }
            existing.push(assets.create_asset(request).await?);
            report.assets += 1;
        }

        let policy = find_by_name(&existing, POLICY_MASTER)?;
        let claim = find_by_name(&existing, CLAIM_INTAKE)?;
        let reserve = find_by_name(&existing, RESERVE_MODEL)?;

        for (source, dest, relation) in [(policy, claim, "feeds"), (claim, reserve, "drives")] {
            let present = self
                .catalog_port()
                .find_edges_by_source(source.id)
                .await
                .map_err(CatalogError::from)?
                .iter()
                .any(|e| e.dest_id == dest.id && e.relation == relation);
            if !present {
                self.lineage_graph()
                    .create_edge(Some(source.id), Some(dest.id), Some(relation.to_string()))
                    .await?;
                report.edges += 1;
            }
        }

        let scoring = self.scoring_service();
        for request in demo_claims() {
            let number = request.claim_number.clone().unwrap_or_default();
            if scoring.claim_history(&number).await?.is_empty() {
                scoring.score_claim(request).await?;
                report.claims += 1;
            }
        }

        info!(
            tags = report.tags,
            assets = report.assets,
            edges = report.edges,
            claims = report.claims,
            "Demo catalog seeded"
        );
        Ok(report)
    }
}

fn find_by_name<'a>(assets: &'a [Asset], name: &str) -> Result<&'a Asset, AppError> {
    assets
        .iter()
        .find(|a| a.name == name)
        .ok_or_else(|| CatalogError::not_found("Asset", name).into())
}
