//! Pre-built Test Fixtures
//!
//! Provides the demo catalog and reference claims. These fixtures are
//! consistent and predictable so assertions can use exact values.

use once_cell::sync::Lazy;
use rust_decimal_macros::dec;

use domain_catalog::{Asset, AssetType, CatalogPort, InMemoryCatalogPort, NewLineageEdge};
use domain_fraud::{ClaimScoreRequest, FraudScoringEngine};

/// Shared engine with the standard rule table and default thresholds
pub static STANDARD_ENGINE: Lazy<FraudScoringEngine> = Lazy::new(FraudScoringEngine::standard);

/// API keys of the demo users
pub struct KeyFixtures;

impl KeyFixtures {
    pub const EDITOR: Option<&'static str> = Some("editor-key-123");
    pub const VIEWER: Option<&'static str> = Some("viewer-key-123");
}

/// Fixture for catalog assets
pub struct CatalogFixtures;

impl CatalogFixtures {
    /// Master policy dataset tagged PII
    pub fn policy_master() -> Asset {
        Asset::new("Policy_Master", AssetType::Policy)
            .with_description("Master policy dataset")
            .with_tags(["PII"])
    }

    /// Raw claim intake
    pub fn claim_intake() -> Asset {
        Asset::new("Claim_Intake_2025", AssetType::Claim).with_description("Raw claim intake")
    }

    /// Reserving model outputs
    pub fn reserve_model() -> Asset {
        Asset::new("Reserve_Model_v1", AssetType::ReserveModel)
            .with_description("Chain-ladder outputs")
    }
}

/// The demo chain `Policy_Master -feeds-> Claim_Intake_2025 -drives-> Reserve_Model_v1`
pub struct DemoCatalog {
    pub port: InMemoryCatalogPort,
    pub policy: Asset,
    pub claim: Asset,
    pub reserve: Asset,
}

impl DemoCatalog {
    /// Builds the demo chain in a fresh in-memory store
    pub async fn load() -> Self {
        let policy = CatalogFixtures::policy_master();
        let claim = CatalogFixtures::claim_intake();
        let reserve = CatalogFixtures::reserve_model();

        let port =
            InMemoryCatalogPort::with_assets(vec![policy.clone(), claim.clone(), reserve.clone()])
                .await;
        port.insert_edge(NewLineageEdge::new(policy.id, claim.id, "feeds"))
            .await
            .expect("demo edge policy -> claim");
        port.insert_edge(NewLineageEdge::new(claim.id, reserve.id, "drives"))
            .await
            .expect("demo edge claim -> reserve");

        Self {
            port,
            policy,
            claim,
            reserve,
        }
    }
}

/// Fixture for claim scoring requests
pub struct ClaimFixtures;

impl ClaimFixtures {
    /// Triggers every standard rule: score 90, SUSPICIOUS
    pub fn high_risk() -> ClaimScoreRequest {
        ClaimScoreRequest::new()
            .claim_number("C-1002")
            .policy_number("P-9002")
            .amount(dec!(450000))
            .prior_claims(3)
            .channel("online")
            .city("unknown")
    }

    /// Triggers no standard rule: score 0, OK
    pub fn low_risk() -> ClaimScoreRequest {
        ClaimScoreRequest::new()
            .claim_number("C-1001")
            .policy_number("P-9001")
            .amount(dec!(12000))
            .prior_claims(0)
            .channel("agent")
            .city("Chennai")
    }

    /// Exactly at the high-amount limit, which does not trigger
    pub fn at_amount_limit() -> ClaimScoreRequest {
        Self::low_risk().amount(dec!(300000))
    }
}
