//! Catalog seeding binary
//!
//! Loads configuration, installs the schema when a database is configured,
//! seeds the demo catalog and prints a summary.
//!
//! # Usage
//!
//! ```bash
//! # In-memory run, prints the demo lineage and scores
//! cargo run --bin catalog-seed
//!
//! # Seed a PostgreSQL database
//! CATALOG_DATABASE_URL=postgres://localhost/catalog cargo run --bin catalog-seed
//! ```
//!
//! # Environment Variables
//!
//! * `CATALOG_DATABASE_URL` - PostgreSQL connection string (default: in-memory)
//! * `CATALOG_MAX_CONNECTIONS` - Pool size (default: 10)
//! * `CATALOG_LOG_LEVEL` - trace, debug, info, warn, error (default: info)
//! * `CATALOG_LOG_JSON` - JSON log lines (default: false)
//! * `CATALOG_FRAUD_THRESHOLD` - Suspicious score threshold (default: 60)
//! * `CATALOG_SEED_DEMO` - Load the demo catalog (default: true)

use anyhow::Context;

use catalog_app::{init_tracing, AppConfig, CatalogApp};
use domain_catalog::AssetQuery;

const VIEWER_KEY: Option<&str> = Some("viewer-key-123");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.log_level, config.log_json).context("Failed to initialize tracing")?;

    tracing::info!(
        database = config.database_url.is_some(),
        threshold = %config.fraud_threshold,
        "Starting catalog"
    );

    let app = CatalogApp::connect(&config)
        .await
        .context("Failed to connect to the catalog stores")?;

    for health in app.health().await {
        if !health.is_healthy() {
            anyhow::bail!(
                "Store {} is {:?}: {}",
                health.adapter_id,
                health.status,
                health.message.unwrap_or_default()
            );
        }
    }

    if config.seed_demo {
        let report = app.seed_demo().await.context("Failed to seed demo catalog")?;
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    for asset in app.list_assets(VIEWER_KEY, AssetQuery::default()).await? {
        let view = app.neighborhood(VIEWER_KEY, asset.id).await?;
        println!(
            "{} ({}): {} neighbors, {} edges",
            asset.name,
            asset.asset_type,
            view.nodes.len().saturating_sub(1),
            view.edges.len()
        );
    }

    for claim in app.list_scored_claims(VIEWER_KEY).await? {
        println!(
            "{} {} score={} label={}",
            claim.claim_number, claim.policy_number, claim.fraud_score, claim.fraud_label
        );
    }

    Ok(())
}
