//! Catalog Application Layer
//!
//! Wires the catalog and fraud scoring domains to their stores and exposes
//! them behind an API-key access policy.
//!
//! # Modules
//!
//! - `config`: `CATALOG_*` environment configuration
//! - `telemetry`: tracing subscriber setup
//! - `app`: the access-gated [`CatalogApp`] facade
//! - `seed`: the demo catalog
//!
//! # Example
//!
//! ```rust,ignore
//! let config = AppConfig::load()?;
//! let app = CatalogApp::connect(&config).await?;
//! app.seed_demo().await?;
//!
//! let view = app.neighborhood(Some("viewer-key-123"), asset_id).await?;
//! ```

pub mod config;
pub mod error;
pub mod telemetry;
pub mod app;
pub mod seed;

pub use config::AppConfig;
pub use error::AppError;
pub use telemetry::init_tracing;
pub use app::CatalogApp;
pub use seed::{SeedReport, DEMO_TAGS};
