//! Tracing setup

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use tracing_subscriber::util::TryInitError;

/// Installs the global subscriber.
///
/// `RUST_LOG` takes precedence over `log_level`. Fails if a subscriber is
/// already installed.
pub fn init_tracing(log_level: &str, json: bool) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
    }
}
