//! Logging setup

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{Result, SpamError};

/// Install the global tracing subscriber. `RUST_LOG` overrides the configured level.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("spam_detector={0},tower_http={0}", config.level)));

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if config.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer().pretty()).try_init()
    };

    installed.map_err(|e| SpamError::Config(format!("Failed to set tracing subscriber: {}", e)))
}
