//! Structured logging.
//!
//! `RUST_LOG` wins when set; otherwise the configured level applies to this
//! crate and to the HTTP trace layer.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

pub fn init_logging(config: &ObservabilityConfig) {
    let fallback = default_directives(&config.log_level);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn default_directives(level: &str) -> String {
    format!("status_checker={level},tower_http={level}")
}
