//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once at startup
//! - Pick pretty or JSON output
//! - Derive the filter from config unless `RUST_LOG` is set
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Rewrite decisions log at debug on the `html_fallback` target, so
//!   `RUST_LOG=html_fallback=debug` shows only fallback activity

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};

/// Default filter directives for a configured level.
pub fn default_directives(log_level: &str) -> String {
    let level = log_level.to_ascii_lowercase();
    match level.as_str() {
        "debug" | "trace" => format!(
            "fallback_devserver={level},html_fallback={level},tower_http={level}"
        ),
        _ => format!("fallback_devserver={level},html_fallback={level},tower_http=warn"),
    }
}

/// Install the global tracing subscriber.
pub fn init_tracing(config: &ObservabilityConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directives(&config.log_level).into());

    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
    }
}
