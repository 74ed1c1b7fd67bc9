//! # Structured Logging Module
//!
//! Environment-aware structured logging to the console, as human-readable
//! lines or JSON.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::{ConfigManager, LoggingConfig};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging using the detected environment and default settings
pub fn init_structured_logging() {
    init_logging(&ConfigManager::detect_environment(), &LoggingConfig::default());
}

/// Initialize structured logging once per process.
///
/// Filter precedence: `RUST_LOG`, then `logging.level`, then the environment
/// default (`debug` for test/development, `info` for production).
pub fn init_logging(environment: &str, config: &LoggingConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let directive = config
            .level
            .clone()
            .unwrap_or_else(|| default_log_level(environment).to_string());
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&directive));

        let layer = if config.json {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .json()
                .with_filter(filter)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_ansi(true)
                .with_filter(filter)
                .boxed()
        };

        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized - continuing with existing subscriber");
            return;
        }

        tracing::info!(
            environment = %environment,
            level = %directive,
            json = config.json,
            "🔧 Structured logging initialized"
        );
    });
}

fn default_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}
