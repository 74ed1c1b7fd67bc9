//! # Quest Core Health Reporter
//!
//! Connects to the configured database, runs the background health monitor and
//! prints the health report as JSON once per check interval until Ctrl-C.

use anyhow::Context;
use quest_core::config::ConfigManager;
use quest_core::database::PgClient;
use quest_core::logging::init_logging;
use quest_core::SystemContext;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_manager = ConfigManager::load().context("failed to load configuration")?;
    init_logging(config_manager.environment(), &config_manager.config().logging);

    let interval = config_manager.config().health.check_interval();
    let client = Arc::new(PgClient::new(config_manager.config().database.clone()));
    info!(server = %client.server(), "Starting health reporter");

    let context = SystemContext::with_client(config_manager, client)
        .await
        .context("failed to initialize system context")?;

    // The monitor probes on its own first tick; give it a moment before the first report.
    let first_report = Instant::now() + Duration::from_millis(250).min(interval);
    let mut ticker = tokio::time::interval_at(first_report, interval);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let report = context.health_monitor.health_report();
                println!("{}", serde_json::to_string(&report)?);
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("failed to listen for Ctrl-C")?;
                info!("Received Ctrl-C, shutting down");
                break;
            }
        }
    }

    context.shutdown().await.context("shutdown failed")?;
    Ok(())
}
