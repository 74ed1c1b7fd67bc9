use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::cache::{DomainCacheManager, TaggedCache};
use crate::config::{ConfigManager, CoreConfig};
use crate::database::{DatabaseClient, PgClient};
use crate::error::Result;
use crate::monitoring::HealthMonitor;
use crate::resilience::ResilientDataAccess;

/// Composition root for the data-access core.
///
/// Owns the process-wide instances:
/// - Configuration manager
/// - Shared tagged cache
/// - Resilient data access around the persistence client
/// - Background health monitor
///
/// Build it once at process start and pass it (or its parts) to request handlers.
pub struct SystemContext {
    /// System instance ID
    pub system_id: Uuid,

    pub config_manager: Arc<ConfigManager>,

    pub cache: Arc<TaggedCache>,

    pub data_access: Arc<ResilientDataAccess>,

    pub health_monitor: Arc<HealthMonitor>,
}

impl std::fmt::Debug for SystemContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemContext")
            .field("system_id", &self.system_id)
            .field("environment", &self.config_manager.environment())
            .field("cache_entries", &self.cache.len())
            .field("health_monitor_running", &self.health_monitor.is_running())
            .finish()
    }
}

impl SystemContext {
    /// Load configuration for the detected environment and connect to PostgreSQL.
    ///
    /// Callers that issue their own queries should build the [`PgClient`]
    /// themselves and use [`SystemContext::with_client`] so they keep a typed
    /// handle to its pool.
    pub async fn new() -> Result<Self> {
        info!("🔧 Initializing SystemContext with auto-detected environment configuration");

        let config_manager = ConfigManager::load()?;
        let client = Arc::new(PgClient::new(config_manager.config().database.clone()));
        Self::with_client(config_manager, client).await
    }

    /// Build every component around an existing client and start health monitoring.
    ///
    /// A failed initial connection is logged, not returned: the monitor reports
    /// it and the first data access attempt reconnects.
    pub async fn with_client(
        config_manager: Arc<ConfigManager>,
        client: Arc<dyn DatabaseClient>,
    ) -> Result<Self> {
        let system_id = Uuid::new_v4();
        let config = config_manager.config();

        let cache = Arc::new(TaggedCache::from_config(&config.cache));
        let data_access = Arc::new(ResilientDataAccess::new(client, config.retry.clone()));

        if let Err(e) = data_access.connect().await {
            warn!(
                system_id = %system_id,
                error = %e,
                "Initial database connection failed, continuing in degraded mode"
            );
        }

        let health_monitor = HealthMonitor::start(data_access.clone(), config.health.clone());

        info!(
            system_id = %system_id,
            environment = %config_manager.environment(),
            cache_enabled = config.cache.enabled,
            "✅ SystemContext initialized"
        );

        Ok(Self {
            system_id,
            config_manager,
            cache,
            data_access,
            health_monitor,
        })
    }

    pub fn config(&self) -> &CoreConfig {
        self.config_manager.config()
    }

    /// Cache view for a business domain, using that domain's configured TTL
    pub fn domain_cache(&self, domain: &str) -> DomainCacheManager {
        DomainCacheManager::with_default_ttl(
            domain,
            self.cache.clone(),
            self.config().cache.ttl_for_domain(domain),
        )
    }

    /// Stop the health monitor and close the database connection.
    pub async fn shutdown(&self) -> Result<()> {
        info!(system_id = %self.system_id, "🛑 Shutting down SystemContext");

        self.health_monitor.cleanup();
        self.data_access.disconnect().await?;

        info!(system_id = %self.system_id, "SystemContext shutdown complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheOptions;
    use crate::database::ClientError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct NullClient {
        connects: AtomicUsize,
        disconnects: AtomicUsize,
    }

    #[async_trait]
    impl DatabaseClient for NullClient {
        async fn connect(&self) -> std::result::Result<(), ClientError> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn disconnect(&self) -> std::result::Result<(), ClientError> {
            self.disconnects.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn ping(&self) -> std::result::Result<(), ClientError> {
            Ok(())
        }
    }

    async fn context() -> (Arc<NullClient>, SystemContext) {
        let manager = ConfigManager::from_config(CoreConfig::default(), "test").unwrap();
        let client = Arc::new(NullClient::default());
        let context = SystemContext::with_client(manager, client.clone())
            .await
            .unwrap();
        (client, context)
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_client_connects_and_starts_monitor() {
        let (client, context) = context().await;

        assert_eq!(client.connects.load(Ordering::SeqCst), 1);
        assert!(context.health_monitor.is_running());

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(context.health_monitor.get_health_stats().connected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_domain_cache_uses_domain_ttl() {
        let (_, context) = context().await;

        assert_eq!(
            context.domain_cache("leaderboard").default_ttl(),
            Duration::from_secs(30)
        );
        assert_eq!(
            context.domain_cache("unknown").default_ttl(),
            Duration::from_secs(300)
        );

        let users = context.domain_cache("users");
        users.set("1", &"ada", CacheOptions::new()).unwrap();
        assert_eq!(context.cache.keys_for_tag("users"), vec!["users:1".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_monitor_and_disconnects() {
        let (client, context) = context().await;

        context.shutdown().await.unwrap();

        assert!(!context.health_monitor.is_running());
        assert_eq!(client.disconnects.load(Ordering::SeqCst), 1);
    }
}
