//! # Quest Core Configuration
//!
//! Layered configuration for the data-access and caching core.
//!
//! ## Sources
//!
//! Later sources override earlier ones:
//!
//! 1. Built-in defaults (`CoreConfig::default()`)
//! 2. `{config_dir}/quest-core.toml` (optional)
//! 3. `{config_dir}/quest-core.{environment}.toml` (optional)
//! 4. Environment variables prefixed `QUEST_CORE__`, e.g. `QUEST_CORE__RETRY__DELAY_MS=250`
//!
//! ## Usage
//!
//! ```rust,no_run
//! use quest_core::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let retry = &manager.config().retry;
//! println!("{} attempts, {:?} apart", retry.max_attempts, retry.delay());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::time::Duration;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Persistence client connection settings
    pub database: DatabaseConfig,

    /// Connection-failure retry settings
    pub retry: RetryConfig,

    /// In-memory tagged cache settings
    pub cache: CacheConfig,

    /// Background health monitor settings
    pub health: HealthConfig,

    /// Log output settings
    pub logging: LoggingConfig,
}

impl CoreConfig {
    /// Configuration with tiny delays and intervals for fast test feedback
    pub fn for_test() -> Self {
        Self {
            database: DatabaseConfig {
                url: Some("postgresql://localhost/quest_test".to_string()),
                max_connections: 2,
                connect_timeout_ms: 500,
            },
            retry: RetryConfig {
                max_attempts: 3,
                delay_ms: 10,
            },
            cache: CacheConfig {
                max_entries: 1_000,
                default_ttl_seconds: 5,
                ..CacheConfig::default()
            },
            health: HealthConfig {
                check_interval_seconds: 1,
                ..HealthConfig::default()
            },
            logging: LoggingConfig::default(),
        }
    }

    /// Validate every section
    pub fn validate(&self) -> ConfigResult<()> {
        self.database.validate()?;
        self.retry.validate()?;
        self.cache.validate()?;
        self.health.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Explicit connection URL; falls back to `DATABASE_URL`
    pub url: Option<String>,
    pub max_connections: u32,
    pub connect_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 5,
            connect_timeout_ms: 5_000,
        }
    }
}

impl DatabaseConfig {
    /// Resolve the connection URL: explicit value, then `DATABASE_URL`, then the local default
    pub fn database_url(&self) -> String {
        self.url
            .clone()
            .or_else(|| env::var("DATABASE_URL").ok())
            .unwrap_or_else(|| "postgresql://localhost/quest_development".to_string())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.max_connections == 0 {
            return Err(ConfigurationError::invalid_value(
                "database.max_connections",
                self.max_connections,
                "must be greater than 0",
            ));
        }
        Ok(())
    }
}

/// Retry settings for connection-class failures.
///
/// The delay is flat between attempts; there is no backoff.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts including the first one
    pub max_attempts: u32,
    /// Fixed wait between attempts in milliseconds
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 1_000,
        }
    }
}

impl RetryConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.max_attempts == 0 {
            return Err(ConfigurationError::invalid_value(
                "retry.max_attempts",
                self.max_attempts,
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Configuration for the tagged in-memory cache
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// When false the cache always misses and accepts every write
    pub enabled: bool,
    pub max_entries: usize,
    pub default_ttl_seconds: u64,
    /// Per-domain TTL overrides keyed by domain name
    pub domains: HashMap<String, DomainCacheConfig>,
}

/// Configuration for a single cache domain
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct DomainCacheConfig {
    pub ttl_seconds: u64,
}

impl DomainCacheConfig {
    pub fn ttl_duration(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        let domains = [
            ("users", 300),
            ("challenges", 600),
            ("sessions", 60),
            ("leaderboard", 30),
            ("badges", 3_600),
        ]
        .into_iter()
        .map(|(name, ttl_seconds)| (name.to_string(), DomainCacheConfig { ttl_seconds }))
        .collect();

        Self {
            enabled: true,
            max_entries: 10_000,
            default_ttl_seconds: 300,
            domains,
        }
    }
}

impl CacheConfig {
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_seconds)
    }

    /// TTL for a domain, falling back to the cache-wide default
    pub fn ttl_for_domain(&self, domain: &str) -> Duration {
        self.domains
            .get(domain)
            .map(DomainCacheConfig::ttl_duration)
            .unwrap_or_else(|| self.default_ttl())
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.max_entries == 0 {
            return Err(ConfigurationError::invalid_value(
                "cache.max_entries",
                self.max_entries,
                "must be greater than 0",
            ));
        }
        if self.default_ttl_seconds == 0 {
            return Err(ConfigurationError::invalid_value(
                "cache.default_ttl_seconds",
                self.default_ttl_seconds,
                "must be greater than 0",
            ));
        }
        for (domain, domain_config) in &self.domains {
            if domain_config.ttl_seconds == 0 {
                return Err(ConfigurationError::invalid_value(
                    format!("cache.domains.{domain}.ttl_seconds"),
                    domain_config.ttl_seconds,
                    "must be greater than 0",
                ));
            }
        }
        Ok(())
    }
}

/// Health monitor thresholds and schedule
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthConfig {
    pub check_interval_seconds: u64,
    /// Capacity of the latency ring buffer
    pub max_latency_samples: usize,
    /// Average latency above this marks the system degraded
    pub degraded_latency_ms: u64,
    /// More connection errors than this marks the system degraded
    pub degraded_error_threshold: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            check_interval_seconds: 60,
            max_latency_samples: 100,
            degraded_latency_ms: 500,
            degraded_error_threshold: 5,
        }
    }
}

impl HealthConfig {
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_seconds)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.check_interval_seconds == 0 {
            return Err(ConfigurationError::invalid_value(
                "health.check_interval_seconds",
                self.check_interval_seconds,
                "must be greater than 0",
            ));
        }
        if self.max_latency_samples == 0 {
            return Err(ConfigurationError::invalid_value(
                "health.max_latency_samples",
                self.max_latency_samples,
                "must be greater than 0",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Explicit filter directive; `RUST_LOG` still wins when set
    pub level: Option<String>,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}
