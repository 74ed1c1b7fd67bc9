#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Quest Core
//!
//! Resilient data-access and caching core for the Quest challenges platform.
//!
//! ## Overview
//!
//! Route handlers, badge scoring and the admin panel all read through this crate.
//! It keeps hot reads in an in-process tagged cache, retries only genuine
//! connection failures against the database, and watches database health in the
//! background.
//!
//! ## Architecture
//!
//! ```text
//! handler ──► DomainCacheManager ──miss──► ResilientDataAccess ──► DatabaseClient
//!                   │                              ▲
//!                   ▼                              │ probe
//!              TaggedCache                   HealthMonitor
//! ```
//!
//! ## Module Organization
//!
//! - [`cache`] - Tagged TTL cache and per-domain namespaces
//! - [`resilience`] - Error classification and retry-with-reconnect
//! - [`database`] - Persistence client capability and PostgreSQL implementation
//! - [`monitoring`] - Background health monitor and health report
//! - [`config`] - Layered configuration
//! - [`system_context`] - Composition root
//! - [`logging`] - Structured logging setup
//! - [`error`] - Crate-level error type
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quest_core::cache::CacheOptions;
//! use quest_core::database::ClientError;
//! use quest_core::SystemContext;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! quest_core::logging::init_structured_logging();
//! let context = SystemContext::new().await?;
//! let challenges = context.domain_cache("challenges");
//!
//! let title: String = challenges
//!     .get_or_set(
//!         "featured",
//!         || async { Ok::<_, ClientError>("30 day streak".to_string()) },
//!         CacheOptions::new().with_tag(challenges.entity_tag(42)),
//!     )
//!     .await?;
//!
//! println!("{title}: {}", serde_json::to_string(&context.health_monitor.health_report())?);
//! context.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod monitoring;
pub mod resilience;
pub mod system_context;

pub use cache::{CacheOptions, DomainCacheManager, TaggedCache};
pub use config::{ConfigManager, CoreConfig};
pub use database::{ClientError, DatabaseClient, PgClient};
pub use error::{CoreError, Result};
pub use monitoring::{HealthMonitor, HealthReport, HealthStatus};
pub use resilience::{DataAccessError, ResilientDataAccess};
pub use system_context::SystemContext;
