//! # Resilience Module
//!
//! Retry-with-reconnect around the shared persistence client.
//!
//! ## Architecture
//!
//! - **Classification**: a closed allowlist decides whether a failure is a
//!   transient connection error or a business error
//! - **Retry**: connection errors are retried up to `retry.max_attempts` times
//!   with a fixed `retry.delay_ms` wait (no backoff)
//! - **Reconnect**: each retry forces a disconnect/reconnect cycle; concurrent
//!   callers share one cycle instead of each triggering their own
//!
//! ## Usage
//!
//! ```rust,no_run
//! use quest_core::config::RetryConfig;
//! use quest_core::database::{ClientError, DatabaseClient, PgClient};
//! use quest_core::resilience::ResilientDataAccess;
//! use std::sync::Arc;
//!
//! # async fn example(pg: Arc<PgClient>) -> Result<(), Box<dyn std::error::Error>> {
//! let access = ResilientDataAccess::new(pg.clone(), RetryConfig::default());
//!
//! let total: i64 = access
//!     .execute_with_retry("counting challenges", || async {
//!         let pool = pg.pool().await?;
//!         sqlx::query_scalar("SELECT COUNT(*) FROM challenges")
//!             .fetch_one(&pool)
//!             .await
//!             .map_err(|e| pg.map_error(e))
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod data_access;
pub mod errors;
pub mod retry;

pub use classifier::{classify, is_connection_error, ConnectionErrorClass};
pub use data_access::ResilientDataAccess;
pub use errors::{DataAccessError, DataAccessResult};
pub use retry::RetryContext;
