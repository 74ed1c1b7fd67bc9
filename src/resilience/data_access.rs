//! # Resilient Data Access
//!
//! Wraps the shared persistence client. Every data-access call site runs its
//! query through [`ResilientDataAccess::execute_with_retry`], which retries only
//! the narrow connection-failure class with a fixed delay and a forced
//! disconnect/reconnect between attempts. Business errors surface immediately.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use super::classifier::classify;
use super::errors::{DataAccessError, DataAccessResult};
use super::retry::RetryContext;
use crate::config::RetryConfig;
use crate::database::{ClientError, DatabaseClient};

pub struct ResilientDataAccess {
    client: Arc<dyn DatabaseClient>,
    config: RetryConfig,
    /// Number of completed reconnect cycles
    epoch: AtomicU64,
    /// Serializes reconnect cycles
    reconnect_lock: Mutex<()>,
}

impl std::fmt::Debug for ResilientDataAccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResilientDataAccess")
            .field("config", &self.config)
            .field("epoch", &self.epoch.load(Ordering::Relaxed))
            .finish()
    }
}

impl ResilientDataAccess {
    pub fn new(client: Arc<dyn DatabaseClient>, config: RetryConfig) -> Self {
        info!(
            max_attempts = config.max_attempts,
            delay_ms = config.delay_ms,
            "🛡️ Resilient data access initialized"
        );

        Self {
            client,
            config,
            epoch: AtomicU64::new(0),
            reconnect_lock: Mutex::new(()),
        }
    }

    pub fn client(&self) -> &Arc<dyn DatabaseClient> {
        &self.client
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.config
    }

    /// Number of disconnect/reconnect cycles run so far
    pub fn reconnect_count(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }

    pub async fn connect(&self) -> Result<(), ClientError> {
        self.client.connect().await
    }

    pub async fn disconnect(&self) -> Result<(), ClientError> {
        self.client.disconnect().await
    }

    /// Run `operation`, retrying connection failures.
    ///
    /// Returns the first success, the first business error unchanged, or
    /// `RetriesExhausted` once every attempt failed with a connection error.
    pub async fn execute_with_retry<T, F, Fut>(
        &self,
        context: &str,
        operation: F,
    ) -> DataAccessResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        self.execute_with_retry_until(context, operation, std::future::pending::<()>())
            .await
    }

    /// Same as [`Self::execute_with_retry`], aborting with `Cancelled` as soon
    /// as `cancel` completes. Cancellation interrupts a running attempt or the
    /// inter-attempt delay; an in-progress reconnect is allowed to finish.
    pub async fn execute_with_retry_until<T, F, Fut, C>(
        &self,
        context: &str,
        mut operation: F,
        cancel: C,
    ) -> DataAccessResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
        C: Future<Output = ()>,
    {
        tokio::pin!(cancel);
        let mut retry = RetryContext::new(context, &self.config);

        loop {
            let observed_epoch = self.epoch.load(Ordering::Acquire);

            let result = tokio::select! {
                biased;
                _ = &mut cancel => return Err(self.cancelled(&retry)),
                result = operation() => result,
            };

            let error = match result {
                Ok(value) => {
                    if retry.attempt > 1 {
                        info!(
                            context = %retry.label,
                            attempt = retry.attempt,
                            "🟢 Operation succeeded after retry"
                        );
                    }
                    return Ok(value);
                }
                Err(error) => error,
            };

            if !classify(&error).is_retryable() {
                debug!(
                    context = %retry.label,
                    error = %error,
                    "Business error, not retrying"
                );
                return Err(DataAccessError::Query(error));
            }

            if !retry.has_attempts_remaining() {
                error!(
                    context = %retry.label,
                    attempts = retry.max_attempts,
                    error = %error,
                    "🔴 Connection retries exhausted"
                );
                return Err(DataAccessError::RetriesExhausted {
                    context: retry.label,
                    attempts: retry.max_attempts,
                    last_error: error,
                });
            }

            warn!(
                context = %retry.label,
                attempt = retry.attempt,
                max_attempts = retry.max_attempts,
                delay_ms = retry.delay.as_millis(),
                error = %error,
                "Connection error, retrying"
            );

            tokio::select! {
                biased;
                _ = &mut cancel => return Err(self.cancelled(&retry)),
                _ = tokio::time::sleep(retry.delay) => {}
            }

            self.reconnect(observed_epoch).await;
            retry.advance();
        }
    }

    /// One timed round-trip, no retry and no reconnect
    pub async fn probe(&self) -> Result<Duration, ClientError> {
        let started = Instant::now();
        self.client.ping().await?;
        Ok(started.elapsed())
    }

    /// Disconnect and reconnect unless another caller already did so since
    /// `observed_epoch` was read.
    async fn reconnect(&self, observed_epoch: u64) {
        let _guard = self.reconnect_lock.lock().await;

        if self.epoch.load(Ordering::Acquire) != observed_epoch {
            debug!(observed_epoch, "Reconnect already performed by another caller");
            return;
        }

        info!(epoch = observed_epoch, "🔄 Reconnecting database client");

        if let Err(e) = self.client.disconnect().await {
            warn!(error = %e, "Disconnect before reconnect failed");
        }
        match self.client.connect().await {
            Ok(()) => info!("Database client reconnected"),
            Err(e) => error!(error = %e, "Reconnect failed"),
        }

        // Counted even on failure so waiting callers do not repeat the cycle
        self.epoch.fetch_add(1, Ordering::AcqRel);
    }

    fn cancelled(&self, retry: &RetryContext) -> DataAccessError {
        warn!(
            context = %retry.label,
            attempt = retry.attempt,
            "Operation cancelled during retry"
        );
        DataAccessError::Cancelled {
            context: retry.label.clone(),
            attempts: retry.attempt,
        }
    }
}
