//! # Health Monitor
//!
//! Background prober for the shared persistence client. Probes once at start,
//! then every `health.check_interval_seconds`, recording latency samples in a
//! bounded ring buffer and counting connection errors. Callers only ever read
//! snapshots; probing never happens on the request path.

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::stats::{HealthReport, HealthStats, HealthStatus};
use crate::config::HealthConfig;
use crate::resilience::ResilientDataAccess;

#[derive(Debug, Default)]
struct MonitorState {
    connected: bool,
    last_check_at: Option<DateTime<Utc>>,
    connection_errors: u64,
    latencies: VecDeque<Duration>,
    last_status: Option<HealthStatus>,
}

impl MonitorState {
    fn record_latency(&mut self, latency: Duration, capacity: usize) {
        while self.latencies.len() >= capacity {
            self.latencies.pop_front();
        }
        self.latencies.push_back(latency);
    }

    fn average_latency(&self) -> Option<Duration> {
        if self.latencies.is_empty() {
            return None;
        }
        let total: Duration = self.latencies.iter().sum();
        Some(total / self.latencies.len() as u32)
    }

    fn status(&self, config: &HealthConfig) -> HealthStatus {
        HealthStatus::evaluate(
            self.connected,
            self.average_latency(),
            self.connection_errors,
            config,
        )
    }
}

pub struct HealthMonitor {
    data_access: Arc<ResilientDataAccess>,
    config: HealthConfig,
    state: RwLock<MonitorState>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for HealthMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthMonitor")
            .field("check_interval_seconds", &self.config.check_interval_seconds)
            .field("running", &self.is_running())
            .finish()
    }
}

impl HealthMonitor {
    /// Create a monitor without starting the background probe.
    ///
    /// The check interval and the sample capacity are raised to at least one.
    pub fn new(data_access: Arc<ResilientDataAccess>, mut config: HealthConfig) -> Self {
        if config.check_interval_seconds == 0 || config.max_latency_samples == 0 {
            warn!(
                check_interval_seconds = config.check_interval_seconds,
                max_latency_samples = config.max_latency_samples,
                "Health settings below minimum, using 1"
            );
            config.check_interval_seconds = config.check_interval_seconds.max(1);
            config.max_latency_samples = config.max_latency_samples.max(1);
        }

        Self {
            data_access,
            config,
            state: RwLock::new(MonitorState::default()),
            task: Mutex::new(None),
        }
    }

    /// Create a monitor and start probing immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(data_access: Arc<ResilientDataAccess>, config: HealthConfig) -> Arc<Self> {
        let monitor = Arc::new(Self::new(data_access, config));
        monitor.spawn();
        monitor
    }

    /// Spawn the probe loop, replacing any loop already running.
    ///
    /// The task holds only a weak reference, so dropping the last `Arc` also
    /// ends the loop.
    pub fn spawn(self: &Arc<Self>) {
        let interval_duration = self.config.check_interval();
        let weak = Arc::downgrade(self);

        info!(
            interval_seconds = self.config.check_interval_seconds,
            max_latency_samples = self.config.max_latency_samples,
            "🏥 Starting health monitor"
        );

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(interval_duration);

            loop {
                interval.tick().await;

                let Some(monitor) = weak.upgrade() else {
                    debug!("Health monitor dropped, stopping probe loop");
                    break;
                };
                monitor.check_health().await;
            }
        });

        if let Some(previous) = self.task.lock().replace(handle) {
            previous.abort();
        }
    }

    /// Probe the database once and update the statistics.
    ///
    /// Returns whether the probe succeeded. A probe slower than the check
    /// interval counts as a failure.
    pub async fn check_health(&self) -> bool {
        let timeout = self.config.check_interval();
        let result = match tokio::time::timeout(timeout, self.data_access.probe()).await {
            Ok(result) => result.map_err(|e| e.to_string()),
            Err(_elapsed) => Err(format!(
                "Health probe timed out after {}s",
                self.config.check_interval_seconds
            )),
        };
        let succeeded = result.is_ok();

        let (status, previous, connection_errors) = {
            let mut state = self.state.write();
            match &result {
                Ok(latency) => {
                    state.record_latency(*latency, self.config.max_latency_samples);
                    state.connected = true;
                }
                Err(_) => {
                    state.connected = false;
                    state.connection_errors += 1;
                }
            }
            state.last_check_at = Some(Utc::now());

            let status = state.status(&self.config);
            let previous = state.last_status.replace(status);
            (status, previous, state.connection_errors)
        };

        match &result {
            Ok(latency) => debug!(
                latency_ms = latency.as_millis(),
                status = %status,
                "Health probe succeeded"
            ),
            Err(e) => error!(
                error = %e,
                connection_errors = connection_errors,
                "Health probe failed"
            ),
        }

        if previous != Some(status) {
            match status {
                HealthStatus::Healthy => info!(
                    previous = ?previous,
                    "🟢 Database health is healthy"
                ),
                HealthStatus::Degraded => warn!(
                    previous = ?previous,
                    connection_errors = connection_errors,
                    "⚠️ Database health is degraded"
                ),
                HealthStatus::Critical => error!(
                    previous = ?previous,
                    connection_errors = connection_errors,
                    "🚨 Database health is critical"
                ),
            }
        }

        succeeded
    }

    pub fn get_health_stats(&self) -> HealthStats {
        let state = self.state.read();
        HealthStats {
            connected: state.connected,
            last_check_at: state.last_check_at,
            connection_errors: state.connection_errors,
            latency_samples: state.latencies.len(),
            average_latency: state.average_latency(),
            status: state.status(&self.config),
        }
    }

    /// Snapshot in the health endpoint's JSON shape
    pub fn health_report(&self) -> HealthReport {
        self.get_health_stats().to_report()
    }

    /// Clear the error counter and latency samples.
    pub fn reset_error_stats(&self) {
        let mut state = self.state.write();
        state.connection_errors = 0;
        state.latencies.clear();
        info!("Health monitor error statistics reset");
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stop the background probe loop.
    pub fn cleanup(&self) {
        if let Some(handle) = self.task.lock().take() {
            handle.abort();
            info!("🛑 Health monitor stopped");
        }
    }
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        if let Some(handle) = self.task.get_mut().take() {
            handle.abort();
        }
    }
}
