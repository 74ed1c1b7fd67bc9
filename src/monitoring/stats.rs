//! Health snapshots and the operator-facing report format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::config::HealthConfig;

/// Overall health classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Critical,
}

impl HealthStatus {
    /// Derive status from the current connection state.
    ///
    /// `Critical` when disconnected. With no latency samples the status is
    /// `Degraded` if any connection error was ever recorded, else `Healthy`.
    /// Otherwise `Degraded` when the average latency or the error count exceeds
    /// its threshold.
    pub fn evaluate(
        connected: bool,
        average_latency: Option<Duration>,
        connection_errors: u64,
        config: &HealthConfig,
    ) -> Self {
        if !connected {
            return HealthStatus::Critical;
        }

        match average_latency {
            None if connection_errors > 0 => HealthStatus::Degraded,
            None => HealthStatus::Healthy,
            Some(latency)
                if latency > Duration::from_millis(config.degraded_latency_ms)
                    || connection_errors > config.degraded_error_threshold =>
            {
                HealthStatus::Degraded
            }
            Some(_) => HealthStatus::Healthy,
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "healthy"),
            HealthStatus::Degraded => write!(f, "degraded"),
            HealthStatus::Critical => write!(f, "critical"),
        }
    }
}

/// Point-in-time copy of the monitor's statistics
#[derive(Debug, Clone, PartialEq)]
pub struct HealthStats {
    pub connected: bool,
    pub last_check_at: Option<DateTime<Utc>>,
    pub connection_errors: u64,
    /// Number of latency samples currently held
    pub latency_samples: usize,
    pub average_latency: Option<Duration>,
    pub status: HealthStatus,
}

impl HealthStats {
    pub fn to_report(&self) -> HealthReport {
        HealthReport {
            status: self.status,
            connection_errors: self.connection_errors,
            average_latency: self
                .average_latency
                .map(|latency| latency.as_micros() as f64 / 1_000.0),
            is_connected: self.connected,
            last_check_time: self.last_check_at,
        }
    }
}

/// JSON body served by the health endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: HealthStatus,
    pub connection_errors: u64,
    /// Average probe latency in milliseconds
    pub average_latency: Option<f64>,
    pub is_connected: bool,
    pub last_check_time: Option<DateTime<Utc>>,
}
