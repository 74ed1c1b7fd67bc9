//! # Monitoring Module
//!
//! Background database health monitoring and the health report served to
//! operators.

pub mod health_monitor;
pub mod stats;

pub use health_monitor::HealthMonitor;
pub use stats::{HealthReport, HealthStats, HealthStatus};
