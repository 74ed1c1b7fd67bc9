use std::time::Duration;

use crate::config::RetryConfig;

/// Progress of one `execute_with_retry` call.
///
/// `attempt` is 1-based and counts the attempt currently running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryContext {
    pub label: String,
    pub attempt: u32,
    pub max_attempts: u32,
    /// Flat wait between attempts; there is no backoff
    pub delay: Duration,
}

impl RetryContext {
    pub fn new(label: impl Into<String>, config: &RetryConfig) -> Self {
        Self {
            label: label.into(),
            attempt: 1,
            max_attempts: config.max_attempts.max(1),
            delay: config.delay(),
        }
    }

    pub fn has_attempts_remaining(&self) -> bool {
        self.attempt < self.max_attempts
    }

    pub fn advance(&mut self) {
        self.attempt += 1;
    }
}
