//! Queue engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Retry, deadline, and read-limit settings for the queue engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Total attempts for a retried engine call (claim, complete, and reads)
    /// that hits a transient store error.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    /// Base backoff between attempts in milliseconds (multiplied by attempt number).
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_ms: u64,
    /// Deadline for a single engine call in milliseconds (0 = none).
    #[serde(default = "default_operation_timeout")]
    pub operation_timeout_ms: u64,
    /// Upper bound (and default) for history listings.
    #[serde(default = "default_history_max_limit")]
    pub history_max_limit: i64,
}

impl QueueConfig {
    /// Backoff to wait before the given (1-based) retry attempt.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(u64::from(attempt)))
    }

    /// Per-call deadline, if one is configured.
    pub fn operation_timeout(&self) -> Option<Duration> {
        (self.operation_timeout_ms > 0).then(|| Duration::from_millis(self.operation_timeout_ms))
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            retry_attempts: default_retry_attempts(),
            retry_backoff_ms: default_retry_backoff(),
            operation_timeout_ms: default_operation_timeout(),
            history_max_limit: default_history_max_limit(),
        }
    }
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_backoff() -> u64 {
    50
}

fn default_operation_timeout() -> u64 {
    5000
}

fn default_history_max_limit() -> i64 {
    100
}
