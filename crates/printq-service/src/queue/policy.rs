//! Bounded retry and per-call deadline for store operations.

use std::future::Future;

use tracing::warn;

use printq_core::config::QueueConfig;
use printq_core::error::AppError;
use printq_core::result::AppResult;

/// Wraps store calls with the retry and deadline rules from [`QueueConfig`].
///
/// Only transient faults are retried. A call that runs past the deadline is
/// dropped, which rolls back any transaction it had open.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: QueueConfig,
}

impl RetryPolicy {
    /// Creates a policy from queue configuration.
    pub fn new(config: QueueConfig) -> Self {
        Self { config }
    }

    /// The configuration this policy was built from.
    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Run `op` under the deadline, retrying transient failures.
    pub async fn retrying<T, F, Fut>(&self, name: &'static str, op: F) -> AppResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let attempts = self.config.retry_attempts.max(1);
        self.with_deadline(name, async {
            let mut attempt = 1;
            loop {
                match op().await {
                    Err(e) if e.is_transient() && attempt < attempts => {
                        warn!(
                            operation = name,
                            attempt,
                            error = %e,
                            "Transient store failure, retrying"
                        );
                        tokio::time::sleep(self.config.backoff_for(attempt)).await;
                        attempt += 1;
                    }
                    other => return other,
                }
            }
        })
        .await
    }

    /// Run `op` once under the deadline.
    pub async fn once<T, Fut>(&self, name: &'static str, op: Fut) -> AppResult<T>
    where
        Fut: Future<Output = AppResult<T>>,
    {
        self.with_deadline(name, op).await
    }

    async fn with_deadline<T, Fut>(&self, name: &'static str, op: Fut) -> AppResult<T>
    where
        Fut: Future<Output = AppResult<T>>,
    {
        let Some(limit) = self.config.operation_timeout() else {
            return op.await;
        };
        match tokio::time::timeout(limit, op).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    operation = name,
                    timeout_ms = self.config.operation_timeout_ms,
                    "Store call timed out"
                );
                Err(AppError::service_unavailable(format!(
                    "{name} did not finish within {}ms",
                    self.config.operation_timeout_ms
                )))
            }
        }
    }
}
