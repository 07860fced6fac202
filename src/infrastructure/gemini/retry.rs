//! Retry policy with exponential backoff for Gemini API requests.
//!
//! Retries transient errors only (429, 5xx, timeouts); client errors fail
//! fast. Backoff doubles per attempt and is capped at `max_backoff_ms`.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

use super::error::GeminiApiError;

/// Retry policy with exponential backoff
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retries before giving up
    pub max_retries: u32,

    /// Initial backoff duration in milliseconds
    pub initial_backoff_ms: u64,

    /// Maximum backoff duration in milliseconds
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 1_000,
            max_backoff_ms: 30_000,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_backoff_ms: u64, max_backoff_ms: u64) -> Self {
        Self {
            max_retries,
            initial_backoff_ms,
            max_backoff_ms,
        }
    }

    /// Execute an operation, retrying transient failures with exponential
    /// backoff. Returns the first permanent error immediately.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T, GeminiApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, GeminiApiError>>,
    {
        let mut backoff_ms = self.initial_backoff_ms;

        for attempt in 0..=self.max_retries {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < self.max_retries => {
                    warn!(
                        attempt = attempt + 1,
                        max_retries = self.max_retries,
                        backoff_ms,
                        error = %err,
                        "Transient Gemini API error, retrying"
                    );
                    sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms = (backoff_ms * 2).min(self.max_backoff_ms);
                }
                Err(err) => return Err(err),
            }
        }

        unreachable!("retry loop always returns")
    }
}
