//! Bounded retry with fixed backoff for external calls

use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::platform::Delay;

/// Maximum attempts and the pause between them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_ms: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_ms: 1000,
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no backoff
    pub const fn once() -> Self {
        Self {
            max_attempts: 1,
            backoff_ms: 0,
        }
    }

    /// Run `op` until it succeeds, fails permanently, or attempts run out.
    ///
    /// Only transient failures (`ClientError::is_transient`) are retried; the
    /// last error is returned when the budget is spent.
    pub async fn run<T, F, Fut>(&self, delay: &impl Delay, mut op: F) -> Result<T, ClientError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < attempts => {
                    log::warn!("Attempt {attempt}/{attempts} failed: {err} - retrying");
                    delay.sleep(self.backoff_ms).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
