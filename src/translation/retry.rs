/*!
 * Bounded retries with exponential backoff around a single provider call.
 */

use log::{debug, warn};
use std::fmt;
use std::future::Future;
use std::time::Duration;

use crate::errors::ProviderError;

/// Retry policy for translation calls
///
/// Transient errors (network, timeout, 5xx, 429) are retried until
/// `max_attempts` calls have been made; permanent errors return immediately.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Delay before the second attempt
    pub base_delay: Duration,
    /// Upper bound for a single delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
        }
    }
}

/// Backoff state: the delay doubles after every retry, up to a cap
#[derive(Debug, Clone)]
pub struct Backoff {
    next_delay: Duration,
    max_delay: Duration,
}

impl Backoff {
    pub fn new(base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            next_delay: base_delay.min(max_delay),
            max_delay,
        }
    }

    /// Delay to wait now, advancing the state for the next retry
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.next_delay;
        self.next_delay = delay.saturating_mul(2).min(self.max_delay);
        delay
    }
}

/// The last error of an operation, with the number of attempts made
#[derive(Debug, Clone, PartialEq)]
pub struct RetryError {
    pub error: ProviderError,
    pub attempts: u32,
}

impl fmt::Display for RetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (after {} attempt", self.error, self.attempts)?;
        if self.attempts != 1 {
            f.write_str("s")?;
        }
        f.write_str(")")
    }
}

impl std::error::Error for RetryError {}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            max_delay,
        }
    }

    /// Run `operation` until it succeeds, fails permanently or runs out of attempts
    pub async fn execute<T, F, Fut>(&self, mut operation: F) -> Result<T, RetryError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut backoff = Backoff::new(self.base_delay, self.max_delay);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let error = match operation().await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            if !error.is_transient() {
                debug!("Permanent error, not retrying: {}", error);
                return Err(RetryError { error, attempts: attempt });
            }

            if attempt >= max_attempts {
                return Err(RetryError { error, attempts: attempt });
            }

            let delay = backoff.next_delay();
            warn!(
                "Transient error on attempt {}/{}: {} - retrying in {:?}",
                attempt, max_attempts, error, delay
            );
            tokio::time::sleep(delay).await;
        }
    }
}
