//! Retry policy implementation.
//!
//! Only wrap operations that are safe to repeat. The policy itself does not
//! know which calls are idempotent; callers decide at the call site.

use cardstack_core::{CardstackError, CardstackResult};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Bounded retry with a fixed delay between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_delay: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy. `max_attempts` counts the first try and must be at least 1.
    pub fn new(max_attempts: u32, backoff_delay: Duration) -> CardstackResult<Self> {
        if max_attempts == 0 {
            return Err(CardstackError::Configuration(
                "retry max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            max_attempts,
            backoff_delay,
        })
    }

    /// Creates a policy with the default backoff and the given attempt count.
    pub fn with_max_attempts(max_attempts: u32) -> CardstackResult<Self> {
        Self::new(max_attempts, Self::default().backoff_delay)
    }

    /// Total number of attempts, including the first.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay slept between two attempts.
    #[must_use]
    pub const fn backoff_delay(&self) -> Duration {
        self.backoff_delay
    }

    /// Executes a function with retry logic.
    ///
    /// Returns the first success, or the error of the last attempt unchanged.
    pub async fn execute<F, Fut, T, E>(&self, mut f: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut attempt = 1;
        loop {
            match f().await {
                Ok(result) => return Ok(result),
                Err(e) if attempt >= self.max_attempts => {
                    debug!("Attempt {} of {} failed, giving up: {}", attempt, self.max_attempts, e);
                    return Err(e);
                }
                Err(e) => {
                    debug!(
                        "Attempt {} of {} failed: {}; retrying in {:?}",
                        attempt, self.max_attempts, e, self.backoff_delay
                    );
                    tokio::time::sleep(self.backoff_delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Like [`execute`](Self::execute) for remote calls, bounded by an
    /// optional overall call deadline.
    ///
    /// Errors that are not [retriable](CardstackError::is_retriable) are
    /// returned after the attempt that raised them. An attempt still running
    /// at the deadline is abandoned, and no backoff is started that would end
    /// past it. Both deadline cases surface [`CardstackError::Timeout`].
    pub async fn execute_until<F, Fut, T>(&self, deadline: Option<Instant>, mut f: F) -> CardstackResult<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = CardstackResult<T>>,
    {
        let mut attempt = 1;
        loop {
            let outcome = match deadline {
                Some(deadline) => tokio::time::timeout_at(deadline, f()).await.map_err(|_| {
                    CardstackError::Timeout(format!("call deadline elapsed during attempt {}", attempt))
                })?,
                None => f().await,
            };

            match outcome {
                Ok(result) => return Ok(result),
                Err(e) if !e.is_retriable() => {
                    debug!("Attempt {} failed with a non-retriable error: {}", attempt, e);
                    return Err(e);
                }
                Err(e) if attempt >= self.max_attempts => {
                    debug!("Attempt {} of {} failed, giving up: {}", attempt, self.max_attempts, e);
                    return Err(e);
                }
                Err(e) => {
                    if deadline.is_some_and(|d| Instant::now() + self.backoff_delay >= d) {
                        debug!("Call deadline leaves no room for attempt {}", attempt + 1);
                        return Err(CardstackError::Timeout(format!(
                            "call deadline elapsed after {} attempt(s); last error: {}",
                            attempt, e
                        )));
                    }
                    debug!(
                        "Attempt {} of {} failed: {}; retrying in {:?}",
                        attempt, self.max_attempts, e, self.backoff_delay
                    );
                    tokio::time::sleep(self.backoff_delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
