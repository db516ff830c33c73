//! Bounded retry with exponential backoff.
//!
//! Every call to the object store goes through [`RetryExecutor::run`]. Attempts
//! run strictly one after another on the calling task; the backoff sleep holds
//! the request until the next attempt.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

/// Retry configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first one.
    pub max_retries: u32,
    /// Backoff before the second attempt; doubled for each later attempt.
    pub base_backoff: Duration,
}

impl RetryPolicy {
    /// Default attempt budget.
    pub const DEFAULT_MAX_RETRIES: u32 = 3;
    /// Default base backoff: 1 second.
    pub const DEFAULT_BASE_BACKOFF: Duration = Duration::from_millis(1000);

    /// Create a policy.
    #[must_use]
    pub const fn new(max_retries: u32, base_backoff: Duration) -> Self {
        Self {
            max_retries,
            base_backoff,
        }
    }

    /// Policy that never sleeps between attempts.
    #[must_use]
    pub const fn immediate(max_retries: u32) -> Self {
        Self::new(max_retries, Duration::ZERO)
    }

    /// Number of attempts actually made; a zero budget still tries once.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        if self.max_retries == 0 {
            1
        } else {
            self.max_retries
        }
    }

    /// Sleep that follows failed attempt `attempt` (0-based): `base * 2^attempt`.
    #[must_use]
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_backoff.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_RETRIES, Self::DEFAULT_BASE_BACKOFF)
    }
}

/// Failure after the attempt budget is spent.
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// Every attempt failed; carries the last underlying error.
    #[error("{label} failed after {attempts} attempt(s): {source}")]
    Exhausted {
        /// Operation label used for diagnostics.
        label: String,
        /// Attempts made.
        attempts: u32,
        /// Error returned by the final attempt.
        #[source]
        source: E,
    },
}

impl<E> RetryError<E> {
    /// The last underlying error.
    pub fn last_error(&self) -> &E {
        match self {
            Self::Exhausted { source, .. } => source,
        }
    }

    /// Consume the wrapper and return the last underlying error.
    pub fn into_last_error(self) -> E {
        match self {
            Self::Exhausted { source, .. } => source,
        }
    }

    /// Attempts made before giving up.
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Exhausted { attempts, .. } => *attempts,
        }
    }
}

/// Runs fallible async operations under a [`RetryPolicy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    /// Create an executor for the given policy.
    #[must_use]
    pub const fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// The policy in effect.
    #[must_use]
    pub const fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Run `operation` until it succeeds or the attempt budget is spent.
    ///
    /// Only wrap operations that are safe to repeat. A `PUT` to a freshly
    /// generated random key is not: a retry after an ambiguous timeout can
    /// leave a second copy behind. Callers derive keys deterministically.
    ///
    /// # Errors
    ///
    /// Returns [`RetryError::Exhausted`] with the final error once every
    /// attempt has failed.
    pub async fn run<T, E, F, Fut>(&self, label: &str, mut operation: F) -> Result<T, RetryError<E>>
    where
        E: Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let attempts = self.policy.attempts();
        let mut attempt = 0;

        loop {
            if attempt > 0 {
                debug!(label, attempt, "retrying storage operation");
            }

            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    debug!(label, attempt, error = %err, "storage operation attempt failed");

                    if attempt + 1 >= attempts {
                        warn!(label, attempts, error = %err, "storage operation exhausted retries");
                        return Err(RetryError::Exhausted {
                            label: label.to_string(),
                            attempts,
                            source: err,
                        });
                    }

                    let backoff = self.policy.backoff_for(attempt);
                    debug!(label, backoff_ms = backoff.as_millis(), "waiting before retry");
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests;
