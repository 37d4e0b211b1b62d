//! Retry with bounded exponential backoff
//!
//! [`with_retry`] wraps a zero-argument async operation and re-runs it while
//! it fails with a retryable error. Only transient transport failures are
//! retryable by default; business errors such as an [`FibError::Api`]
//! propagate on the first occurrence.
//!
//! ```
//! use fib_payments::retry::{with_retry, RetryPolicy};
//! use std::time::Duration;
//!
//! # async fn example() -> fib_payments::Result<()> {
//! let policy = RetryPolicy::new()
//!     .with_max_attempts(5)
//!     .with_initial_delay(Duration::from_millis(50));
//!
//! let value = with_retry(&policy, || async { Ok::<_, fib_payments::FibError>(42) }).await?;
//! assert_eq!(value, 42);
//! # Ok(())
//! # }
//! ```

use crate::{FibError, Result};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Predicate deciding whether a failure may be retried
pub type RetryPredicate = Arc<dyn Fn(&FibError) -> bool + Send + Sync>;

/// Bounded exponential-backoff retry policy
#[derive(Clone)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one
    pub max_attempts: u32,
    /// Wait before the second attempt
    pub initial_delay: Duration,
    /// Upper bound for any single wait
    pub max_delay: Duration,
    /// Multiplier applied to the wait after each failed attempt
    pub backoff_factor: f64,
    retryable: RetryPredicate,
}

impl std::fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("initial_delay", &self.initial_delay)
            .field("max_delay", &self.max_delay)
            .field("backoff_factor", &self.backoff_factor)
            .field("retryable", &"<function>")
            .finish()
    }
}

impl RetryPolicy {
    /// Create a policy with the default settings
    pub fn new() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            backoff_factor: 2.0,
            retryable: Arc::new(FibError::is_transient),
        }
    }

    /// A policy that makes a single attempt
    pub fn no_retry() -> Self {
        Self::new().with_max_attempts(1)
    }

    /// Set the total number of attempts
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the wait before the second attempt
    pub fn with_initial_delay(mut self, initial_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self
    }

    /// Set the cap for a single wait
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Set the backoff multiplier
    pub fn with_backoff_factor(mut self, backoff_factor: f64) -> Self {
        self.backoff_factor = backoff_factor;
        self
    }

    /// Replace the set of retryable conditions
    pub fn with_retryable<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&FibError) -> bool + Send + Sync + 'static,
    {
        self.retryable = Arc::new(predicate);
        self
    }

    /// Whether `error` belongs to the retryable conditions
    pub fn is_retryable(&self, error: &FibError) -> bool {
        (self.retryable)(error)
    }

    /// Wait after the failed attempt with zero-based index `attempt`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let secs = self.initial_delay.as_secs_f64() * self.backoff_factor.powi(exponent);
        if !secs.is_finite() || secs < 0.0 || secs >= self.max_delay.as_secs_f64() {
            return self.max_delay;
        }
        Duration::from_secs_f64(secs)
    }

    /// Run `operation` under this policy
    pub async fn run<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        with_retry(self, operation).await
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Run `operation`, retrying retryable failures according to `policy`.
///
/// Fails with [`FibError::RetryExhausted`] when the last permitted attempt
/// fails with a retryable error. A non-retryable error is returned as-is
/// without waiting.
pub async fn with_retry<F, Fut, T>(policy: &RetryPolicy, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt: u32 = 0;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if !policy.is_retryable(&err) => return Err(err),
            Err(err) => {
                attempt += 1;
                if attempt >= max_attempts {
                    tracing::error!(
                        "Operation failed after {} attempts: {}",
                        max_attempts,
                        err
                    );
                    return Err(FibError::RetryExhausted {
                        attempts: max_attempts,
                        source: Box::new(err),
                    });
                }

                let delay = policy.delay_for(attempt - 1);
                tracing::warn!(
                    attempt = attempt,
                    max_attempts = max_attempts,
                    next_delay_ms = delay.as_millis() as u64,
                    "retrying transient failure: {}",
                    err
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
