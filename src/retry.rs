//! Exponential backoff retry.
//!
//! The delay after the `n`th failed attempt is `base_delay ^ n` seconds, so
//! with a 2s base the waits are 2s, 4s, 8s, ... No delay follows the final
//! attempt.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::RetryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    pub base_delay: Duration,
    pub max_attempts: u32,
}

impl Backoff {
    pub fn new(base_delay: Duration, max_attempts: u32) -> Self {
        Self {
            base_delay,
            max_attempts,
        }
    }

    /// Whether another attempt may run after `failures_so_far` failures.
    pub fn should_retry(&self, failures_so_far: u32) -> bool {
        failures_so_far < self.max_attempts
    }

    /// Delay taken after the `failures`th failed attempt: `base ^ failures`
    /// seconds. Values that do not fit a `Duration` saturate.
    pub fn delay_for(&self, failures: u32) -> Duration {
        let secs = self.base_delay.as_secs_f64().powf(f64::from(failures));
        Duration::try_from_secs_f64(secs).unwrap_or(if secs > 0.0 {
            Duration::MAX
        } else {
            Duration::ZERO
        })
    }

    /// Delays between consecutive attempts of an exhausted call, in order.
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        let backoff = *self;
        (1..backoff.max_attempts).map(move |failures| backoff.delay_for(failures))
    }

    pub fn total_delay(&self) -> Duration {
        self.delays()
            .fold(Duration::ZERO, |total, delay| total.saturating_add(delay))
    }

    /// Runs `operation` until it succeeds or the attempt budget is spent,
    /// blocking the current thread between attempts.
    pub fn retry<T, E, F>(&self, operation: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Result<T, E>,
    {
        self.retry_with_sleep(operation, std::thread::sleep)
    }

    /// Same as [`Backoff::retry`], with `sleep` called for every delay.
    pub fn retry_with_sleep<T, E, F, S>(
        &self,
        mut operation: F,
        mut sleep: S,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Result<T, E>,
        S: FnMut(Duration),
    {
        let mut failures = 0_u32;
        let mut last_error = None;

        while self.should_retry(failures) {
            match operation() {
                Ok(value) => return Ok(value),
                Err(err) => last_error = Some(err),
            }

            failures += 1;
            if let Some(delay) = self.next_delay(failures) {
                sleep(delay);
            }
        }

        self.exhausted(last_error)
    }

    /// Async counterpart of [`Backoff::retry`]; waits with `tokio::time::sleep`
    /// instead of blocking the thread.
    pub async fn retry_async<T, E, F, Fut>(&self, mut operation: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut failures = 0_u32;
        let mut last_error = None;

        while self.should_retry(failures) {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => last_error = Some(err),
            }

            failures += 1;
            if let Some(delay) = self.next_delay(failures) {
                tokio::time::sleep(delay).await;
            }
        }

        self.exhausted(last_error)
    }

    fn next_delay(&self, failures: u32) -> Option<Duration> {
        if !self.should_retry(failures) {
            return None;
        }

        let delay = self.delay_for(failures);
        debug!(
            attempt = failures,
            max_attempts = self.max_attempts,
            delay_ms = delay.as_millis(),
            "attempt failed; backing off"
        );
        Some(delay)
    }

    fn exhausted<T, E>(&self, last_error: Option<E>) -> Result<T, RetryError<E>> {
        match last_error {
            Some(err) => {
                warn!(max_attempts = self.max_attempts, "retry budget exhausted");
                Err(RetryError::Exhausted(err))
            }
            None => Err(RetryError::NoAttempts),
        }
    }
}

/// Invokes `operation` up to `max_attempts` times, sleeping `base_delay ^ n`
/// seconds after the `n`th failure. Returns the first success or the error
/// from the final attempt. A zero budget never calls `operation` and yields
/// [`RetryError::NoAttempts`].
pub fn retry<T, E, F>(
    operation: F,
    base_delay: Duration,
    max_attempts: u32,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Result<T, E>,
{
    Backoff::new(base_delay, max_attempts).retry(operation)
}

pub async fn retry_async<T, E, F, Fut>(
    operation: F,
    base_delay: Duration,
    max_attempts: u32,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    Backoff::new(base_delay, max_attempts)
        .retry_async(operation)
        .await
}
