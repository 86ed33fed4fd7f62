//! Bounded retry with a fixed delay.
//!
//! Every browser-touching step of a run goes through [`RetryPolicy::guard_when`].
//! The operation is any closure producing a future, so the same policy wraps
//! steps with unrelated signatures and return types:
//!
//! ```ignore
//! let outcome = ctx
//!     .retry
//!     .guard_when("scrape page", BrowserError::is_transient, || controller.scrape_page())
//!     .await?;
//! ```
//!
//! # Retry Strategy
//!
//! - `max_attempts` tries in total (at least one)
//! - the same `delay` between consecutive attempts, no jitter
//! - the error of the last attempt is returned unchanged
//! - an error the predicate rejects (a malformed locator, say) is returned
//!   after the first attempt

use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{error, warn};

/// Retry parameters shared by every guarded step of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one.
    max_attempts: u32,
    /// Pause between two consecutive attempts.
    delay: Duration,
}

impl RetryPolicy {
    /// Build a policy. A `max_attempts` of zero is treated as one.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Total attempts per guarded step, never less than one.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Pause between two attempts of the same step.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `op` under this policy. See [`guard`].
    ///
    /// Errors `retryable` rejects are handed back at once; pass `|_| true`
    /// to treat every error as transient.
    ///
    /// # Arguments
    ///
    /// * `operation` - Label used in the attempt logs
    /// * `retryable` - Whether an error is worth another attempt
    /// * `op` - Produces a fresh future for every attempt
    ///
    /// # Errors
    ///
    /// The first error `retryable` rejects, or the last error once every
    /// attempt failed.
    pub async fn guard_when<T, E, P, F, Fut>(
        &self,
        operation: &str,
        retryable: P,
        op: F,
    ) -> Result<T, E>
    where
        P: Fn(&E) -> bool,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        guard(operation, self.max_attempts, self.delay, retryable, op).await
    }
}

/// Execute `op`, retrying failures up to `max_attempts` attempts in total.
///
/// Each failed attempt is logged with its number and error. When attempts
/// remain the call sleeps `delay` before trying again, so a run that fails
/// every time performs exactly `max_attempts - 1` sleeps before handing the
/// last error back to the caller. An error `retryable` rejects is returned
/// immediately, without sleeping.
pub async fn guard<T, E, P, F, Fut>(
    operation: &str,
    max_attempts: u32,
    delay: Duration,
    retryable: P,
    mut op: F,
) -> Result<T, E>
where
    P: Fn(&E) -> bool,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let max_attempts = max_attempts.max(1);
    let total_t0 = Instant::now();
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        let attempt_t0 = Instant::now();
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                let elapsed_ms_attempt = attempt_t0.elapsed().as_millis();
                let elapsed_ms_total = total_t0.elapsed().as_millis();

                if !retryable(&e) {
                    error!(
                        operation,
                        attempt,
                        elapsed_ms_total,
                        error = %e,
                        "Attempt failed with a permanent error; not retrying"
                    );
                    return Err(e);
                }
                if attempt >= max_attempts {
                    error!(
                        operation,
                        attempt,
                        max = max_attempts,
                        elapsed_ms_attempt,
                        elapsed_ms_total,
                        error = %e,
                        "All attempts failed"
                    );
                    return Err(e);
                }

                warn!(
                    operation,
                    attempt,
                    max = max_attempts,
                    elapsed_ms_attempt,
                    elapsed_ms_total,
                    ?delay,
                    error = %e,
                    "Attempt failed; retrying"
                );
                sleep(delay).await;
            }
        }
    }
}
