//! Uniform request pacing.
//!
//! A `RateLimiter` guarantees that two calls made through it start at least
//! `1 / max_per_second` apart, measured from the end of the previous call to
//! the start of the next. There is no burst allowance and no backoff.

use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard};
use tokio::time::{sleep, Instant};

/// Requests per second allowed against the Zendesk API.
pub const DEFAULT_MAX_PER_SECOND: u32 = 1;

/// Enforces a minimum interval between consecutive calls.
///
/// Holding a [`RatePermit`] keeps other callers waiting, so calls through the
/// same limiter never overlap. The clock restarts when the permit is dropped.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_call_ended: Mutex<Option<Instant>>,
}

/// Proof that the caller may issue one call now.
///
/// Drop it when the call has finished.
#[derive(Debug)]
pub struct RatePermit<'a> {
    last_call_ended: MutexGuard<'a, Option<Instant>>,
}

impl Drop for RatePermit<'_> {
    fn drop(&mut self) {
        *self.last_call_ended = Some(Instant::now());
    }
}

impl RateLimiter {
    /// Creates a limiter allowing `max_per_second` calls per second.
    ///
    /// A value of zero disables pacing.
    pub fn per_second(max_per_second: u32) -> Self {
        let min_interval = if max_per_second == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs(1) / max_per_second
        };
        Self::with_interval(min_interval)
    }

    /// Creates a limiter with an explicit minimum interval between calls.
    pub fn with_interval(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call_ended: Mutex::new(None),
        }
    }

    /// Creates a limiter that never waits.
    pub fn unlimited() -> Self {
        Self::with_interval(Duration::ZERO)
    }

    /// The configured minimum interval.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Waits until a call may start and returns the permit for it.
    pub async fn acquire(&self) -> RatePermit<'_> {
        let last_call_ended = self.last_call_ended.lock().await;

        if let Some(ended) = *last_call_ended {
            let elapsed = ended.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                tracing::trace!(wait_ms = wait.as_millis() as u64, "Pacing request");
                sleep(wait).await;
            }
        }

        RatePermit { last_call_ended }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::per_second(DEFAULT_MAX_PER_SECOND)
    }
}
