//! Retry/backoff controller for remote fetches
//!
//! Wraps a fetch operation with a process-wide minimum-interval throttle,
//! bounded retries for rate-limit class failures, and exponential delay
//! growth between attempts. Any non-rate-limit failure aborts immediately;
//! exhausting the attempt budget yields `Ok(None)` so callers can fall
//! back to the local cache instead of surfacing an error.

use std::future::Future;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::data::SheetsError;

/// Maximum number of attempts per logical fetch cycle
pub const MAX_ATTEMPTS: u32 = 3;

/// Base delay before the first rate-limit retry; doubles each attempt
/// (2s, 4s, ...)
pub const BASE_DELAY: Duration = Duration::from_millis(2000);

/// Minimum interval between remote attempts across the whole process
pub const MIN_CALL_INTERVAL: Duration = Duration::from_millis(1000);

/// Process-wide throttle on remote attempts.
///
/// A single instance is shared by (injected into) every caller, so the
/// effective call rate is serialized regardless of which logical caller
/// triggers a fetch. The last-attempt timestamp is the only cross-call
/// shared state.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_attempt: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Creates a limiter with the standard 1-second minimum interval.
    pub fn new() -> Self {
        Self::with_interval(MIN_CALL_INTERVAL)
    }

    /// Creates a limiter with a custom interval (shorter in tests).
    pub fn with_interval(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_attempt: Mutex::new(None),
        }
    }

    /// Blocks until the minimum interval since the last recorded attempt
    /// has elapsed, then records the current attempt.
    pub async fn acquire(&self) {
        let mut last = self.last_attempt.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                debug!(wait_ms = wait.as_millis() as u64, "throttling remote call");
                tokio::time::sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs `fetch` with throttling and bounded exponential backoff.
///
/// Per attempt:
/// - success returns `Ok(Some(value))`, ending the cycle;
/// - a rate-limit class failure (HTTP 429) waits `BASE_DELAY × 2^(n-1)`
///   and retries, up to [`MAX_ATTEMPTS`] attempts total;
/// - any other failure propagates immediately with no retry.
///
/// Exhausting the attempt budget returns `Ok(None)` rather than an error:
/// the caller is expected to fall back to its cache.
pub async fn fetch_with_backoff<T, F, Fut>(
    limiter: &RateLimiter,
    fetch: F,
) -> Result<Option<T>, SheetsError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, SheetsError>>,
{
    for attempt in 1..=MAX_ATTEMPTS {
        limiter.acquire().await;

        match fetch().await {
            Ok(value) => return Ok(Some(value)),
            Err(e) if e.is_rate_limited() => {
                if attempt == MAX_ATTEMPTS {
                    warn!(attempts = MAX_ATTEMPTS, "rate limited on final attempt, giving up");
                    return Ok(None);
                }
                let delay = BASE_DELAY * 2u32.pow(attempt - 1);
                debug!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "rate limited, backing off"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(None)
}
