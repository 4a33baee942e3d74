//! Pacing and retry for detail requests.
//!
//! Every attempt is preceded by a fixed pacing delay. Transport failures and
//! non-200 responses are retried after a linearly growing backoff; anything
//! else (parse failures, normalization errors) is returned immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Retry and pacing knobs for one item's fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Values below 1 are treated as 1.
    pub max_attempts: u32,
    /// Sleep before every attempt, successful or not.
    pub pacing: Duration,
    /// Backoff after the first failed attempt.
    pub backoff_initial: Duration,
    /// Added to the backoff after each further failed attempt.
    pub backoff_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            pacing: Duration::from_millis(200),
            backoff_initial: Duration::from_secs(3),
            backoff_step: Duration::from_secs(3),
        }
    }
}

impl RetryPolicy {
    /// Backoff slept after failed attempt `attempt` (1-based):
    /// `backoff_initial + backoff_step * (attempt - 1)`.
    ///
    /// | Failed attempt | Backoff (defaults) |
    /// |----------------|--------------------|
    /// | 1              | 3 s                |
    /// | 2              | 6 s                |
    /// | 3              | 9 s                |
    #[must_use]
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        self.backoff_initial + self.backoff_step.saturating_mul(attempt.saturating_sub(1))
    }
}

/// Transport failures and non-200 statuses are worth another attempt.
fn is_retriable(err: &ScraperError) -> bool {
    matches!(
        err,
        ScraperError::Http(_) | ScraperError::UnexpectedStatus { .. }
    )
}

/// Runs `operation` for `item` under `policy`.
///
/// Each attempt sleeps `policy.pacing` first. After a retriable failure the
/// backoff for that attempt is slept before the next one; no backoff follows
/// the final attempt. When the attempts run out the last failure is wrapped in
/// [`ScraperError::RetriesExhausted`]. Non-retriable errors are returned as-is.
pub(crate) async fn retry_with_linear_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    item: &str,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        if !policy.pacing.is_zero() {
            tokio::time::sleep(policy.pacing).await;
        }

        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if !is_retriable(&err) => return Err(err),
            Err(err) => err,
        };

        if attempt >= max_attempts {
            return Err(ScraperError::RetriesExhausted {
                item: item.to_owned(),
                attempts: attempt,
                last: Box::new(err),
            });
        }

        let delay = policy.backoff_after(attempt);
        tracing::warn!(
            item,
            attempt,
            max_attempts,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "product fetch failed, retrying after backoff"
        );
        tokio::time::sleep(delay).await;
    }
}
