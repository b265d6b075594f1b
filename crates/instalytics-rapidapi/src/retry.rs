//! Retry with exponential back-off and jitter for upstream calls.
//!
//! Off by default (`max_retries = 0`); operators opt in through
//! `RAPIDAPI_MAX_RETRIES` when the upstream plan tolerates the extra calls.

use std::future::Future;
use std::time::Duration;

use crate::error::RapidApiError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:**
/// - Network-level failures: timeout, connection refused or reset.
/// - HTTP 429 (upstream rate limit) and 503 (service unavailable).
///
/// **Not retriable:**
/// - Any other upstream status, e.g. 401/403 for a bad key or 404 for an
///   unknown profile.
/// - [`RapidApiError::Deserialize`] and [`RapidApiError::InvalidBaseUrl`].
pub(crate) fn is_retriable(err: &RapidApiError) -> bool {
    match err {
        RapidApiError::Http(e) => e.is_timeout() || e.is_connect(),
        RapidApiError::Status { status, .. } => matches!(status, 429 | 503),
        RapidApiError::Deserialize { .. } | RapidApiError::InvalidBaseUrl { .. } => false,
    }
}

/// Longest wait between two RapidAPI attempts.
const MAX_DELAY: Duration = Duration::from_secs(30);

/// Wait before retry `attempt` (1-based), before jitter.
///
/// With the default `RAPIDAPI_RETRY_BACKOFF_BASE_MS` of 1000 the schedule
/// is 1 s, 2 s, 4 s, 8 s, 16 s, then 30 s for every later attempt.
fn backoff_delay(base_ms: u64, attempt: u32) -> Duration {
    let factor = 1u64 << attempt.saturating_sub(1).min(10);
    Duration::from_millis(base_ms.saturating_mul(factor)).min(MAX_DELAY)
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// Each wait is [`backoff_delay`] scaled by a random factor in
/// `[0.75, 1.25)`. Non-retriable errors are returned immediately.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, RapidApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RapidApiError>>,
{
    let mut attempt = 0u32;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if is_retriable(&err) && attempt < max_retries => err,
            Err(err) => return Err(err),
        };
        attempt += 1;
        let jitter: f64 = rand::random_range(0.75..1.25);
        let delay = backoff_delay(backoff_base_ms, attempt).mul_f64(jitter);
        tracing::warn!(
            attempt,
            max_retries,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "RapidAPI call failed, retrying"
        );
        tokio::time::sleep(delay).await;
    }
}
