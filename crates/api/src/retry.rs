//! Caller-level retry for transient failures.
//!
//! Lives above the gateway: the gateway itself never retries beyond its
//! single 401 refresh-and-retry, so list screens that want resilience
//! against flaky transport wrap their calls here.

use feegate_types::Result;
use std::future::Future;
use std::time::Duration;

/// Runs `op` up to `attempts` times, sleeping `delay` between attempts.
///
/// Only retryable errors (transient transport failures and 408/429/5xx
/// statuses) are retried; auth failures, cancellations, and client errors
/// return immediately.
///
/// # Errors
///
/// The last error once attempts are exhausted, or the first non-retryable
/// error.
pub async fn with_retry<T, F, Fut>(attempts: u32, delay: Duration, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < attempts && e.is_retryable() => {
                tracing::warn!(attempt, error = %e, "retryable error, backing off");
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
