//! Retry with exponential backoff for transient remote failures.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, instrument, warn};
use vermeer_error::RetryableError;

/// Retries `operation` while it fails with a retryable error.
///
/// The error's own strategy supplies the initial backoff, the delay cap and
/// an upper bound on retries; `max_retries` can only lower that bound. The
/// delay doubles after every failed attempt.
#[instrument(skip(operation))]
pub async fn retry_with_backoff<F, Fut, T, E>(max_retries: usize, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: RetryableError + Display,
{
    let mut attempt = 0;
    let mut backoff: Option<Duration> = None;

    loop {
        attempt += 1;
        debug!(attempt, "Executing operation");

        let err = match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!(attempt, "Operation succeeded after retry");
                }
                return Ok(result);
            }
            Err(err) => err,
        };

        if !err.is_retryable() {
            debug!(error = %err, "Error is not retryable, failing immediately");
            return Err(err);
        }

        let (initial_ms, strategy_retries, max_delay_secs) = err.retry_strategy_params();
        if attempt > max_retries.min(strategy_retries) {
            warn!(attempt, error = %err, "All retry attempts exhausted");
            return Err(err);
        }

        let delay = backoff
            .map_or(Duration::from_millis(initial_ms), |previous| previous * 2)
            .min(Duration::from_secs(max_delay_secs));
        backoff = Some(delay);

        warn!(
            attempt,
            backoff_ms = delay.as_millis() as u64,
            error = %err,
            "Retrying after transient failure"
        );
        sleep(delay).await;
    }
}
