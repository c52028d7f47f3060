//! Retry utilities for catalog page requests.
//!
//! Provides exponential backoff retry logic for transport failures (network
//! errors, timeouts, non-2xx statuses). Failures in the payload itself
//! (unexpected response shape, malformed items) are propagated immediately
//! without retrying.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Executes `operation` with exponential backoff retries on transport errors.
///
/// On success the result is returned immediately.
///
/// On a transport error (see [`ScraperError::is_transport`]) the function
/// sleeps for `backoff_base_ms * 2^attempt` milliseconds and tries again, up
/// to `max_retries` additional attempts after the first try. If all retries
/// are exhausted the last error is returned.
///
/// # Backoff schedule (example with `backoff_base_ms = 100`)
///
/// | Attempt | Sleep before next attempt |
/// |---------|--------------------------|
/// | 0 (initial) | none |
/// | 1 (first retry) | 100 × 2^0 = 100 ms |
/// | 2 (second retry) | 100 × 2^1 = 200 ms |
/// | 3 (third retry) | 100 × 2^2 = 400 ms |
///
/// With `max_retries = 3` the operation is attempted at most 4 times total.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut last_err;
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !err.is_transport() || attempt >= max_retries {
                    return Err(err);
                }
                last_err = err;
            }
        }

        // Cap the shift so extreme retry counts saturate instead of overflowing.
        let delay_ms = backoff_base_ms.saturating_mul(1u64 << attempt.min(62));
        tracing::warn!(
            attempt,
            max_retries,
            delay_ms,
            error = %last_err,
            "catalog request failed, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::future::ready;
    use std::time::{Duration, Instant};

    use super::*;

    const API_URL: &str = "https://api.example.com/graph";

    fn status(code: u16) -> ScraperError {
        ScraperError::UnexpectedStatus {
            status: code,
            url: API_URL.to_owned(),
        }
    }

    fn response_shape() -> ScraperError {
        ScraperError::ResponseShape {
            url: API_URL.to_owned(),
            reason: "missing data.category.products".to_owned(),
        }
    }

    fn malformed_record() -> ScraperError {
        ScraperError::MalformedRecord {
            item_id: "7".to_owned(),
            reason: "item has no stock entries".to_owned(),
        }
    }

    fn pagination_limit() -> ScraperError {
        ScraperError::PaginationLimit {
            url: API_URL.to_owned(),
            max_pages: 1,
        }
    }

    /// Plays `outcomes` back one per attempt and returns the final result with
    /// the number of attempts made. Attempts past the end of the list get a 502.
    async fn run_attempts(
        max_retries: u32,
        backoff_base_ms: u64,
        outcomes: Vec<Result<&'static str, ScraperError>>,
    ) -> (Result<&'static str, ScraperError>, u32) {
        let attempts = Cell::new(0u32);
        let mut outcomes = outcomes.into_iter();
        let result = retry_with_backoff(max_retries, backoff_base_ms, || {
            attempts.set(attempts.get() + 1);
            ready(outcomes.next().unwrap_or_else(|| Err(status(502))))
        })
        .await;
        (result, attempts.get())
    }

    #[tokio::test]
    async fn page_returned_on_first_attempt() {
        let (result, attempts) = run_attempts(3, 0, vec![Ok("page")]).await;
        assert_eq!(result.unwrap(), "page");
        assert_eq!(attempts, 1);
    }

    #[tokio::test]
    async fn every_non_success_status_is_retried() {
        for code in [408, 429, 500, 502, 503, 504] {
            let (result, attempts) = run_attempts(1, 0, vec![Err(status(code)), Ok("page")]).await;
            assert_eq!(result.unwrap(), "page", "status {code}");
            assert_eq!(attempts, 2, "status {code}");
        }
    }

    #[tokio::test]
    async fn payload_errors_are_never_retried() {
        let kinds: [(&str, fn() -> ScraperError); 3] = [
            ("response shape", response_shape),
            ("malformed record", malformed_record),
            ("pagination limit", pagination_limit),
        ];
        for (kind, make) in kinds {
            let (result, attempts) = run_attempts(5, 0, vec![Err(make()), Ok("page")]).await;
            let err = result.expect_err(kind);
            assert!(!err.is_transport(), "{kind}");
            assert_eq!(attempts, 1, "{kind}");
        }
    }

    #[tokio::test]
    async fn payload_error_after_a_retry_ends_immediately() {
        let outcomes = vec![Err(status(503)), Err(response_shape()), Ok("page")];
        let (result, attempts) = run_attempts(5, 0, outcomes).await;
        assert!(matches!(result, Err(ScraperError::ResponseShape { .. })));
        assert_eq!(attempts, 2);
    }

    #[tokio::test]
    async fn spent_budget_returns_the_last_status_seen() {
        let outcomes = vec![Err(status(500)), Err(status(503)), Err(status(504))];
        let (result, attempts) = run_attempts(2, 0, outcomes).await;
        assert!(matches!(
            result,
            Err(ScraperError::UnexpectedStatus { status: 504, .. })
        ));
        assert_eq!(attempts, 3);
    }

    #[tokio::test]
    async fn zero_budget_makes_a_single_attempt() {
        let (result, attempts) = run_attempts(0, 0, vec![Err(status(500)), Ok("page")]).await;
        assert!(result.unwrap_err().is_transport());
        assert_eq!(attempts, 1);
    }

    #[tokio::test]
    async fn backoff_doubles_between_attempts() {
        let started = Instant::now();
        let (result, attempts) = run_attempts(3, 20, Vec::new()).await;
        let elapsed = started.elapsed();

        assert!(matches!(
            result,
            Err(ScraperError::UnexpectedStatus { status: 502, .. })
        ));
        assert_eq!(attempts, 4);
        // 20 + 40 + 80 ms of sleeps between the four attempts.
        assert!(
            elapsed >= Duration::from_millis(140),
            "retries finished after only {elapsed:?}"
        );
    }
}
