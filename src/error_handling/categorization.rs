//! Error categorization and retry strategy.
//!
//! This module provides functions to categorize errors and configure retry strategies.

use std::time::Duration;
use tokio_retry::strategy::{ExponentialBackoff, FixedInterval};

use super::stats::ProcessingStats;
use super::types::NetworkErrorKind;
use crate::config::{BackoffKind, RetryPolicy, HTTP_STATUS_TOO_MANY_REQUESTS};
use crate::fetch::{FetchOutcome, FetchStatus};

/// Creates the retry delay schedule for a policy.
///
/// The iterator yields one delay per retry, so it holds `max_attempts - 1`
/// items: the initial attempt is not preceded by a delay.
///
/// - `Fixed`: every retry waits `policy.delay`
/// - `Exponential`: `policy.delay`, then double that, capped at
///   `RETRY_MAX_DELAY_SECS`
pub fn get_retry_strategy(policy: &RetryPolicy) -> Box<dyn Iterator<Item = Duration> + Send> {
    let retries = policy.max_attempts.saturating_sub(1);
    match policy.backoff {
        BackoffKind::Fixed => Box::new(FixedInterval::new(policy.delay).take(retries)),
        BackoffKind::Exponential => {
            // ExponentialBackoff yields base^n * factor; base 2 gives a clean doubling
            let factor = (policy.delay.as_millis() as u64 / 2).max(1);
            Box::new(
                ExponentialBackoff::from_millis(2)
                    .factor(factor)
                    .max_delay(Duration::from_secs(crate::config::RETRY_MAX_DELAY_SECS))
                    .take(retries),
            )
        }
    }
}

/// Categorizes a `reqwest::Error` into a `NetworkErrorKind`.
///
/// Status-carrying errors never reach this function: the fetcher reads
/// statuses from responses directly, so only transport failures land here.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> NetworkErrorKind {
    if error.is_builder() {
        NetworkErrorKind::HttpRequestBuilderError
    } else if error.is_redirect() {
        NetworkErrorKind::HttpRequestRedirectError
    } else if error.is_timeout() {
        NetworkErrorKind::HttpRequestTimeoutError
    } else if error.is_connect() {
        NetworkErrorKind::HttpRequestConnectError
    } else if error.is_request() {
        NetworkErrorKind::HttpRequestRequestError
    } else if error.is_body() {
        NetworkErrorKind::HttpRequestBodyError
    } else if error.is_decode() {
        NetworkErrorKind::HttpRequestDecodeError
    } else {
        NetworkErrorKind::HttpRequestOtherError
    }
}

/// Determines whether a probe outcome is worth another attempt.
///
/// # Retriable
///
/// - Timeouts
/// - Transient network failures (connect, request, body)
/// - Server errors (5xx) and rate limiting (429)
///
/// # Non-Retriable
///
/// - Client errors (4xx except 429)
/// - Redirect limit, redirect loop, unusable redirect locations
/// - Successful and skipped outcomes
pub fn is_retriable_outcome(outcome: &FetchOutcome) -> bool {
    match &outcome.status {
        FetchStatus::Timeout => true,
        FetchStatus::NetworkError(kind) => kind.is_transient(),
        FetchStatus::HttpError(code) => {
            *code == HTTP_STATUS_TOO_MANY_REQUESTS || (500..600).contains(code)
        }
        FetchStatus::Ok(_) | FetchStatus::Skipped(_) => false,
    }
}

/// Records the network-level result of one probe into the run statistics.
pub fn update_probe_stats(stats: &ProcessingStats, outcome: &FetchOutcome) {
    match &outcome.status {
        FetchStatus::NetworkError(kind) => stats.increment_error(*kind),
        FetchStatus::Timeout => stats.increment_error(NetworkErrorKind::HttpRequestTimeoutError),
        _ => {}
    }
    if !outcome.redirect_chain.is_empty() {
        stats.increment_info(super::InfoType::HttpRedirect);
        if outcome.redirect_chain.len() > 1 {
            stats.increment_info(super::InfoType::MultipleRedirects);
        }
    }
    if outcome.head_rejected {
        stats.increment_info(super::InfoType::HeadRejected);
    }
    if outcome.attempts > 1 {
        stats.increment_info(super::InfoType::Retried);
    }
}
