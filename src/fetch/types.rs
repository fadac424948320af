//! Probe outcome types.

use std::time::Duration;

use url::Url;

use crate::error_handling::NetworkErrorKind;

/// Terminal status of one probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    /// Final response status below 400
    Ok(u16),
    /// Final response status 400 or above
    HttpError(u16),
    /// Transport failure or unusable redirect sequence
    NetworkError(NetworkErrorKind),
    /// The attempt did not finish within the probe timeout
    Timeout,
    /// The target was not probed
    Skipped(String),
}

impl FetchStatus {
    /// Human-readable reason for failures and skips, `None` for responses.
    pub fn reason(&self) -> Option<String> {
        match self {
            FetchStatus::NetworkError(kind) => Some(kind.to_string()),
            FetchStatus::Timeout => Some("timed out".to_string()),
            FetchStatus::Skipped(reason) => Some(reason.clone()),
            FetchStatus::Ok(_) | FetchStatus::HttpError(_) => None,
        }
    }

    /// Final HTTP status code, when a response was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            FetchStatus::Ok(code) | FetchStatus::HttpError(code) => Some(*code),
            _ => None,
        }
    }
}

/// Result of probing one resolved URL.
///
/// Created once per unique URL per audit run and never mutated after the
/// fetcher returns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    /// The probed URL
    pub url: Url,
    pub status: FetchStatus,
    /// URL that produced the final response; `None` on network errors, timeouts and skips
    pub final_url: Option<Url>,
    /// URLs that answered with a redirect, in order. On a loop the repeated
    /// URL is appended, so a loop always shows up as a duplicate entry.
    pub redirect_chain: Vec<Url>,
    /// Redirect status code of each hop in `redirect_chain` (a loop's repeated
    /// URL has none)
    pub redirect_statuses: Vec<u16>,
    /// Wall-clock duration across all attempts
    pub latency: Duration,
    /// Attempts made, including the first
    pub attempts: u32,
    /// HEAD was answered with 403/405 and the probe fell back to GET
    pub head_rejected: bool,
}

impl FetchOutcome {
    /// Outcome for a target that was deliberately not probed.
    pub fn skipped(url: Url, reason: impl Into<String>) -> Self {
        Self {
            url,
            status: FetchStatus::Skipped(reason.into()),
            final_url: None,
            redirect_chain: Vec::new(),
            redirect_statuses: Vec::new(),
            latency: Duration::ZERO,
            attempts: 0,
            head_rejected: false,
        }
    }

    /// Outcome for an attempt that ended without a usable final response.
    pub(crate) fn failed(url: Url, status: FetchStatus, latency: Duration) -> Self {
        Self {
            url,
            status,
            final_url: None,
            redirect_chain: Vec::new(),
            redirect_statuses: Vec::new(),
            latency,
            attempts: 1,
            head_rejected: false,
        }
    }

    /// True when a URL appears more than once in the redirect chain.
    pub fn is_redirect_loop(&self) -> bool {
        self.redirect_chain
            .iter()
            .enumerate()
            .any(|(i, url)| self.redirect_chain[..i].contains(url))
    }

    /// Status code of the last redirect followed, if any.
    pub fn last_redirect_status(&self) -> Option<u16> {
        self.redirect_statuses.last().copied()
    }
}
