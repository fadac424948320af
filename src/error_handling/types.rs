//! Library error types and the probe failure taxonomy.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Failure to set up a shared resource before any request is made.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum InitializationError {
    /// A global logger is already installed
    #[error("Failed to install logger: {0}")]
    LoggerError(#[from] SetLoggerError),

    #[error("Failed to build HTTP client: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Failure to retrieve the audited page itself.
///
/// This is the only fatal error class of an audit: without the page there is
/// nothing to extract, so no partial report is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Connection, DNS, TLS or redirect failure
    #[error("Failed to fetch {url}: {reason}")]
    Unreachable { url: String, reason: String },

    /// The page did not answer within the probe timeout
    #[error("Timed out fetching {url}")]
    Timeout { url: String },

    /// The page answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The response body could not be read
    #[error("Failed to read body of {url}: {reason}")]
    Body { url: String, reason: String },
}

/// Top-level error returned by the audit entry points.
#[derive(Error, Debug)]
pub enum AuditError {
    /// The input could not be normalized into an http(s) URL
    #[error("Invalid page URL: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    Initialization(#[from] InitializationError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Categories of network-level probe failures.
///
/// The `as_str()` text is what ends up in `NetworkError(reason)`, so it stays
/// stable across runs instead of echoing the HTTP client's error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum NetworkErrorKind {
    HttpRequestBuilderError,
    HttpRequestRedirectError,
    HttpRequestTimeoutError,
    HttpRequestRequestError,
    HttpRequestConnectError,
    HttpRequestBodyError,
    HttpRequestDecodeError,
    HttpRequestOtherError,
    RedirectLimitExceeded,
    RedirectLoop,
    InvalidRedirectLocation,
}

/// Notable probe events that are not failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum InfoType {
    /// At least one redirect was followed
    HttpRedirect,
    /// More than one redirect was followed
    MultipleRedirects,
    /// HEAD was rejected (403/405) and the hop was repeated with GET
    HeadRejected,
    /// A probe needed more than one attempt
    Retried,
}

impl std::fmt::Display for NetworkErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl NetworkErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkErrorKind::HttpRequestBuilderError => "HTTP request builder error",
            NetworkErrorKind::HttpRequestRedirectError => "HTTP request redirect error",
            NetworkErrorKind::HttpRequestTimeoutError => "HTTP request timeout error",
            NetworkErrorKind::HttpRequestRequestError => "HTTP request error",
            NetworkErrorKind::HttpRequestConnectError => "connection failed",
            NetworkErrorKind::HttpRequestBodyError => "HTTP request body error",
            NetworkErrorKind::HttpRequestDecodeError => "HTTP response decode error",
            NetworkErrorKind::HttpRequestOtherError => "HTTP request other error",
            NetworkErrorKind::RedirectLimitExceeded => "redirect limit exceeded",
            NetworkErrorKind::RedirectLoop => "redirect loop detected",
            NetworkErrorKind::InvalidRedirectLocation => "invalid redirect location",
        }
    }

    /// Whether a fresh attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            NetworkErrorKind::HttpRequestTimeoutError
                | NetworkErrorKind::HttpRequestRequestError
                | NetworkErrorKind::HttpRequestConnectError
                | NetworkErrorKind::HttpRequestBodyError
                | NetworkErrorKind::HttpRequestOtherError
        )
    }
}

impl InfoType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoType::HttpRedirect => "HTTP redirect",
            InfoType::MultipleRedirects => "Multiple redirects",
            InfoType::HeadRejected => "HEAD rejected, retried with GET",
            InfoType::Retried => "Probe retried",
        }
    }
}
