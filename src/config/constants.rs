//! Configuration constants.
//!
//! This module defines the defaults used throughout the auditor: network
//! timeouts, concurrency limits, and the policy thresholds applied by the
//! reference classifier. Every threshold here is a default only; the values
//! actually applied flow through [`AuditPolicy`](super::AuditPolicy) and
//! [`LinkAuditOptions`](super::LinkAuditOptions).

use std::time::Duration;

// Probe defaults
/// Per-probe timeout in seconds (covers every hop of one probe attempt)
pub const PROBE_TIMEOUT_SECS: u64 = 5;

/// Maximum number of redirect hops followed before a probe is classified as
/// `NetworkError("redirect limit exceeded")`
pub const MAX_REDIRECT_HOPS: usize = 10;

/// Default number of concurrent probes during the link-audit phase.
/// Recommended range is 8-16; kept at the low end to stay polite.
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Wall-clock budget for the entire link-audit phase.
/// Targets still outstanding when it expires are reported as skipped.
pub const AUDIT_DEADLINE: Duration = Duration::from_secs(60);

/// Minimum spacing between two probes to the same host, once that host is
/// referenced by at least `HOST_SPACING_THRESHOLD` targets.
pub const HOST_SPACING_MS: u64 = 100;
/// Number of targets on one host before host spacing kicks in
pub const HOST_SPACING_THRESHOLD: usize = 5;

/// Default User-Agent string for HTTP requests.
///
/// A browser-like string: many sites answer bot-looking agents with 403, which
/// would otherwise surface as false `ForbiddenResource` findings.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

// Response and body size limits
/// Maximum audited-page body size in bytes (5MB).
/// Larger bodies are truncated before parsing.
pub const MAX_RESPONSE_BODY_SIZE: usize = 5 * 1024 * 1024;

// Retry strategy
/// Default number of attempts per probe (1 = no retry beyond the HEAD→GET fallback)
pub const RETRY_MAX_ATTEMPTS: usize = 1;
/// Initial delay in milliseconds before the first retry
pub const RETRY_INITIAL_DELAY_MS: u64 = 500;
/// Maximum delay between retries in seconds
pub const RETRY_MAX_DELAY_SECS: u64 = 15;

// Reference classifier policy
/// URLs strictly longer than this many characters are flagged `LongUrl`
pub const LONG_URL_THRESHOLD: usize = 200;
/// Anchor text occurring strictly more often than this is flagged as over-optimized
pub const ANCHOR_REPEAT_THRESHOLD: usize = 5;
/// Pages with strictly more anchors than this are flagged `TooManyLinks`
pub const MAX_LINKS_PER_PAGE: usize = 100;

/// Anchor texts that say nothing about their destination.
/// Compared case-insensitively after trimming.
pub const GENERIC_ANCHOR_PHRASES: &[&str] = &["click here", "read more", "here", "link", "more"];

// Content checks
/// Inclusive title length range, in characters
pub const TITLE_MIN_LENGTH: usize = 10;
pub const TITLE_MAX_LENGTH: usize = 60;
/// Inclusive meta description length range, in characters
pub const META_DESCRIPTION_MIN_LENGTH: usize = 50;
pub const META_DESCRIPTION_MAX_LENGTH: usize = 160;

// Collaborators
/// Timeout for a single advisory request in seconds
pub const ADVISOR_TIMEOUT_SECS: u64 = 30;
/// Default OpenAI-compatible chat completions endpoint
pub const DEFAULT_ADVISOR_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
/// Default model requested from the advisory endpoint
pub const DEFAULT_ADVISOR_MODEL: &str = "gpt-4o-mini";
/// PageSpeed Insights v5 endpoint
pub const PAGESPEED_ENDPOINT: &str = "https://www.googleapis.com/pagespeedonline/v5/runPagespeed";
/// PageSpeed Insights runs a full Lighthouse pass, so it gets a generous timeout
pub const PAGESPEED_TIMEOUT_SECS: u64 = 60;

/// Placeholder substituted when the advisory provider fails
pub const ADVICE_PLACEHOLDER: &str = "No advice is available for this section right now.";

// HTTP status codes (for clarity and consistency)
pub const HTTP_STATUS_FORBIDDEN: u16 = 403;
pub const HTTP_STATUS_METHOD_NOT_ALLOWED: u16 = 405;
pub const HTTP_STATUS_TOO_MANY_REQUESTS: u16 = 429;
pub const HTTP_STATUS_MOVED_PERMANENTLY: u16 = 301;
pub const HTTP_STATUS_PERMANENT_REDIRECT: u16 = 308;

/// Reason attached to targets still outstanding when the audit deadline passes
pub const DEADLINE_SKIP_REASON: &str = "audit deadline exceeded";
/// Reason attached to external targets when external checking is disabled
pub const EXTERNAL_SKIP_REASON: &str = "external links not checked";

/// Longest advice text kept in a report, in characters
pub const MAX_ADVICE_CHARS: usize = 1200;

/// The CLI logs link-audit progress every this many settled targets
pub const PROGRESS_LOG_EVERY: usize = 10;
