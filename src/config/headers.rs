//! HTTP request header values.
//!
//! Browser-like header values sent with every request. Sites that fingerprint
//! headers tend to answer obvious bots with 403, which would turn into false
//! `ForbiddenResource` findings.

/// Accept header for the audited page itself
pub const ACCEPT_DOCUMENT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8";
/// Accept header for probes (targets may be images, scripts, stylesheets or pages)
pub const ACCEPT_ANY: &str = "*/*";
/// Accept-Language header value
pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
/// Sec-Fetch-Dest header name and values
pub const HEADER_SEC_FETCH_DEST: &str = "sec-fetch-dest";
pub const SEC_FETCH_DEST_DOCUMENT: &str = "document";
pub const SEC_FETCH_DEST_EMPTY: &str = "empty";
/// Sec-Fetch-Mode header name and value
pub const HEADER_SEC_FETCH_MODE: &str = "sec-fetch-mode";
pub const SEC_FETCH_MODE_NAVIGATE: &str = "navigate";
pub const SEC_FETCH_MODE_NO_CORS: &str = "no-cors";
