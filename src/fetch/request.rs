//! HTTP request building.

use reqwest::header::{HeaderName, ACCEPT, ACCEPT_LANGUAGE as ACCEPT_LANGUAGE_HEADER};
use reqwest::RequestBuilder;

use crate::config::{
    ACCEPT_ANY, ACCEPT_DOCUMENT, ACCEPT_LANGUAGE, HEADER_SEC_FETCH_DEST, HEADER_SEC_FETCH_MODE,
    SEC_FETCH_DEST_DOCUMENT, SEC_FETCH_DEST_EMPTY, SEC_FETCH_MODE_NAVIGATE, SEC_FETCH_MODE_NO_CORS,
};

/// Browser-like request headers.
///
/// The User-Agent is set on the client; these complete the fingerprint so
/// that bot filters do not answer probes with 403.
pub(crate) struct RequestHeaders;

impl RequestHeaders {
    /// Headers for navigating to the audited page.
    pub(crate) fn apply_document(builder: RequestBuilder) -> RequestBuilder {
        builder
            .header(ACCEPT, ACCEPT_DOCUMENT)
            .header(ACCEPT_LANGUAGE_HEADER, ACCEPT_LANGUAGE)
            .header(
                HeaderName::from_static(HEADER_SEC_FETCH_DEST),
                SEC_FETCH_DEST_DOCUMENT,
            )
            .header(
                HeaderName::from_static(HEADER_SEC_FETCH_MODE),
                SEC_FETCH_MODE_NAVIGATE,
            )
    }

    /// Headers for probing a referenced link or resource.
    pub(crate) fn apply_probe(builder: RequestBuilder) -> RequestBuilder {
        builder
            .header(ACCEPT, ACCEPT_ANY)
            .header(ACCEPT_LANGUAGE_HEADER, ACCEPT_LANGUAGE)
            .header(
                HeaderName::from_static(HEADER_SEC_FETCH_DEST),
                SEC_FETCH_DEST_EMPTY,
            )
            .header(
                HeaderName::from_static(HEADER_SEC_FETCH_MODE),
                SEC_FETCH_MODE_NO_CORS,
            )
    }
}
