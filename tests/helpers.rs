// Shared test helpers for mock servers and fast probe settings.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::time::Duration;

use seo_audit::config::{LinkAuditOptions, MethodPreference, ProbeOptions, RetryPolicy};
use seo_audit::Fetcher;
use url::Url;

/// Probe options with a short timeout so failure paths finish quickly.
#[allow(dead_code)] // Used by other test files
pub fn fast_probe_options() -> ProbeOptions {
    ProbeOptions {
        timeout: Duration::from_millis(500),
        method: MethodPreference::HeadThenGet,
        max_redirects: 10,
        user_agent: "seo_audit-tests".to_string(),
        retry: RetryPolicy::default(),
    }
}

/// A fetcher built from [`fast_probe_options`].
#[allow(dead_code)]
pub fn fast_fetcher() -> Fetcher {
    Fetcher::new(fast_probe_options()).expect("probe client should build")
}

/// Link-audit options without host spacing.
#[allow(dead_code)]
pub fn quick_audit_options() -> LinkAuditOptions {
    LinkAuditOptions {
        host_spacing: Duration::ZERO,
        deadline: Duration::from_secs(10),
        ..Default::default()
    }
}

/// Parses a mock server URL.
#[allow(dead_code)]
pub fn url_of(server: &httptest::Server, path: &str) -> Url {
    Url::parse(&server.url_str(path)).expect("mock server URL should parse")
}

/// Wraps body markup in a complete document that passes the content checks.
#[allow(dead_code)]
pub fn page_html(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <title>Handmade Oak Furniture Workshop</title>
    <meta name="description" content="Solid oak tables, chairs and shelves built to order in our workshop, delivered nationwide.">
</head>
<body>
<main>
    <h1>Oak furniture</h1>
    {}
</main>
</body>
</html>"#,
        body
    )
}
