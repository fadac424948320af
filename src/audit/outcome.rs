//! Probe outcome classification.

use url::Url;

use crate::config::{HTTP_STATUS_FORBIDDEN, HTTP_STATUS_MOVED_PERMANENTLY, HTTP_STATUS_PERMANENT_REDIRECT};
use crate::error_handling::NetworkErrorKind;
use crate::fetch::{FetchOutcome, FetchStatus};
use crate::parse::ReferenceKind;
use crate::report::{Category, Finding, Severity, Subject};

fn broken_category(kind: ReferenceKind) -> Category {
    if kind.is_resource() {
        Category::BrokenResource
    } else {
        Category::BrokenLink
    }
}

fn format_chain(outcome: &FetchOutcome) -> String {
    outcome
        .redirect_chain
        .iter()
        .map(Url::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Turns one probe outcome into at most one finding.
///
/// Checks are ordered: skips, loops, network failures, 403, other error
/// statuses, then redirects. A clean response without redirects yields
/// `None`.
pub fn classify_outcome(kind: ReferenceKind, outcome: &FetchOutcome) -> Option<Finding> {
    let url = &outcome.url;
    let subject = Subject::Reference {
        kind,
        url: url.clone(),
    };

    let is_loop = outcome.is_redirect_loop()
        || outcome.status == FetchStatus::NetworkError(NetworkErrorKind::RedirectLoop);

    match &outcome.status {
        FetchStatus::Skipped(reason) => Some(Finding::new(
            Category::Skipped,
            subject,
            Severity::Informational,
            format!("The {} {} was not checked: {}.", kind, url, reason),
        )),
        _ if is_loop => Some(Finding::new(
            Category::RedirectLoop,
            subject,
            Severity::Fail,
            format!("{} redirects in a loop: {}.", url, format_chain(outcome)),
        )),
        FetchStatus::NetworkError(_) | FetchStatus::Timeout => {
            let reason = outcome.status.reason().unwrap_or_default();
            Some(Finding::new(
                broken_category(kind),
                subject,
                Severity::Fail,
                format!("The {} {} could not be reached: {}.", kind, url, reason),
            ))
        }
        FetchStatus::HttpError(code) if *code == HTTP_STATUS_FORBIDDEN => Some(Finding::new(
            Category::ForbiddenResource,
            subject,
            Severity::Warning,
            format!("The {} {} returned HTTP 403 Forbidden.", kind, url),
        )),
        FetchStatus::HttpError(code) => Some(Finding::new(
            broken_category(kind),
            subject,
            Severity::Fail,
            format!("The {} {} returned HTTP {}.", kind, url, code),
        )),
        FetchStatus::Ok(_) => classify_redirects(kind, outcome, subject),
    }
}

fn classify_redirects(kind: ReferenceKind, outcome: &FetchOutcome, subject: Subject) -> Option<Finding> {
    let url = &outcome.url;
    let destination = outcome
        .final_url
        .as_ref()
        .map_or_else(String::new, |final_url| final_url.to_string());
    let hops = outcome.redirect_chain.len();

    if hops > 1 {
        return Some(Finding::new(
            Category::RedirectChain { hops },
            subject,
            Severity::Warning,
            format!(
                "The {} {} passes through {} redirects before reaching {}.",
                kind, url, hops, destination
            ),
        ));
    }
    if hops == 0 {
        return None;
    }

    match outcome.last_redirect_status() {
        Some(status @ (HTTP_STATUS_MOVED_PERMANENTLY | HTTP_STATUS_PERMANENT_REDIRECT)) => {
            Some(Finding::new(
                Category::PermanentRedirect,
                subject,
                Severity::Warning,
                format!(
                    "The {} {} permanently redirects (HTTP {}) to {}.",
                    kind, url, status, destination
                ),
            ))
        }
        status => Some(Finding::new(
            Category::TemporaryRedirect,
            subject,
            Severity::Informational,
            format!(
                "The {} {} temporarily redirects (HTTP {}) to {}.",
                kind,
                url,
                status.map_or_else(|| "3xx".to_string(), |s| s.to_string()),
                destination
            ),
        )),
    }
}
