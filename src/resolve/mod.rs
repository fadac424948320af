//! URL resolution and internal/external classification.
//!
//! Everything here is pure: no I/O and no failure modes beyond `None` for
//! references that cannot be turned into an http(s) URL.

use std::sync::Arc;

use log::warn;
use tldextract::TldExtractor;
use url::Url;

use crate::config::InternalPolicy;

/// Maximum accepted length of the audited page URL.
const MAX_URL_LENGTH: usize = 2048;

/// Resolves a raw attribute value against a base URL.
///
/// Returns `None` for empty values, pure in-page fragments (`#...`) and
/// anything that does not end up as an `http`/`https` URL (`mailto:`,
/// `javascript:`, `tel:`, `data:`...). Scheme-relative, absolute-path and
/// relative references follow standard RFC 3986 resolution.
///
/// The fragment of the resolved URL is dropped: `/page#a` and `/page#b` name
/// the same network target.
///
/// # Examples
///
/// ```
/// use seo_audit::resolve::resolve;
/// use url::Url;
///
/// let base = Url::parse("https://ex.com/a/b").unwrap();
/// assert_eq!(resolve(&base, "../c").unwrap().as_str(), "https://ex.com/c");
/// assert!(resolve(&base, "#top").is_none());
/// ```
pub fn resolve(base: &Url, raw: &str) -> Option<Url> {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with('#') {
        return None;
    }

    let mut resolved = base.join(raw).ok()?;
    match resolved.scheme() {
        "http" | "https" => {}
        _ => return None,
    }
    resolved.host_str()?;
    resolved.set_fragment(None);
    Some(resolved)
}

/// Registrable domain of `url` per the Public Suffix List, lowercased.
///
/// `None` for IP hosts and hosts the suffix list cannot split
/// (`localhost`, single labels).
fn registrable_domain(extractor: &TldExtractor, url: &Url) -> Option<String> {
    match url.host()? {
        url::Host::Domain(_) => {}
        url::Host::Ipv4(_) | url::Host::Ipv6(_) => return None,
    }
    let parts = extractor.extract(url.as_str()).ok()?;
    match (parts.domain, parts.suffix) {
        (Some(domain), Some(suffix)) => Some(format!("{domain}.{suffix}").to_lowercase()),
        _ => None,
    }
}

/// Exact-host comparison between two URLs.
///
/// This is the strict form of "internal": `cdn.example.com` is external to
/// `www.example.com`. Use [`DomainMatcher`] for the configurable policy.
pub fn is_internal(base: &Url, candidate: &Url) -> bool {
    match (base.host_str(), candidate.host_str()) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        _ => false,
    }
}

/// Internal/external classifier fixed to one audited page and one policy.
///
/// The page's registrable domain is computed once; every candidate is then
/// compared against it.
#[derive(Clone)]
pub struct DomainMatcher {
    policy: InternalPolicy,
    page: Url,
    page_domain: Option<String>,
    extractor: Arc<TldExtractor>,
}

impl DomainMatcher {
    pub fn new(page: &Url, policy: InternalPolicy, extractor: Arc<TldExtractor>) -> Self {
        let page_domain = match policy {
            InternalPolicy::RegistrableDomain => registrable_domain(&extractor, page),
            InternalPolicy::ExactHost => None,
        };
        Self {
            policy,
            page: page.clone(),
            page_domain,
            extractor,
        }
    }

    pub fn policy(&self) -> InternalPolicy {
        self.policy
    }

    /// Returns true when `candidate` belongs to the audited site.
    ///
    /// Under `RegistrableDomain`, hosts without a registrable domain (IP
    /// addresses, `localhost`) fall back to exact host comparison.
    pub fn is_internal(&self, candidate: &Url) -> bool {
        if let (InternalPolicy::RegistrableDomain, Some(page_domain)) =
            (self.policy, &self.page_domain)
        {
            if let Some(candidate_domain) = registrable_domain(&self.extractor, candidate) {
                return &candidate_domain == page_domain;
            }
        }
        is_internal(&self.page, candidate)
    }
}

impl std::fmt::Debug for DomainMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomainMatcher")
            .field("policy", &self.policy)
            .field("page", &self.page.as_str())
            .field("page_domain", &self.page_domain)
            .finish()
    }
}

/// True for IP hosts and for domains made of non-empty DNS labels.
///
/// `Url::parse` accepts characters such as `!` in hosts, so
/// `https://ht!tp://x` would otherwise pass with host `ht!tp`.
fn has_hostname(url: &Url) -> bool {
    match url.host() {
        Some(url::Host::Ipv4(_) | url::Host::Ipv6(_)) => true,
        Some(url::Host::Domain(domain)) => domain
            .trim_end_matches('.')
            .split('.')
            .all(|label| {
                !label.is_empty()
                    && label
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            }),
        None => false,
    }
}

/// Validates and normalizes the audited page URL.
///
/// Adds an `https://` prefix if no scheme is present, then checks that the
/// result parses, uses http/https and has a host. Logs a warning and returns
/// `None` otherwise.
pub fn validate_and_normalize_url(url: &str) -> Option<Url> {
    let url = url.trim();
    if url.is_empty() {
        warn!("Skipping empty URL");
        return None;
    }

    let normalized = if !url.starts_with("http://") && !url.starts_with("https://") {
        format!("https://{url}")
    } else {
        url.to_string()
    };

    // Checked after the prefix is added so the limit applies to what gets fetched
    if normalized.len() > MAX_URL_LENGTH {
        warn!(
            "Skipping URL exceeding maximum length ({} > {}): {}...",
            normalized.len(),
            MAX_URL_LENGTH,
            normalized.chars().take(50).collect::<String>()
        );
        return None;
    }

    match Url::parse(&normalized) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && has_hostname(&parsed) => {
            Some(parsed)
        }
        Ok(_) => {
            warn!("Skipping unsupported URL: {url}");
            None
        }
        Err(_) => {
            warn!("Skipping invalid URL: {url}");
            None
        }
    }
}
