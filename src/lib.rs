//! seo_audit library: single-page SEO auditing
//!
//! This library fetches one page, extracts every reference it makes (links,
//! images, scripts, stylesheets, canonical and hreflang links), probes each
//! unique target and classifies the results together with on-page checks
//! (title, meta description, headings, image alt text, accessibility) into
//! a sectioned [`AuditReport`].
//!
//! # Example
//!
//! ```no_run
//! use seo_audit::{audit_page, Collaborators, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     url: "https://example.com".to_string(),
//!     max_concurrency: 16,
//!     ..Default::default()
//! };
//!
//! let report = audit_page(&config, &Collaborators::default()).await?;
//! for section in &report.sections {
//!     println!("{}: {}", section.section, section.status());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod audit;
pub mod classify;
pub mod config;
pub mod error_handling;
pub mod export;
pub mod fetch;
pub mod initialization;
pub mod parse;
pub mod providers;
pub mod report;
pub mod resolve;
mod utils;

// Re-export public API
pub use audit::{audit_links, AuditedTarget, LinkAudit};
pub use config::{AuditPolicy, Config, LinkAuditOptions, LogFormat, LogLevel, ProbeOptions};
pub use error_handling::{AuditError, FetchError};
pub use fetch::{FetchOutcome, FetchStatus, Fetcher};
pub use providers::{AdviceProvider, Collaborators, MetricsBag, MetricsProvider};
pub use report::{AuditReport, Category, Finding, Section, Severity, Subject};
pub use run::{audit_document, audit_page, audit_page_with};

// Internal run module (contains the audit pipeline)
mod run {
    use log::{debug, info};
    use url::Url;

    use crate::audit::audit_links;
    use crate::classify::classify;
    use crate::config::{Config, LinkAuditOptions};
    use crate::error_handling::{AuditError, InitializationError};
    use crate::fetch::{fetch_page, Fetcher};
    use crate::initialization::{init_extractor, init_page_client};
    use crate::parse::extract;
    use crate::providers::{attach_advice, collect_metrics, Collaborators};
    use crate::report::{aggregate, AuditReport, Section, SectionFindings};
    use crate::resolve::{validate_and_normalize_url, DomainMatcher};

    /// Audits the page at `config.url`.
    ///
    /// Pipeline: normalize the URL, fetch the page, extract references and
    /// metadata, run the pure checks, probe every unique target, collect
    /// page-speed metrics and advice, then aggregate into a report.
    ///
    /// No progress events are emitted; use [`audit_page_with`] to subscribe.
    ///
    /// # Errors
    ///
    /// - [`AuditError::InvalidUrl`] when `config.url` is not a usable http(s) URL
    /// - [`AuditError::Initialization`] when an HTTP client cannot be built
    /// - [`AuditError::Fetch`] when the page itself cannot be fetched or
    ///   answers with a non-success status. No partial report is produced.
    ///
    /// Failures of individual references or collaborators never end up here.
    pub async fn audit_page(
        config: &Config,
        collaborators: &Collaborators,
    ) -> Result<AuditReport, AuditError> {
        audit_page_with(config, config.link_audit_options(), collaborators).await
    }

    /// Like [`audit_page`], with explicit link-audit options (for progress
    /// subscriptions or tighter deadlines).
    ///
    /// # Errors
    ///
    /// Same as [`audit_page`].
    pub async fn audit_page_with(
        config: &Config,
        options: LinkAuditOptions,
        collaborators: &Collaborators,
    ) -> Result<AuditReport, AuditError> {
        let page_url = validate_and_normalize_url(&config.url)
            .ok_or_else(|| AuditError::InvalidUrl(config.url.clone()))?;

        let client = init_page_client(config).map_err(InitializationError::from)?;
        let page = fetch_page(&client, &page_url).await?;
        info!(
            "Fetched {} (HTTP {}, {} bytes)",
            page.final_url,
            page.status_code,
            page.body.len()
        );

        let fetcher = Fetcher::new(config.probe_options())?;
        Ok(audit_document(
            &page_url,
            &page.final_url,
            &page.body,
            config,
            &fetcher,
            &options,
            collaborators,
        )
        .await)
    }

    /// Audits an already fetched document.
    ///
    /// `page_url` is the audited URL as requested and `final_url` the URL the
    /// body was served from; relative references resolve against the latter.
    /// Never fails.
    pub async fn audit_document(
        page_url: &Url,
        final_url: &Url,
        body: &[u8],
        config: &Config,
        fetcher: &Fetcher,
        options: &LinkAuditOptions,
        collaborators: &Collaborators,
    ) -> AuditReport {
        let policy = config.policy();
        let matcher = DomainMatcher::new(final_url, policy.internal_policy, init_extractor());
        let refs = extract(body, final_url, policy.strip_boilerplate, &matcher);
        info!(
            "Extracted {} anchors, {} images, {} scripts, {} stylesheets, {} canonical and {} hreflang links",
            refs.anchors.len(),
            refs.images.len(),
            refs.scripts.len(),
            refs.stylesheets.len(),
            refs.canonicals.len(),
            refs.hreflangs.len()
        );

        let mut sections: SectionFindings = classify(&refs, &policy);

        let references: Vec<_> = refs.references().cloned().collect();
        let link_audit = audit_links(final_url, &references, fetcher, options).await;
        for (section, findings) in link_audit.section_findings() {
            sections.entry(section).or_default().extend(findings);
        }

        let metrics = collaborators.metrics.as_ref().map(|metrics| &**metrics);
        sections
            .entry(Section::PageSpeed)
            .or_default()
            .extend(collect_metrics(metrics, final_url).await);

        if let Some(advisor) = &collaborators.advisor {
            attach_advice(
                &**advisor,
                collaborators.advice_timeout,
                final_url,
                &mut sections,
            )
            .await;
        } else {
            debug!("No advisory provider configured; skipping advice");
        }

        aggregate(page_url, final_url, sections)
    }
}
