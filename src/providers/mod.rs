//! Collaborator seams for text advice and page-speed metrics.
//!
//! Both collaborators are optional and never on the critical path: their
//! failures become placeholder findings, never audit errors.

mod advisor;
mod pagespeed;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{join_all, BoxFuture};
use log::{debug, warn};
use url::Url;

pub use advisor::{AdvisorConfig, ChatAdvisor};
pub use pagespeed::{PageSpeedConfig, PageSpeedInsights};

use crate::config::{Config, ADVICE_PLACEHOLDER, MAX_ADVICE_CHARS};
use crate::report::{push_finding, Category, Finding, Section, SectionFindings, Severity, Subject};
use crate::utils::sanitize_and_truncate;

/// Ordered metric name → display value pairs, consumed only for display.
pub type MetricsBag = BTreeMap<String, String>;

/// Produces free-text advice for a prompt.
pub trait AdviceProvider: Send + Sync {
    fn advise<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, anyhow::Result<String>>;
}

/// Produces page-speed metrics for a URL.
pub trait MetricsProvider: Send + Sync {
    fn get_metrics<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, anyhow::Result<MetricsBag>>;
}

/// The optional collaborators of one audit.
#[derive(Clone, Default)]
pub struct Collaborators {
    pub advisor: Option<Arc<dyn AdviceProvider>>,
    pub metrics: Option<Arc<dyn MetricsProvider>>,
    /// Upper bound on one advice request, enforced on top of the provider's own timeout
    pub advice_timeout: Option<Duration>,
}

impl Collaborators {
    /// Builds the HTTP-backed collaborators enabled by `config`.
    ///
    /// Advice needs an API key; page speed needs `--pagespeed`. A provider
    /// whose client cannot be built is left out with a warning.
    pub fn from_config(config: &Config) -> Self {
        let advisor = config.advisor_api_key.as_ref().and_then(|api_key| {
            ChatAdvisor::new(AdvisorConfig {
                api_key: api_key.clone(),
                endpoint: config.advisor_endpoint.clone(),
                model: config.advisor_model.clone(),
                timeout: Duration::from_secs(config.advisor_timeout_seconds),
            })
            .map_err(|e| warn!("Advisory provider disabled: {}", e))
            .ok()
            .map(|advisor| Arc::new(advisor) as Arc<dyn AdviceProvider>)
        });

        let metrics = config.pagespeed.then(|| {
            PageSpeedInsights::new(PageSpeedConfig {
                api_key: config.pagespeed_api_key.clone(),
                strategy: config.pagespeed_strategy.clone(),
                ..Default::default()
            })
            .map_err(|e| warn!("Page-speed provider disabled: {}", e))
            .ok()
            .map(|provider| Arc::new(provider) as Arc<dyn MetricsProvider>)
        });

        Self {
            advisor,
            metrics: metrics.flatten(),
            advice_timeout: Some(Duration::from_secs(config.advisor_timeout_seconds)),
        }
    }
}

fn metrics_subject(page_url: &Url) -> Subject {
    Subject::Page {
        url: page_url.clone(),
    }
}

/// Page-speed findings: one per metric, a single placeholder when the
/// provider fails, or a single "not checked" note when none is configured.
pub async fn collect_metrics(provider: Option<&dyn MetricsProvider>, page_url: &Url) -> Vec<Finding> {
    let Some(provider) = provider else {
        return vec![Finding::new(
            Category::NotChecked,
            metrics_subject(page_url),
            Severity::Informational,
            "Page speed was not checked: no metrics provider is configured.",
        )];
    };

    match provider.get_metrics(page_url).await {
        Ok(metrics) if !metrics.is_empty() => metrics
            .into_iter()
            .map(|(name, value)| {
                let detail = format!("{}: {}", name, value);
                Finding::new(
                    Category::PageSpeedMetric { name, value },
                    metrics_subject(page_url),
                    Severity::Informational,
                    detail,
                )
            })
            .collect(),
        Ok(_) => vec![Finding::new(
            Category::ProviderUnavailable,
            metrics_subject(page_url),
            Severity::Informational,
            "The page-speed provider returned no metrics.",
        )],
        Err(e) => {
            warn!("Page-speed metrics unavailable for {}: {:#}", page_url, e);
            vec![Finding::new(
                Category::ProviderUnavailable,
                metrics_subject(page_url),
                Severity::Informational,
                "Page-speed metrics are unavailable right now.",
            )]
        }
    }
}

/// Prompt listing one section's problems.
fn advice_prompt(page_url: &Url, section: Section, issues: &[&Finding]) -> String {
    let mut prompt = format!(
        "You are an SEO consultant. The \"{}\" section of an audit of {} found these problems:\n",
        section, page_url
    );
    for finding in issues {
        prompt.push_str(&format!("- [{}] {}\n", finding.severity, finding.detail));
    }
    prompt.push_str("Give short, concrete advice on fixing them.");
    prompt
}

/// Appends one `Advice` finding to every section that has failures or
/// warnings.
///
/// Requests run concurrently. A failed or timed-out request yields the
/// placeholder text instead; the audit never fails because of advice.
pub async fn attach_advice(
    advisor: &dyn AdviceProvider,
    timeout: Option<Duration>,
    page_url: &Url,
    sections: &mut SectionFindings,
) {
    let requests: Vec<(Section, String)> = sections
        .iter()
        .filter_map(|(section, findings)| {
            let issues: Vec<&Finding> = findings.iter().filter(|f| f.is_issue()).collect();
            (!issues.is_empty()).then(|| (*section, advice_prompt(page_url, *section, &issues)))
        })
        .collect();

    let replies = join_all(requests.iter().map(|(section, prompt)| async move {
        let request = advisor.advise(prompt);
        let reply = match timeout {
            Some(limit) => tokio::time::timeout(limit, request)
                .await
                .unwrap_or_else(|_| Err(anyhow::anyhow!("advice request timed out after {:?}", limit))),
            None => request.await,
        };
        (*section, reply)
    }))
    .await;

    for (section, reply) in replies {
        let text = match reply {
            Ok(text) if !text.trim().is_empty() => {
                debug!("Received advice for section {}", section);
                sanitize_and_truncate(&text, MAX_ADVICE_CHARS)
            }
            Ok(_) => ADVICE_PLACEHOLDER.to_string(),
            Err(e) => {
                warn!("Advice unavailable for section {}: {:#}", section, e);
                ADVICE_PLACEHOLDER.to_string()
            }
        };
        push_finding(
            sections,
            section,
            Finding::new(
                Category::Advice,
                Subject::Page {
                    url: page_url.clone(),
                },
                Severity::Informational,
                text,
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedAdvisor(Option<&'static str>);

    impl AdviceProvider for FixedAdvisor {
        fn advise<'a>(&'a self, _prompt: &'a str) -> BoxFuture<'a, anyhow::Result<String>> {
            Box::pin(async move {
                self.0
                    .map(str::to_string)
                    .ok_or_else(|| anyhow::anyhow!("advisor offline"))
            })
        }
    }

    struct SlowAdvisor;

    impl AdviceProvider for SlowAdvisor {
        fn advise<'a>(&'a self, _prompt: &'a str) -> BoxFuture<'a, anyhow::Result<String>> {
            Box::pin(async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok("too late".to_string())
            })
        }
    }

    struct FixedMetrics(Option<MetricsBag>);

    impl MetricsProvider for FixedMetrics {
        fn get_metrics<'a>(&'a self, _url: &'a Url) -> BoxFuture<'a, anyhow::Result<MetricsBag>> {
            Box::pin(async move {
                self.0
                    .clone()
                    .ok_or_else(|| anyhow::anyhow!("quota exceeded"))
            })
        }
    }

    fn page() -> Url {
        Url::parse("https://ex.com/").unwrap()
    }

    fn sections_with_failure() -> SectionFindings {
        let mut sections = SectionFindings::new();
        push_finding(
            &mut sections,
            Section::Title,
            Finding::new(
                Category::MissingTitle,
                Subject::Page { url: page() },
                Severity::Fail,
                "The page has no <title>.",
            ),
        );
        push_finding(
            &mut sections,
            Section::Links,
            Finding::new(
                Category::NoIssue,
                Subject::Page { url: page() },
                Severity::Pass,
                "clean",
            ),
        );
        sections
    }

    #[tokio::test]
    async fn test_advice_only_for_sections_with_issues() {
        let mut sections = sections_with_failure();
        attach_advice(&FixedAdvisor(Some("Add a title.")), None, &page(), &mut sections).await;

        let title = &sections[&Section::Title];
        assert_eq!(title.len(), 2);
        assert_eq!(title[1].category, Category::Advice);
        assert_eq!(title[1].detail, "Add a title.");
        assert_eq!(sections[&Section::Links].len(), 1);
    }

    #[tokio::test]
    async fn test_advice_failure_uses_placeholder() {
        let mut sections = sections_with_failure();
        attach_advice(&FixedAdvisor(None), None, &page(), &mut sections).await;

        let advice = &sections[&Section::Title][1];
        assert_eq!(advice.category, Category::Advice);
        assert_eq!(advice.detail, ADVICE_PLACEHOLDER);
        assert_eq!(advice.severity, Severity::Informational);
    }

    #[tokio::test(start_paused = true)]
    async fn test_advice_timeout_uses_placeholder() {
        let mut sections = sections_with_failure();
        attach_advice(
            &SlowAdvisor,
            Some(Duration::from_millis(50)),
            &page(),
            &mut sections,
        )
        .await;
        assert_eq!(sections[&Section::Title][1].detail, ADVICE_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_metrics_not_configured() {
        let findings = collect_metrics(None, &page()).await;
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].category, Category::NotChecked);
        assert_eq!(findings[0].severity, Severity::Informational);
    }

    #[tokio::test]
    async fn test_metrics_become_findings() {
        let bag: MetricsBag = [
            ("Largest Contentful Paint".to_string(), "2.1 s".to_string()),
            ("Performance score".to_string(), "91".to_string()),
        ]
        .into_iter()
        .collect();
        let provider = FixedMetrics(Some(bag));
        let findings = collect_metrics(Some(&provider), &page()).await;

        assert_eq!(findings.len(), 2);
        assert_eq!(
            findings[0].category,
            Category::PageSpeedMetric {
                name: "Largest Contentful Paint".to_string(),
                value: "2.1 s".to_string()
            }
        );
        assert!(findings.iter().all(|f| f.severity == Severity::Informational));
    }

    #[tokio::test]
    async fn test_metrics_failure_degrades() {
        let provider = FixedMetrics(None);
        let findings = collect_metrics(Some(&provider), &page()).await;
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].category, Category::ProviderUnavailable);
    }

    #[test]
    fn test_collaborators_from_default_config_are_empty() {
        let collaborators = Collaborators::from_config(&Config::default());
        assert!(collaborators.advisor.is_none());
        assert!(collaborators.metrics.is_none());
    }
}
