//! PageSpeed Insights metrics provider.

use std::time::Duration;

use anyhow::{bail, Context};
use futures::future::BoxFuture;
use log::debug;
use serde_json::Value;
use url::Url;

use crate::config::{PAGESPEED_ENDPOINT, PAGESPEED_TIMEOUT_SECS};
use crate::error_handling::InitializationError;
use crate::providers::{MetricsBag, MetricsProvider};
use crate::utils::sanitize_and_truncate;

/// Lighthouse audit ids and the names they are reported under.
const CORE_AUDITS: &[(&str, &str)] = &[
    ("first-contentful-paint", "First Contentful Paint"),
    ("largest-contentful-paint", "Largest Contentful Paint"),
    ("total-blocking-time", "Total Blocking Time"),
    ("cumulative-layout-shift", "Cumulative Layout Shift"),
    ("speed-index", "Speed Index"),
    ("interactive", "Time to Interactive"),
];

#[derive(Clone)]
pub struct PageSpeedConfig {
    /// Optional; raises the anonymous quota
    pub api_key: Option<String>,
    /// `mobile` or `desktop`
    pub strategy: String,
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for PageSpeedConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            strategy: "mobile".to_string(),
            endpoint: PAGESPEED_ENDPOINT.to_string(),
            timeout: Duration::from_secs(PAGESPEED_TIMEOUT_SECS),
        }
    }
}

impl std::fmt::Debug for PageSpeedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageSpeedConfig")
            .field("strategy", &self.strategy)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Fetches Lighthouse lab metrics from the PageSpeed Insights v5 API.
#[derive(Debug)]
pub struct PageSpeedInsights {
    client: reqwest::Client,
    config: PageSpeedConfig,
}

impl PageSpeedInsights {
    /// # Errors
    ///
    /// Returns `InitializationError::HttpClientError` if the client cannot be built.
    pub fn new(config: PageSpeedConfig) -> Result<Self, InitializationError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    async fn request(&self, url: &Url) -> anyhow::Result<MetricsBag> {
        let mut query = vec![
            ("url", url.as_str().to_string()),
            ("strategy", self.config.strategy.clone()),
            ("category", "performance".to_string()),
        ];
        if let Some(key) = &self.config.api_key {
            query.push(("key", key.clone()));
        }

        debug!("Requesting page-speed metrics for {}", url);
        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&query)
            .send()
            .await
            .context("page-speed request failed")?;
        let status = response.status();
        let text = response
            .text()
            .await
            .context("page-speed response read failed")?;
        if !status.is_success() {
            bail!(
                "page-speed endpoint returned HTTP {}: {}",
                status.as_u16(),
                sanitize_and_truncate(&text, 200)
            );
        }

        let body: Value = serde_json::from_str(&text).context("page-speed response parse failed")?;
        Ok(flatten_lighthouse(&body))
    }
}

/// Flattens the performance score and core audit display values.
///
/// Audits missing from the response are left out rather than reported empty.
fn flatten_lighthouse(body: &Value) -> MetricsBag {
    let mut metrics = MetricsBag::new();
    let Some(lighthouse) = body.get("lighthouseResult") else {
        return metrics;
    };

    if let Some(score) = lighthouse
        .pointer("/categories/performance/score")
        .and_then(Value::as_f64)
    {
        metrics.insert(
            "Performance score".to_string(),
            format!("{}", (score * 100.0).round() as u32),
        );
    }

    for (id, name) in CORE_AUDITS {
        let display = lighthouse
            .get("audits")
            .and_then(|audits| audits.get(*id))
            .and_then(|audit| audit.get("displayValue"))
            .and_then(Value::as_str);
        if let Some(display) = display {
            metrics.insert(name.to_string(), sanitize_and_truncate(display, 40));
        }
    }

    metrics
}

impl MetricsProvider for PageSpeedInsights {
    fn get_metrics<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, anyhow::Result<MetricsBag>> {
        Box::pin(self.request(url))
    }
}
