//! CLI options and the option structs handed to each component.

use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tokio::sync::mpsc;

use crate::config::constants::*;

/// `--log-level` values.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    /// Progress and per-phase summaries
    Info,
    /// Every probe and redirect hop
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// `--log-format` values.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Colored, one line per record
    Plain,
    /// One JSON object per line
    Json,
}

/// Report output format for the CLI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Sectioned, human-readable report
    Text,
    /// Serialized `AuditReport`
    Json,
}

/// How "internal" is decided when comparing a reference against the audited page.
///
/// The policy is fixed for a whole run; it is never mixed per reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum InternalPolicy {
    /// Same registrable domain (`cdn.example.com` is internal to `www.example.com`).
    /// Falls back to exact host comparison for IP addresses and unknown suffixes.
    RegistrableDomain,
    /// Exact host match only
    ExactHost,
}

/// Delay schedule between retry attempts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum BackoffKind {
    /// Same delay before every retry
    Fixed,
    /// Delay doubles after every retry, capped at `RETRY_MAX_DELAY_SECS`
    Exponential,
}

/// Request method strategy used by the fetcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MethodPreference {
    /// Issue HEAD; on 403/405 retry that hop once with GET
    HeadThenGet,
    /// Always GET
    GetOnly,
}

/// Bounded retry policy for a single probe.
///
/// `max_attempts` counts the initial attempt, so `1` disables retries. The
/// HEAD→GET fallback is part of one attempt and is not counted here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub backoff: BackoffKind,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: RETRY_MAX_ATTEMPTS,
            backoff: BackoffKind::Fixed,
            delay: Duration::from_millis(RETRY_INITIAL_DELAY_MS),
        }
    }
}

/// Options applied to every probe issued by a [`Fetcher`](crate::fetch::Fetcher).
#[derive(Clone, Debug)]
pub struct ProbeOptions {
    /// Budget for one probe attempt, including every redirect hop
    pub timeout: Duration,
    pub method: MethodPreference,
    pub max_redirects: usize,
    pub user_agent: String,
    pub retry: RetryPolicy,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(PROBE_TIMEOUT_SECS),
            method: MethodPreference::HeadThenGet,
            max_redirects: MAX_REDIRECT_HOPS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

/// Progress notification emitted by the link auditor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressEvent {
    /// Targets settled so far (probed, failed or skipped)
    pub completed: usize,
    /// Deduplicated targets in this run
    pub total: usize,
}

/// Orchestration options for one `audit_links` run.
#[derive(Clone, Debug)]
pub struct LinkAuditOptions {
    /// Maximum probes in flight at once
    pub max_concurrency: usize,
    /// Wall-clock budget for the whole link-audit phase
    pub deadline: Duration,
    /// Minimum spacing between probes to one busy host
    pub host_spacing: Duration,
    /// Targets per host before `host_spacing` applies
    pub host_spacing_threshold: usize,
    /// When false, external targets are reported as skipped instead of probed
    pub check_external: bool,
    /// Optional subscriber for `(completed, total)` progress events
    pub progress: Option<mpsc::UnboundedSender<ProgressEvent>>,
}

impl Default for LinkAuditOptions {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            deadline: AUDIT_DEADLINE,
            host_spacing: Duration::from_millis(HOST_SPACING_MS),
            host_spacing_threshold: HOST_SPACING_THRESHOLD,
            check_external: true,
            progress: None,
        }
    }
}

/// Policy parameters for the pure classification checks.
///
/// None of these numbers carry meaning beyond being a reasonable default; tests
/// and callers are expected to tune them.
#[derive(Clone, Debug)]
pub struct AuditPolicy {
    pub long_url_threshold: usize,
    pub anchor_repeat_threshold: usize,
    pub max_links: usize,
    pub generic_anchor_phrases: Vec<String>,
    pub title_length: RangeInclusive<usize>,
    pub meta_description_length: RangeInclusive<usize>,
    /// Drop `<header>`, `<nav>` and `<footer>` subtrees before extracting anchors and images
    pub strip_boilerplate: bool,
    pub internal_policy: InternalPolicy,
}

impl Default for AuditPolicy {
    fn default() -> Self {
        Self {
            long_url_threshold: LONG_URL_THRESHOLD,
            anchor_repeat_threshold: ANCHOR_REPEAT_THRESHOLD,
            max_links: MAX_LINKS_PER_PAGE,
            generic_anchor_phrases: GENERIC_ANCHOR_PHRASES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            title_length: TITLE_MIN_LENGTH..=TITLE_MAX_LENGTH,
            meta_description_length: META_DESCRIPTION_MIN_LENGTH..=META_DESCRIPTION_MAX_LENGTH,
            strip_boilerplate: true,
            internal_policy: InternalPolicy::RegistrableDomain,
        }
    }
}

/// Library and CLI configuration.
///
/// Parsed from the command line by the binary, or constructed directly by
/// library users.
///
/// # Examples
///
/// ```no_run
/// use seo_audit::Config;
///
/// let config = Config {
///     url: "https://example.com".to_string(),
///     max_concurrency: 16,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "seo_audit",
    version,
    about = "Audits a single page for on-page SEO issues and validates every link and resource it references"
)]
pub struct Config {
    /// URL of the page to audit (https:// is assumed when no scheme is given)
    pub url: String,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Maximum concurrent probes
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENCY)]
    pub max_concurrency: usize,

    /// Per-probe timeout in seconds
    #[arg(long, default_value_t = PROBE_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// Maximum redirect hops followed per probe
    #[arg(long, default_value_t = MAX_REDIRECT_HOPS)]
    pub max_redirects: usize,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Wall-clock budget for the link-audit phase in seconds
    #[arg(long, default_value_t = AUDIT_DEADLINE.as_secs())]
    pub audit_deadline_seconds: u64,

    /// Minimum spacing between probes to one busy host, in milliseconds
    #[arg(long, default_value_t = HOST_SPACING_MS)]
    pub host_spacing_ms: u64,

    /// Number of targets on one host before host spacing applies
    #[arg(long, default_value_t = HOST_SPACING_THRESHOLD)]
    pub host_spacing_threshold: usize,

    /// Attempts per probe, including the first (1 disables retries)
    #[arg(long, default_value_t = RETRY_MAX_ATTEMPTS)]
    pub retry_attempts: usize,

    /// Delay schedule between retries
    #[arg(long, value_enum, default_value_t = BackoffKind::Fixed)]
    pub retry_backoff: BackoffKind,

    /// Base delay between retries in milliseconds
    #[arg(long, default_value_t = RETRY_INITIAL_DELAY_MS)]
    pub retry_delay_ms: u64,

    /// Report external links as skipped instead of probing them
    #[arg(long)]
    pub skip_external: bool,

    /// Keep header/nav/footer links and images in the audit
    #[arg(long)]
    pub include_boilerplate: bool,

    /// How internal links are recognized
    #[arg(long, value_enum, default_value_t = InternalPolicy::RegistrableDomain)]
    pub internal_policy: InternalPolicy,

    /// URLs longer than this many characters are flagged
    #[arg(long, default_value_t = LONG_URL_THRESHOLD)]
    pub long_url_threshold: usize,

    /// Anchor text repeated more often than this is flagged
    #[arg(long, default_value_t = ANCHOR_REPEAT_THRESHOLD)]
    pub anchor_repeat_threshold: usize,

    /// Pages with more links than this are flagged
    #[arg(long, default_value_t = MAX_LINKS_PER_PAGE)]
    pub max_links: usize,

    /// Report output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write the report to this file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// API key for the advisory provider (advice is disabled without it)
    #[arg(long, env = "SEO_AUDIT_ADVISOR_API_KEY", hide_env_values = true)]
    pub advisor_api_key: Option<String>,

    /// OpenAI-compatible chat completions endpoint
    #[arg(long, default_value = DEFAULT_ADVISOR_ENDPOINT)]
    pub advisor_endpoint: String,

    /// Model requested from the advisory endpoint
    #[arg(long, default_value = DEFAULT_ADVISOR_MODEL)]
    pub advisor_model: String,

    /// Timeout for one advisory request in seconds
    #[arg(long, default_value_t = ADVISOR_TIMEOUT_SECS)]
    pub advisor_timeout_seconds: u64,

    /// Fetch page-speed metrics from PageSpeed Insights
    #[arg(long)]
    pub pagespeed: bool,

    /// PageSpeed Insights API key (optional, raises quota)
    #[arg(long, env = "SEO_AUDIT_PAGESPEED_API_KEY", hide_env_values = true)]
    pub pagespeed_api_key: Option<String>,

    /// PageSpeed Insights strategy
    #[arg(long, default_value = "mobile")]
    pub pagespeed_strategy: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: String::new(),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            timeout_seconds: PROBE_TIMEOUT_SECS,
            max_redirects: MAX_REDIRECT_HOPS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            audit_deadline_seconds: AUDIT_DEADLINE.as_secs(),
            host_spacing_ms: HOST_SPACING_MS,
            host_spacing_threshold: HOST_SPACING_THRESHOLD,
            retry_attempts: RETRY_MAX_ATTEMPTS,
            retry_backoff: BackoffKind::Fixed,
            retry_delay_ms: RETRY_INITIAL_DELAY_MS,
            skip_external: false,
            include_boilerplate: false,
            internal_policy: InternalPolicy::RegistrableDomain,
            long_url_threshold: LONG_URL_THRESHOLD,
            anchor_repeat_threshold: ANCHOR_REPEAT_THRESHOLD,
            max_links: MAX_LINKS_PER_PAGE,
            format: OutputFormat::Text,
            output: None,
            advisor_api_key: None,
            advisor_endpoint: DEFAULT_ADVISOR_ENDPOINT.to_string(),
            advisor_model: DEFAULT_ADVISOR_MODEL.to_string(),
            advisor_timeout_seconds: ADVISOR_TIMEOUT_SECS,
            pagespeed: false,
            pagespeed_api_key: None,
            pagespeed_strategy: "mobile".to_string(),
        }
    }
}

impl Config {
    /// Classification policy derived from this configuration.
    pub fn policy(&self) -> AuditPolicy {
        AuditPolicy {
            long_url_threshold: self.long_url_threshold,
            anchor_repeat_threshold: self.anchor_repeat_threshold,
            max_links: self.max_links,
            strip_boilerplate: !self.include_boilerplate,
            internal_policy: self.internal_policy,
            ..AuditPolicy::default()
        }
    }

    /// Probe options derived from this configuration.
    pub fn probe_options(&self) -> ProbeOptions {
        ProbeOptions {
            timeout: Duration::from_secs(self.timeout_seconds),
            method: MethodPreference::HeadThenGet,
            max_redirects: self.max_redirects,
            user_agent: self.user_agent.clone(),
            retry: RetryPolicy {
                max_attempts: self.retry_attempts.max(1),
                backoff: self.retry_backoff,
                delay: Duration::from_millis(self.retry_delay_ms),
            },
        }
    }

    /// Link-audit orchestration options derived from this configuration.
    pub fn link_audit_options(&self) -> LinkAuditOptions {
        LinkAuditOptions {
            max_concurrency: self.max_concurrency.max(1),
            deadline: Duration::from_secs(self.audit_deadline_seconds),
            host_spacing: Duration::from_millis(self.host_spacing_ms),
            host_spacing_threshold: self.host_spacing_threshold,
            check_external: !self.skip_external,
            progress: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_config_default_matches_cli_defaults() {
        let parsed = Config::try_parse_from(["seo_audit", "https://example.com"])
            .expect("minimal invocation should parse");
        let default = Config::default();

        assert_eq!(parsed.url, "https://example.com");
        assert_eq!(parsed.max_concurrency, default.max_concurrency);
        assert_eq!(parsed.timeout_seconds, default.timeout_seconds);
        assert_eq!(parsed.max_redirects, default.max_redirects);
        assert_eq!(parsed.user_agent, default.user_agent);
        assert_eq!(parsed.audit_deadline_seconds, default.audit_deadline_seconds);
        assert_eq!(parsed.host_spacing_ms, default.host_spacing_ms);
        assert_eq!(parsed.retry_attempts, default.retry_attempts);
        assert_eq!(parsed.retry_backoff, default.retry_backoff);
        assert_eq!(parsed.internal_policy, default.internal_policy);
        assert_eq!(parsed.long_url_threshold, default.long_url_threshold);
        assert_eq!(parsed.anchor_repeat_threshold, default.anchor_repeat_threshold);
        assert_eq!(parsed.max_links, default.max_links);
        assert_eq!(parsed.format, default.format);
        assert_eq!(parsed.advisor_endpoint, default.advisor_endpoint);
        assert!(!parsed.pagespeed);
    }

    #[test]
    fn test_config_default_values() {
        let config = Config::default();
        assert_eq!(config.max_concurrency, 8);
        assert_eq!(config.timeout_seconds, 5);
        assert_eq!(config.max_redirects, 10);
        assert_eq!(config.audit_deadline_seconds, 60);
        assert!(!config.skip_external);
        assert!(config.output.is_none());
    }

    #[test]
    fn test_probe_options_never_zero_attempts() {
        let config = Config {
            retry_attempts: 0,
            ..Default::default()
        };
        assert_eq!(config.probe_options().retry.max_attempts, 1);
    }

    #[test]
    fn test_policy_follows_config() {
        let config = Config {
            long_url_threshold: 80,
            include_boilerplate: true,
            internal_policy: InternalPolicy::ExactHost,
            ..Default::default()
        };
        let policy = config.policy();
        assert_eq!(policy.long_url_threshold, 80);
        assert!(!policy.strip_boilerplate);
        assert_eq!(policy.internal_policy, InternalPolicy::ExactHost);
        assert_eq!(policy.generic_anchor_phrases.len(), GENERIC_ANCHOR_PHRASES.len());
    }

    #[test]
    fn test_link_audit_options_follow_config() {
        let config = Config {
            skip_external: true,
            audit_deadline_seconds: 3,
            max_concurrency: 0,
            ..Default::default()
        };
        let options = config.link_audit_options();
        assert!(!options.check_external);
        assert_eq!(options.deadline, Duration::from_secs(3));
        assert_eq!(options.max_concurrency, 1);
    }
}
