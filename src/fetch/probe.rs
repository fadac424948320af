//! The probe fetcher.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

use log::debug;
use tokio_retry::Retry;
use url::Url;

use crate::config::ProbeOptions;
use crate::error_handling::{get_retry_strategy, is_retriable_outcome, InitializationError};
use crate::fetch::redirects::follow_redirects;
use crate::fetch::types::{FetchOutcome, FetchStatus};
use crate::initialization::init_probe_client;

/// Probes reference targets and turns every result into a [`FetchOutcome`].
///
/// Cloning is cheap: the underlying `reqwest::Client` is reference counted.
#[derive(Clone, Debug)]
pub struct Fetcher {
    client: reqwest::Client,
    options: ProbeOptions,
}

impl Fetcher {
    /// Creates a fetcher with its own probe client.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::HttpClientError` if the client cannot be built.
    pub fn new(options: ProbeOptions) -> Result<Self, InitializationError> {
        let client = init_probe_client(&options)?;
        Ok(Self { client, options })
    }

    pub fn options(&self) -> &ProbeOptions {
        &self.options
    }

    /// Probes one URL.
    ///
    /// Each attempt is bounded by `options.timeout` (all redirect hops
    /// included). Retriable outcomes (timeouts, transient network errors,
    /// 429, 5xx) are retried according to `options.retry`; the last outcome
    /// is returned when attempts run out. Never fails and never panics.
    pub async fn probe(&self, url: &Url) -> FetchOutcome {
        let start = Instant::now();
        let attempts = AtomicU32::new(0);
        let counter = &attempts;
        let fetcher = self;

        let result = Retry::spawn(get_retry_strategy(&self.options.retry), || async move {
            let attempt = counter.fetch_add(1, Ordering::SeqCst) + 1;
            let outcome = fetcher.attempt(url).await;
            if is_retriable_outcome(&outcome) {
                debug!(
                    "Attempt {} for {} ended with {:?}, retriable",
                    attempt, url, outcome.status
                );
                Err(outcome)
            } else {
                Ok(outcome)
            }
        })
        .await;

        let mut outcome = match result {
            Ok(outcome) | Err(outcome) => outcome,
        };
        outcome.attempts = attempts.load(Ordering::SeqCst);
        outcome.latency = start.elapsed();
        outcome
    }

    async fn attempt(&self, url: &Url) -> FetchOutcome {
        let started = Instant::now();
        match tokio::time::timeout(
            self.options.timeout,
            follow_redirects(&self.client, url, &self.options),
        )
        .await
        {
            Ok(walk) => FetchOutcome {
                url: url.clone(),
                status: walk.status,
                final_url: walk.final_url,
                redirect_chain: walk.redirect_chain,
                redirect_statuses: walk.redirect_statuses,
                latency: started.elapsed(),
                attempts: 1,
                head_rejected: walk.head_rejected,
            },
            Err(_) => {
                debug!("Probe of {} timed out after {:?}", url, self.options.timeout);
                FetchOutcome::failed(url.clone(), FetchStatus::Timeout, started.elapsed())
            }
        }
    }
}
