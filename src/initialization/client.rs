//! The two HTTP clients of an audit run.

use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::{Config, ProbeOptions};

/// Builds the probe client: redirects off so the fetcher walks and records
/// every hop, user agent and per-request timeout from `options`.
///
/// The connection pool is a performance detail; no audit state lives in it.
pub fn init_probe_client(options: &ProbeOptions) -> Result<reqwest::Client, reqwest::Error> {
    ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(options.timeout)
        .user_agent(options.user_agent.clone())
        .build()
}

/// Builds the page client. It follows up to `config.max_redirects` hops on
/// its own since only the final document matters for extraction.
pub fn init_page_client(config: &Config) -> Result<reqwest::Client, reqwest::Error> {
    ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent.clone())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_probe_client_builds() {
        assert!(init_probe_client(&ProbeOptions::default()).is_ok());
    }

    #[test]
    fn test_init_page_client_builds() {
        assert!(init_page_client(&Config::default()).is_ok());
    }
}
