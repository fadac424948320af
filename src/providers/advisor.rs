//! OpenAI-compatible chat-completions advisor.

use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use futures::future::BoxFuture;
use serde_json::{json, Value};

use crate::config::{ADVISOR_TIMEOUT_SECS, DEFAULT_ADVISOR_ENDPOINT, DEFAULT_ADVISOR_MODEL};
use crate::error_handling::InitializationError;
use crate::providers::AdviceProvider;
use crate::utils::sanitize_and_truncate;

/// Explicit advisor configuration. Nothing is read from process-wide state.
#[derive(Clone)]
pub struct AdvisorConfig {
    pub api_key: String,
    pub endpoint: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: DEFAULT_ADVISOR_ENDPOINT.to_string(),
            model: DEFAULT_ADVISOR_MODEL.to_string(),
            timeout: Duration::from_secs(ADVISOR_TIMEOUT_SECS),
        }
    }
}

// Keep the key out of logs
impl std::fmt::Debug for AdvisorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdvisorConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Asks a chat-completions endpoint for advice.
#[derive(Debug)]
pub struct ChatAdvisor {
    client: reqwest::Client,
    config: AdvisorConfig,
}

impl ChatAdvisor {
    /// # Errors
    ///
    /// Returns `InitializationError::HttpClientError` if the client cannot be built.
    pub fn new(config: AdvisorConfig) -> Result<Self, InitializationError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    async fn request(&self, prompt: &str) -> anyhow::Result<String> {
        let body = json!({
            "model": self.config.model,
            "messages": [
                { "role": "user", "content": prompt }
            ],
        });

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .context("advice request failed")?;
        let status = response.status();
        let text = response
            .text()
            .await
            .context("advice response read failed")?;
        if !status.is_success() {
            bail!(
                "advice endpoint returned HTTP {}: {}",
                status.as_u16(),
                sanitize_and_truncate(&text, 200)
            );
        }

        let reply: Value = serde_json::from_str(&text).context("advice response parse failed")?;
        extract_reply(&reply)
    }
}

/// Pulls the first choice's message content out of a chat-completions reply.
fn extract_reply(reply: &Value) -> anyhow::Result<String> {
    if let Some(message) = reply.pointer("/error/message").and_then(Value::as_str) {
        bail!("advice endpoint error: {}", message);
    }
    reply
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| anyhow!("advice response has no message content"))
}

impl AdviceProvider for ChatAdvisor {
    fn advise<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, anyhow::Result<String>> {
        Box::pin(self.request(prompt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_reply() {
        let reply = json!({
            "choices": [
                { "message": { "role": "assistant", "content": "  Shorten the title.\n" } }
            ]
        });
        assert_eq!(extract_reply(&reply).unwrap(), "Shorten the title.");
    }

    #[test]
    fn test_extract_reply_error_object() {
        let reply = json!({ "error": { "message": "invalid api key" } });
        let err = extract_reply(&reply).unwrap_err();
        assert!(err.to_string().contains("invalid api key"));
    }

    #[test]
    fn test_extract_reply_missing_content() {
        assert!(extract_reply(&json!({ "choices": [] })).is_err());
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = AdvisorConfig {
            api_key: "sk-secret".to_string(),
            ..Default::default()
        };
        assert!(!format!("{:?}", config).contains("sk-secret"));
    }
}
