//! Fetching the audited page itself.

use log::{debug, info, warn};
use url::Url;

use crate::config::MAX_RESPONSE_BODY_SIZE;
use crate::error_handling::{categorize_reqwest_error, FetchError};
use crate::fetch::request::RequestHeaders;

/// The audited page as delivered by the server.
#[derive(Debug, Clone)]
pub struct PageFetch {
    pub status_code: u16,
    /// URL after redirects; relative references resolve against it
    pub final_url: Url,
    pub body: Vec<u8>,
}

/// Fetches the audited page with GET, following redirects on the client.
///
/// The body is capped at `MAX_RESPONSE_BODY_SIZE`; anything beyond is
/// dropped with a warning.
///
/// # Errors
///
/// Every failure here is fatal to the run: transport errors, timeouts,
/// non-success statuses and unreadable bodies all return a [`FetchError`].
pub async fn fetch_page(client: &reqwest::Client, url: &Url) -> Result<PageFetch, FetchError> {
    info!("Fetching {}", url);

    let response = RequestHeaders::apply_document(client.get(url.clone()))
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Unreachable {
                    url: url.to_string(),
                    reason: categorize_reqwest_error(&e).to_string(),
                }
            }
        })?;

    let status = response.status();
    let final_url = response.url().clone();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let mut response = response;
    let mut body = Vec::new();
    loop {
        let chunk = response.chunk().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Body {
                    url: url.to_string(),
                    reason: categorize_reqwest_error(&e).to_string(),
                }
            }
        })?;
        let Some(chunk) = chunk else {
            break;
        };
        let remaining = MAX_RESPONSE_BODY_SIZE - body.len();
        if chunk.len() > remaining {
            body.extend_from_slice(&chunk[..remaining]);
            warn!(
                "Body of {} exceeds {} bytes, truncating",
                final_url, MAX_RESPONSE_BODY_SIZE
            );
            break;
        }
        body.extend_from_slice(&chunk);
    }

    debug!(
        "Fetched {} ({} bytes, final URL {})",
        url,
        body.len(),
        final_url
    );

    Ok(PageFetch {
        status_code: status.as_u16(),
        final_url,
        body,
    })
}
