//! Manual redirect following for probes.
//!
//! The probe client has redirects disabled so every hop is observed: its
//! status goes into the chain and a URL seen twice stops the walk.

use log::{debug, trace};
use reqwest::{Method, StatusCode};
use url::Url;

use crate::config::{
    MethodPreference, ProbeOptions, HTTP_STATUS_FORBIDDEN, HTTP_STATUS_METHOD_NOT_ALLOWED,
};
use crate::error_handling::{categorize_reqwest_error, NetworkErrorKind};
use crate::fetch::request::RequestHeaders;
use crate::fetch::types::FetchStatus;

/// Everything one probe attempt learned while walking redirects.
#[derive(Debug)]
pub(crate) struct RedirectWalk {
    pub status: FetchStatus,
    pub final_url: Option<Url>,
    pub redirect_chain: Vec<Url>,
    pub redirect_statuses: Vec<u16>,
    pub head_rejected: bool,
}

impl RedirectWalk {
    fn new() -> Self {
        Self {
            status: FetchStatus::Skipped(String::new()),
            final_url: None,
            redirect_chain: Vec::new(),
            redirect_statuses: Vec::new(),
            head_rejected: false,
        }
    }

    fn finish(mut self, status: FetchStatus, final_url: Option<Url>) -> Self {
        self.status = status;
        self.final_url = final_url;
        self
    }
}

fn is_redirect(status: StatusCode) -> bool {
    matches!(status.as_u16(), 301 | 302 | 303 | 307 | 308)
}

/// Follows redirects from `start` up to `options.max_redirects` hops.
///
/// Issues HEAD unless `options.method` is `GetOnly`. A 403 or 405 answer to
/// HEAD re-issues the same hop with GET, and GET is used for the rest of the
/// walk. Transport failures become `NetworkError`; reqwest timeouts become
/// `Timeout`. This function never returns an error.
pub(crate) async fn follow_redirects(
    client: &reqwest::Client,
    start: &Url,
    options: &ProbeOptions,
) -> RedirectWalk {
    let mut walk = RedirectWalk::new();
    let mut current = start.clone();
    let mut method = match options.method {
        MethodPreference::HeadThenGet => Method::HEAD,
        MethodPreference::GetOnly => Method::GET,
    };

    loop {
        trace!("{} {}", method, current);
        let request = RequestHeaders::apply_probe(client.request(method.clone(), current.clone()));
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                debug!("Probe of {} failed: {}", current, e);
                let status = if e.is_timeout() {
                    FetchStatus::Timeout
                } else {
                    FetchStatus::NetworkError(categorize_reqwest_error(&e))
                };
                return walk.finish(status, None);
            }
        };

        let status = response.status();
        let code = status.as_u16();

        if method == Method::HEAD
            && (code == HTTP_STATUS_FORBIDDEN || code == HTTP_STATUS_METHOD_NOT_ALLOWED)
        {
            debug!("HEAD rejected with {} for {}, retrying with GET", code, current);
            walk.head_rejected = true;
            method = Method::GET;
            continue;
        }

        if !is_redirect(status) {
            let fetch_status = if code < 400 {
                FetchStatus::Ok(code)
            } else {
                FetchStatus::HttpError(code)
            };
            return walk.finish(fetch_status, Some(current));
        }

        let location = match response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|value| value.to_str().ok())
        {
            Some(location) => location.to_string(),
            None => {
                // A redirect status without somewhere to go is the final answer
                debug!("Redirect status {} for {} but no Location header", code, current);
                return walk.finish(FetchStatus::Ok(code), Some(current));
            }
        };

        let next = match current.join(&location) {
            Ok(mut next) if matches!(next.scheme(), "http" | "https") => {
                next.set_fragment(None);
                next
            }
            _ => {
                debug!("Unusable redirect location {:?} from {}", location, current);
                walk.redirect_chain.push(current);
                walk.redirect_statuses.push(code);
                return walk.finish(
                    FetchStatus::NetworkError(NetworkErrorKind::InvalidRedirectLocation),
                    None,
                );
            }
        };

        if walk.redirect_chain.len() >= options.max_redirects {
            debug!(
                "Redirect limit ({}) exceeded for {}",
                options.max_redirects, start
            );
            walk.redirect_chain.push(current);
            walk.redirect_statuses.push(code);
            return walk.finish(
                FetchStatus::NetworkError(NetworkErrorKind::RedirectLimitExceeded),
                None,
            );
        }

        walk.redirect_chain.push(current);
        walk.redirect_statuses.push(code);

        if walk.redirect_chain.contains(&next) {
            debug!("Redirect loop detected at {} for {}", next, start);
            walk.redirect_chain.push(next);
            return walk.finish(
                FetchStatus::NetworkError(NetworkErrorKind::RedirectLoop),
                None,
            );
        }

        current = next;
    }
}
