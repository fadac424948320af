//! Network access: probing references and fetching the audited page.
//!
//! Probes never fail: every transport error, timeout or odd redirect
//! sequence is folded into a [`FetchOutcome`] value at this boundary.
//! Only [`fetch_page`] returns errors, since the audit cannot continue
//! without the page.

mod page;
mod probe;
mod redirects;
mod request;
mod types;

pub use page::{fetch_page, PageFetch};
pub use probe::Fetcher;
pub use types::{FetchOutcome, FetchStatus};
