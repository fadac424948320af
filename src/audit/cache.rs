//! Per-run probe outcome cache with single-flight semantics.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::sync::OnceCell;
use url::Url;

use crate::fetch::FetchOutcome;

/// Write-once cache of probe outcomes keyed by resolved URL.
///
/// Concurrent requests for one URL share a single in-flight probe; the first
/// completed result is kept for the rest of the run. The cache lives only as
/// long as one `audit_links` call.
#[derive(Default)]
pub(crate) struct OutcomeCache {
    cells: Mutex<HashMap<Url, Arc<OnceCell<FetchOutcome>>>>,
}

impl OutcomeCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn cell(&self, url: &Url) -> Arc<OnceCell<FetchOutcome>> {
        // A poisoned lock only means another task panicked mid-insert; the map is still usable
        let mut cells = self
            .cells
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(cells.entry(url.clone()).or_default())
    }

    /// Returns the cached outcome for `url`, running `probe` if nobody has yet.
    ///
    /// If the future driving `probe` is dropped before completing, the next
    /// caller runs its own probe.
    pub(crate) async fn get_or_probe<F, Fut>(&self, url: &Url, probe: F) -> FetchOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = FetchOutcome>,
    {
        let cell = self.cell(url);
        cell.get_or_init(probe).await.clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.cells
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .values()
            .filter(|cell| cell.initialized())
            .count()
    }
}
