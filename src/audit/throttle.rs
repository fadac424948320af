//! Per-host politeness spacing.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use url::Url;

/// Spaces out probes to hosts that appear many times in one run.
///
/// Hosts with fewer than `threshold` distinct URLs are never delayed. For busy
/// hosts each probe reserves the next slot `spacing` after the previous one.
pub(crate) struct HostThrottle {
    spacing: Duration,
    busy_hosts: HashMap<String, usize>,
    next_slot: Mutex<HashMap<String, Instant>>,
}

impl HostThrottle {
    pub(crate) fn new<'a>(
        urls: impl IntoIterator<Item = &'a Url>,
        spacing: Duration,
        threshold: usize,
    ) -> Self {
        let unique: HashSet<&Url> = urls.into_iter().collect();
        let mut counts: HashMap<String, usize> = HashMap::new();
        for host in unique.into_iter().filter_map(Url::host_str) {
            *counts.entry(host.to_string()).or_insert(0) += 1;
        }
        let busy_hosts = if spacing.is_zero() {
            HashMap::new()
        } else {
            counts
                .into_iter()
                .filter(|(_, count)| *count >= threshold.max(1))
                .collect()
        };
        Self {
            spacing,
            busy_hosts,
            next_slot: Mutex::new(HashMap::new()),
        }
    }

    fn is_throttled(&self, url: &Url) -> bool {
        url.host_str()
            .is_some_and(|host| self.busy_hosts.contains_key(host))
    }

    /// Waits until `url`'s host may be probed again.
    pub(crate) async fn wait(&self, url: &Url) {
        if !self.is_throttled(url) {
            return;
        }
        let Some(host) = url.host_str() else {
            return;
        };

        let slot = {
            let mut next_slot = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = next_slot
                .get(host)
                .copied()
                .filter(|slot| *slot > now)
                .unwrap_or(now);
            next_slot.insert(host.to_string(), slot + self.spacing);
            slot
        };

        tokio::time::sleep_until(slot).await;
    }
}
