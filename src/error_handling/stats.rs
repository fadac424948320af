//! Per-run probe counters.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};

use strum::IntoEnumIterator;

use super::types::{InfoType, NetworkErrorKind};

/// One atomic counter per enum variant, all present from the start.
struct Counters<K> {
    slots: HashMap<K, AtomicUsize>,
}

impl<K: IntoEnumIterator + Eq + Hash + Copy> Counters<K> {
    fn new() -> Self {
        Self {
            slots: K::iter().map(|key| (key, AtomicUsize::new(0))).collect(),
        }
    }

    fn bump(&self, key: K) {
        if let Some(slot) = self.slots.get(&key) {
            slot.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn get(&self, key: K) -> usize {
        self.slots
            .get(&key)
            .map_or(0, |slot| slot.load(Ordering::Relaxed))
    }

    fn sum(&self) -> usize {
        self.slots
            .values()
            .map(|slot| slot.load(Ordering::Relaxed))
            .sum()
    }

    /// Non-zero counters in enum declaration order.
    fn non_zero(&self) -> impl Iterator<Item = (K, usize)> + '_ {
        K::iter()
            .map(|key| (key, self.get(key)))
            .filter(|(_, count)| *count > 0)
    }
}

/// Network failures and notable events seen during one `audit_links` call.
///
/// Shared by all probe tasks of the run; every update is a relaxed atomic
/// increment.
pub struct ProcessingStats {
    errors: Counters<NetworkErrorKind>,
    info: Counters<InfoType>,
}

impl ProcessingStats {
    pub fn new() -> Self {
        ProcessingStats {
            errors: Counters::new(),
            info: Counters::new(),
        }
    }

    pub fn increment_error(&self, error: NetworkErrorKind) {
        self.errors.bump(error);
    }

    pub fn increment_info(&self, info_type: InfoType) {
        self.info.bump(info_type);
    }

    pub fn get_error_count(&self, error: NetworkErrorKind) -> usize {
        self.errors.get(error)
    }

    pub fn get_info_count(&self, info_type: InfoType) -> usize {
        self.info.get(info_type)
    }

    pub fn total_errors(&self) -> usize {
        self.errors.sum()
    }

    /// Logs the non-zero counters at debug level.
    pub fn log_summary(&self) {
        for (kind, count) in self.errors.non_zero() {
            log::debug!("{}: {}", kind.as_str(), count);
        }
        for (info_type, count) in self.info.non_zero() {
            log::debug!("{}: {}", info_type.as_str(), count);
        }
    }
}

impl Default for ProcessingStats {
    fn default() -> Self {
        Self::new()
    }
}
