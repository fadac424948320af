//! Error handling and probe statistics.
//!
//! This module provides:
//! - Error type definitions (initialization, fatal page fetch, audit)
//! - Network failure categorization for probes
//! - Retry strategy configuration and retriability rules
//! - Per-run probe statistics

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{
    categorize_reqwest_error, get_retry_strategy, is_retriable_outcome, update_probe_stats,
};
pub use stats::ProcessingStats;
pub use types::{AuditError, FetchError, InfoType, InitializationError, NetworkErrorKind};
