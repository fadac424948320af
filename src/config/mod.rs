//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, limits, policy thresholds)
//! - HTTP request header presets
//! - CLI option types and the derived option structs used by each component

mod constants;
mod headers;
mod types;

// Re-export all constants
pub use constants::*;
pub use headers::*;
pub use types::{
    AuditPolicy, BackoffKind, Config, InternalPolicy, LinkAuditOptions, LogFormat, LogLevel,
    MethodPreference, OutputFormat, ProbeOptions, ProgressEvent, RetryPolicy,
};
