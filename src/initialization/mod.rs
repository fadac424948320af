//! Application initialization and resource setup.
//!
//! This module provides functions to initialize the shared resources of an
//! audit run:
//! - HTTP clients (probe client without redirects, page client with redirects)
//! - Logger
//! - Concurrency semaphore
//! - Domain suffix extractor
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;

use std::sync::Arc;

use tldextract::{TldExtractor, TldOption};
use tokio::sync::Semaphore;

// Re-export public API
pub use client::{init_page_client, init_probe_client};
pub use logger::init_logger_with;

/// Initializes a semaphore for controlling concurrency.
///
/// Creates a new semaphore with the specified permit count. This semaphore is used
/// to limit the number of concurrent probes.
pub fn init_semaphore(count: usize) -> Arc<Semaphore> {
    Arc::new(Semaphore::new(count.max(1)))
}

/// Initializes the domain suffix extractor used for registrable-domain matching.
pub fn init_extractor() -> Arc<TldExtractor> {
    Arc::new(TldExtractor::new(TldOption::default()))
}
