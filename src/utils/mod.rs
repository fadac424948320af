//! Small shared helpers.
//!
//! This module provides:
//! - CSS selector parsing with a non-panicking fallback
//! - Text normalization and sanitization

pub mod sanitize;
mod selector;

pub use sanitize::{collapse_whitespace, sanitize_and_truncate, sanitize_text};
pub use selector::parse_selector_with_fallback;
