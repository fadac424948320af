//! HTML parsing and reference extraction.
//!
//! This module turns the audited page's bytes into:
//! - Typed reference lists (anchors, images, scripts, stylesheets, canonical, hreflang)
//! - Page metadata (title, meta description, `lang`, headings)
//!
//! All parsing is done using CSS selectors via the `scraper` crate. Nothing
//! here performs I/O or fails.

mod html;
mod references;

// Re-export public API
pub use html::{
    extract_base_href, extract_headings, extract_lang, extract_meta_description, extract_title,
    Heading, PageMetadata,
};
pub use references::{
    extract, extract_from_document, ExtractedRefs, PageReference, ReferenceKind,
};
