//! Page metadata extraction.
//!
//! This module extracts the document-level facts the content checks need:
//! - Page title
//! - Meta description
//! - `<html lang>`
//! - Heading outline
//! - `<base href>`
//!
//! Missing elements come back as `None`/empty rather than errors; malformed
//! documents are normal input.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde::Serialize;

use crate::utils::{collapse_whitespace, parse_selector_with_fallback};

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("title", "title extraction"));

static META_DESCRIPTION_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_with_fallback("meta[name]", "meta description extraction")
});

static HTML_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("html", "lang extraction"));

static HEADING_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_with_fallback("h1, h2, h3, h4, h5, h6", "heading extraction")
});

static BASE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("base[href]", "base href extraction"));

/// One heading in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    /// 1 for `<h1>` through 6 for `<h6>`
    pub level: u8,
    pub text: String,
}

/// Document-level facts extracted alongside the references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub lang: Option<String>,
    pub headings: Vec<Heading>,
}

impl PageMetadata {
    pub fn from_document(document: &Html) -> Self {
        Self {
            title: extract_title(document),
            meta_description: extract_meta_description(document),
            lang: extract_lang(document),
            headings: extract_headings(document),
        }
    }
}

/// Extracts the page title.
///
/// Returns the whitespace-collapsed text of the first `<title>`, or `None`
/// when the element is absent or empty.
pub fn extract_title(document: &Html) -> Option<String> {
    let title = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|element| collapse_whitespace(&element.text().collect::<String>()))?;
    log::debug!("Extracted title: {:?}", title);
    (!title.is_empty()).then_some(title)
}

/// Extracts `<meta name="description" content="...">`.
///
/// The `name` comparison is case-insensitive. Empty content counts as absent.
pub fn extract_meta_description(document: &Html) -> Option<String> {
    document
        .select(&META_DESCRIPTION_SELECTOR)
        .filter(|element| {
            element
                .value()
                .attr("name")
                .is_some_and(|name| name.trim().eq_ignore_ascii_case("description"))
        })
        .find_map(|element| element.value().attr("content"))
        .map(collapse_whitespace)
        .filter(|content| !content.is_empty())
}

/// Extracts the non-empty `lang` attribute of the root `<html>` element.
pub fn extract_lang(document: &Html) -> Option<String> {
    document
        .select(&HTML_SELECTOR)
        .next()
        .and_then(|element| element.value().attr("lang"))
        .map(str::trim)
        .filter(|lang| !lang.is_empty())
        .map(str::to_string)
}

/// Extracts all headings in document order.
pub fn extract_headings(document: &Html) -> Vec<Heading> {
    document
        .select(&HEADING_SELECTOR)
        .filter_map(|element| {
            let level = element.value().name().strip_prefix('h')?.parse::<u8>().ok()?;
            Some(Heading {
                level,
                text: collapse_whitespace(&element.text().collect::<String>()),
            })
        })
        .collect()
}

/// Extracts the raw `href` of the first `<base>` element, if any.
pub fn extract_base_href(document: &Html) -> Option<String> {
    document
        .select(&BASE_SELECTOR)
        .next()
        .and_then(|element| element.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(str::to_string)
}
