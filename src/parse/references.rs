//! Reference extraction.
//!
//! Anchors and images come from the main-content region (`<main>`, then
//! `<article>`, then `<section>`, then the whole document), optionally
//! without `<header>`, `<nav>` and `<footer>` subtrees. Scripts,
//! stylesheets, canonical and hreflang links are document-wide since they
//! usually live in `<head>`.

use std::collections::HashMap;
use std::sync::LazyLock;

use log::debug;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use strum_macros::{Display, EnumIter};
use url::Url;

use crate::parse::html::{extract_base_href, PageMetadata};
use crate::resolve::{resolve, DomainMatcher};
use crate::utils::{collapse_whitespace, parse_selector_with_fallback};

static MAIN_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("main", "main region"));
static ARTICLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("article", "article region"));
static SECTION_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("section", "section region"));
static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("a[href]", "anchor extraction"));
static IMAGE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("img[src]", "image extraction"));
static SCRIPT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("script[src]", "script extraction"));
static LINK_REL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("link[rel][href]", "link extraction"));
static HREFLANG_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_with_fallback("link[hreflang][href]", "hreflang extraction")
});
static NESTED_IMAGE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_with_fallback("img[alt]", "anchor image alt"));

const BOILERPLATE_ELEMENTS: &[&str] = &["header", "nav", "footer"];

/// What kind of element a reference came from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    #[strum(serialize = "link")]
    Anchor,
    #[strum(serialize = "image")]
    Image,
    #[strum(serialize = "stylesheet")]
    Stylesheet,
    #[strum(serialize = "script")]
    Script,
    #[strum(serialize = "canonical link")]
    Canonical,
    #[strum(serialize = "hreflang link")]
    Hreflang,
}

impl ReferenceKind {
    /// True for kinds whose failures are reported as broken resources
    /// rather than broken links.
    pub fn is_resource(self) -> bool {
        matches!(
            self,
            ReferenceKind::Image | ReferenceKind::Stylesheet | ReferenceKind::Script
        )
    }
}

/// One extracted reference on the audited page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageReference {
    pub kind: ReferenceKind,
    /// Attribute value exactly as written
    pub raw_target: String,
    /// Absolute URL; `None` for empty, fragment-only and non-http(s) targets
    pub resolved_url: Option<Url>,
    /// Whitespace-collapsed anchor text; `None` for other kinds
    pub visible_text: Option<String>,
    pub is_internal: bool,
    /// Image `alt` attribute; `None` when absent
    pub alt_text: Option<String>,
    /// Anchor text, else `aria-label`, else `title`, else alt of a nested
    /// image. `None` for non-anchors and anchors with no name at all.
    pub accessible_name: Option<String>,
    /// The element sits inside an `<a>`
    pub inside_anchor: bool,
    /// Extraction order across all kinds
    pub position: usize,
}

impl PageReference {
    /// Deduplication key: two references with the same key are one audited target.
    pub fn target_key(&self) -> Option<(ReferenceKind, &Url)> {
        self.resolved_url.as_ref().map(|url| (self.kind, url))
    }
}

/// Everything extracted from the audited page.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedRefs {
    /// The URL the page was fetched from (after redirects)
    pub page_url: Url,
    /// Base for relative references (`<base href>` when present)
    pub base_url: Url,
    pub metadata: PageMetadata,
    pub anchors: Vec<PageReference>,
    pub images: Vec<PageReference>,
    pub scripts: Vec<PageReference>,
    pub stylesheets: Vec<PageReference>,
    pub canonicals: Vec<PageReference>,
    pub hreflangs: Vec<PageReference>,
}

impl ExtractedRefs {
    /// All references in extraction order.
    pub fn references(&self) -> impl Iterator<Item = &PageReference> {
        self.anchors
            .iter()
            .chain(&self.images)
            .chain(&self.scripts)
            .chain(&self.stylesheets)
            .chain(&self.canonicals)
            .chain(&self.hreflangs)
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
            + self.images.len()
            + self.scripts.len()
            + self.stylesheets.len()
            + self.canonicals.len()
            + self.hreflangs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolves raw targets, computing each `(kind, raw_target)` pair at most once.
struct ReferenceBuilder<'a> {
    base: Url,
    matcher: &'a DomainMatcher,
    resolved: HashMap<(ReferenceKind, String), Option<Url>>,
    position: usize,
}

impl<'a> ReferenceBuilder<'a> {
    fn build(&mut self, kind: ReferenceKind, raw_target: &str) -> PageReference {
        let base = &self.base;
        let resolved_url = self
            .resolved
            .entry((kind, raw_target.to_string()))
            .or_insert_with(|| resolve(base, raw_target))
            .clone();
        let is_internal = resolved_url
            .as_ref()
            .is_some_and(|url| self.matcher.is_internal(url));
        let position = self.position;
        self.position += 1;

        PageReference {
            kind,
            raw_target: raw_target.to_string(),
            resolved_url,
            visible_text: None,
            is_internal,
            alt_text: None,
            accessible_name: None,
            inside_anchor: false,
            position,
        }
    }
}

fn has_ancestor(element: &ElementRef<'_>, names: &[&str]) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| names.contains(&ancestor.value().name()))
}

fn rel_contains(element: &ElementRef<'_>, token: &str) -> bool {
    element
        .value()
        .attr("rel")
        .is_some_and(|rel| rel.split_whitespace().any(|t| t.eq_ignore_ascii_case(token)))
}

fn non_empty_attr(element: &ElementRef<'_>, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .map(collapse_whitespace)
        .filter(|value| !value.is_empty())
}

fn main_region(document: &Html) -> ElementRef<'_> {
    document
        .select(&MAIN_SELECTOR)
        .next()
        .or_else(|| document.select(&ARTICLE_SELECTOR).next())
        .or_else(|| document.select(&SECTION_SELECTOR).next())
        .unwrap_or_else(|| document.root_element())
}

/// Extracts typed references and page metadata from raw HTML.
///
/// `page_url` is the URL the body was fetched from. A `<base href>` in the
/// document (resolved against `page_url`) becomes the base for every other
/// reference. `matcher` decides `is_internal` against the audited page.
///
/// Never fails: unparsable markup yields whatever html5ever recovers.
pub fn extract(
    html: &[u8],
    page_url: &Url,
    strip_boilerplate: bool,
    matcher: &DomainMatcher,
) -> ExtractedRefs {
    let text = String::from_utf8_lossy(html);
    let document = Html::parse_document(&text);
    extract_from_document(&document, page_url, strip_boilerplate, matcher)
}

/// Same as [`extract`] for an already parsed document.
pub fn extract_from_document(
    document: &Html,
    page_url: &Url,
    strip_boilerplate: bool,
    matcher: &DomainMatcher,
) -> ExtractedRefs {
    let base_url = extract_base_href(document)
        .and_then(|href| page_url.join(&href).ok())
        .filter(|base| matches!(base.scheme(), "http" | "https"))
        .unwrap_or_else(|| page_url.clone());

    let mut builder = ReferenceBuilder {
        base: base_url.clone(),
        matcher,
        resolved: HashMap::new(),
        position: 0,
    };

    let region = main_region(document);
    let in_content = |element: &ElementRef<'_>| {
        !strip_boilerplate || !has_ancestor(element, BOILERPLATE_ELEMENTS)
    };

    let anchors: Vec<PageReference> = region
        .select(&ANCHOR_SELECTOR)
        .filter(|element| in_content(element))
        .filter_map(|element| {
            let href = element.value().attr("href")?;
            let mut reference = builder.build(ReferenceKind::Anchor, href);
            let text = collapse_whitespace(&element.text().collect::<String>());
            reference.accessible_name = Some(text.clone())
                .filter(|t| !t.is_empty())
                .or_else(|| non_empty_attr(&element, "aria-label"))
                .or_else(|| non_empty_attr(&element, "title"))
                .or_else(|| {
                    element
                        .select(&NESTED_IMAGE_SELECTOR)
                        .find_map(|img| non_empty_attr(&img, "alt"))
                });
            reference.visible_text = Some(text);
            Some(reference)
        })
        .collect();

    let images: Vec<PageReference> = region
        .select(&IMAGE_SELECTOR)
        .filter(|element| in_content(element))
        .filter_map(|element| {
            let src = element.value().attr("src")?;
            let mut reference = builder.build(ReferenceKind::Image, src);
            reference.alt_text = element.value().attr("alt").map(collapse_whitespace);
            reference.inside_anchor = has_ancestor(&element, &["a"]);
            Some(reference)
        })
        .collect();

    let scripts: Vec<PageReference> = document
        .select(&SCRIPT_SELECTOR)
        .filter_map(|element| {
            let src = element.value().attr("src")?;
            Some(builder.build(ReferenceKind::Script, src))
        })
        .collect();

    let stylesheets: Vec<PageReference> = document
        .select(&LINK_REL_SELECTOR)
        .filter(|element| rel_contains(element, "stylesheet"))
        .filter_map(|element| {
            let href = element.value().attr("href")?;
            Some(builder.build(ReferenceKind::Stylesheet, href))
        })
        .collect();

    let canonicals: Vec<PageReference> = document
        .select(&LINK_REL_SELECTOR)
        .filter(|element| rel_contains(element, "canonical"))
        .filter_map(|element| {
            let href = element.value().attr("href")?;
            Some(builder.build(ReferenceKind::Canonical, href))
        })
        .collect();

    let hreflangs: Vec<PageReference> = document
        .select(&HREFLANG_SELECTOR)
        .filter_map(|element| {
            let href = element.value().attr("href")?;
            Some(builder.build(ReferenceKind::Hreflang, href))
        })
        .collect();

    let refs = ExtractedRefs {
        page_url: page_url.clone(),
        base_url,
        metadata: PageMetadata::from_document(document),
        anchors,
        images,
        scripts,
        stylesheets,
        canonicals,
        hreflangs,
    };

    debug!(
        "Extracted {} anchors, {} images, {} scripts, {} stylesheets, {} canonical, {} hreflang from {}",
        refs.anchors.len(),
        refs.images.len(),
        refs.scripts.len(),
        refs.stylesheets.len(),
        refs.canonicals.len(),
        refs.hreflangs.len(),
        page_url
    );

    refs
}
