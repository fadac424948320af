// Parse module tests.

use super::*;
use crate::config::InternalPolicy;
use crate::resolve::DomainMatcher;
use scraper::Html;
use std::sync::Arc;
use tldextract::{TldExtractor, TldOption};
use url::Url;

fn page() -> Url {
    Url::parse("https://www.example.com/blog/post").unwrap()
}

fn matcher() -> DomainMatcher {
    DomainMatcher::new(
        &page(),
        InternalPolicy::RegistrableDomain,
        Arc::new(TldExtractor::new(TldOption::default())),
    )
}

fn extract_str(html: &str, strip_boilerplate: bool) -> ExtractedRefs {
    extract(html.as_bytes(), &page(), strip_boilerplate, &matcher())
}

#[test]
fn test_extract_title_basic() {
    let document = Html::parse_document("<html><head><title>Test Page</title></head></html>");
    assert_eq!(extract_title(&document).as_deref(), Some("Test Page"));
}

#[test]
fn test_extract_title_with_whitespace() {
    let html = "<html><head><title>\n        Test   Page\n    </title></head></html>";
    let document = Html::parse_document(html);
    assert_eq!(extract_title(&document).as_deref(), Some("Test Page"));
}

#[test]
fn test_extract_title_missing_or_empty() {
    let document = Html::parse_document("<html><head></head><body></body></html>");
    assert_eq!(extract_title(&document), None);
    let document = Html::parse_document("<html><head><title>  </title></head></html>");
    assert_eq!(extract_title(&document), None);
}

#[test]
fn test_extract_meta_description_case_insensitive_name() {
    let html = r#"<html><head><meta name="Description" content="  A page  about things "></head></html>"#;
    let document = Html::parse_document(html);
    assert_eq!(
        extract_meta_description(&document).as_deref(),
        Some("A page about things")
    );
}

#[test]
fn test_extract_meta_description_empty_is_none() {
    let html = r#"<html><head><meta name="description" content=""></head></html>"#;
    let document = Html::parse_document(html);
    assert_eq!(extract_meta_description(&document), None);
}

#[test]
fn test_extract_lang() {
    let document = Html::parse_document(r#"<html lang="en-GB"><body></body></html>"#);
    assert_eq!(extract_lang(&document).as_deref(), Some("en-GB"));
    let document = Html::parse_document(r#"<html lang=""><body></body></html>"#);
    assert_eq!(extract_lang(&document), None);
    let document = Html::parse_document("<html><body></body></html>");
    assert_eq!(extract_lang(&document), None);
}

#[test]
fn test_extract_headings_in_order() {
    let html = "<body><h1>Top</h1><h3>Deep</h3><h2> Mid \n level</h2></body>";
    let headings = extract_headings(&Html::parse_document(html));
    let levels: Vec<u8> = headings.iter().map(|h| h.level).collect();
    assert_eq!(levels, vec![1, 3, 2]);
    assert_eq!(headings[2].text, "Mid level");
}

#[test]
fn test_extract_all_reference_kinds() {
    let html = r#"<html><head>
        <link rel="stylesheet" href="/css/site.css">
        <link rel="canonical" href="https://www.example.com/blog/post">
        <link rel="alternate" hreflang="de" href="https://www.example.de/blog/post">
        <script src="/js/app.js"></script>
        <script>inline();</script>
    </head><body>
        <a href="/about">About us</a>
        <img src="photo.jpg" alt="A photo">
    </body></html>"#;
    let refs = extract_str(html, true);

    assert_eq!(refs.anchors.len(), 1);
    assert_eq!(refs.images.len(), 1);
    assert_eq!(refs.scripts.len(), 1);
    assert_eq!(refs.stylesheets.len(), 1);
    assert_eq!(refs.canonicals.len(), 1);
    assert_eq!(refs.hreflangs.len(), 1);
    assert_eq!(refs.len(), 6);

    assert_eq!(
        refs.images[0].resolved_url.as_ref().unwrap().as_str(),
        "https://www.example.com/blog/photo.jpg"
    );
    assert_eq!(
        refs.scripts[0].resolved_url.as_ref().unwrap().as_str(),
        "https://www.example.com/js/app.js"
    );
    assert!(!refs.hreflangs[0].is_internal);
    assert!(refs.canonicals[0].is_internal);
}

#[test]
fn test_positions_follow_extraction_order() {
    let html = r#"<body><a href="/a">A</a><img src="/i.png" alt="i"><a href="/b">B</a></body>"#;
    let refs = extract_str(html, true);
    let positions: Vec<usize> = refs.references().map(|r| r.position).collect();
    assert_eq!(positions, vec![0, 1, 2]);
    assert_eq!(refs.anchors[1].raw_target, "/b");
}

#[test]
fn test_anchor_text_and_unresolvable_targets() {
    let html = r##"<body>
        <a href="#top">Back to top</a>
        <a href="mailto:hi@example.com">Mail</a>
        <a href="">Empty</a>
        <a href="https://other.org/x">  External
            link </a>
    </body>"##;
    let refs = extract_str(html, true);
    assert_eq!(refs.anchors.len(), 4);
    assert!(refs.anchors[0].resolved_url.is_none());
    assert!(refs.anchors[1].resolved_url.is_none());
    assert!(refs.anchors[2].resolved_url.is_none());
    assert_eq!(refs.anchors[3].visible_text.as_deref(), Some("External link"));
    assert!(!refs.anchors[3].is_internal);
}

#[test]
fn test_main_region_excludes_outside_links() {
    let html = r#"<body>
        <div><a href="/sidebar">Sidebar</a></div>
        <main><a href="/content">Content</a></main>
    </body>"#;
    let refs = extract_str(html, true);
    assert_eq!(refs.anchors.len(), 1);
    assert_eq!(refs.anchors[0].raw_target, "/content");
}

#[test]
fn test_article_used_when_no_main() {
    let html = r#"<body>
        <a href="/outside">Outside</a>
        <article><a href="/inside">Inside</a></article>
    </body>"#;
    let refs = extract_str(html, true);
    assert_eq!(refs.anchors.len(), 1);
    assert_eq!(refs.anchors[0].raw_target, "/inside");
}

#[test]
fn test_boilerplate_stripping() {
    let html = r#"<body>
        <header><a href="/home">Home</a></header>
        <nav><a href="/menu">Menu</a></nav>
        <p><a href="/body">Body link</a></p>
        <footer><a href="/legal">Legal</a><img src="/logo.png" alt="logo"></footer>
    </body>"#;
    let stripped = extract_str(html, true);
    assert_eq!(stripped.anchors.len(), 1);
    assert_eq!(stripped.anchors[0].raw_target, "/body");
    assert!(stripped.images.is_empty());

    let kept = extract_str(html, false);
    assert_eq!(kept.anchors.len(), 4);
    assert_eq!(kept.images.len(), 1);
}

#[test]
fn test_image_inside_anchor() {
    let html = r#"<body>
        <a href="/big.jpg"><img src="/thumb.jpg" alt="thumb"></a>
        <img src="/plain.jpg">
    </body>"#;
    let refs = extract_str(html, true);
    assert!(refs.images[0].inside_anchor);
    assert_eq!(refs.images[0].alt_text.as_deref(), Some("thumb"));
    assert!(!refs.images[1].inside_anchor);
    assert_eq!(refs.images[1].alt_text, None);
    // the wrapping anchor takes its name from the image
    assert_eq!(refs.anchors[0].accessible_name.as_deref(), Some("thumb"));
    assert_eq!(refs.anchors[0].visible_text.as_deref(), Some(""));
}

#[test]
fn test_accessible_name_fallbacks() {
    let html = r#"<body>
        <a href="/a" aria-label="Account"></a>
        <a href="/b" title="Basket"> </a>
        <a href="/c"></a>
    </body>"#;
    let refs = extract_str(html, true);
    assert_eq!(refs.anchors[0].accessible_name.as_deref(), Some("Account"));
    assert_eq!(refs.anchors[1].accessible_name.as_deref(), Some("Basket"));
    assert_eq!(refs.anchors[2].accessible_name, None);
}

#[test]
fn test_base_href_is_honored() {
    let html = r#"<html><head><base href="https://static.example.com/assets/"></head>
        <body><img src="logo.png" alt="logo"></body></html>"#;
    let refs = extract_str(html, true);
    assert_eq!(refs.base_url.as_str(), "https://static.example.com/assets/");
    assert_eq!(
        refs.images[0].resolved_url.as_ref().unwrap().as_str(),
        "https://static.example.com/assets/logo.png"
    );
    // registrable domain policy: static.example.com is internal to www.example.com
    assert!(refs.images[0].is_internal);
}

#[test]
fn test_stylesheet_rel_token_matching() {
    let html = r#"<head>
        <link rel="preload stylesheet" href="/a.css">
        <link rel="STYLESHEET" href="/b.css">
        <link rel="icon" href="/favicon.ico">
    </head>"#;
    let refs = extract_str(html, true);
    assert_eq!(refs.stylesheets.len(), 2);
}

#[test]
fn test_missing_head_and_title_is_tolerated() {
    let refs = extract_str("<p>just text", true);
    assert!(refs.is_empty());
    assert_eq!(refs.metadata.title, None);
    assert!(refs.metadata.headings.is_empty());
}

#[test]
fn test_target_key() {
    let refs = extract_str(r##"<body><a href="/x">x</a><a href="#y">y</a></body>"##, true);
    let (kind, url) = refs.anchors[0].target_key().unwrap();
    assert_eq!(kind, ReferenceKind::Anchor);
    assert_eq!(url.as_str(), "https://www.example.com/x");
    assert!(refs.anchors[1].target_key().is_none());
}

#[test]
fn test_reference_kind_display() {
    assert_eq!(ReferenceKind::Anchor.to_string(), "link");
    assert_eq!(ReferenceKind::Image.to_string(), "image");
    assert!(ReferenceKind::Script.is_resource());
    assert!(!ReferenceKind::Canonical.is_resource());
}
