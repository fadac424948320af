// Classify module tests.

use super::*;
use crate::config::InternalPolicy;
use crate::parse::{extract, Heading, PageReference, ReferenceKind};
use crate::report::{Category, Section, Severity, Subject};
use crate::resolve::DomainMatcher;
use std::sync::Arc;
use tldextract::{TldExtractor, TldOption};
use url::Url;

fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

fn anchor(text: &str, href: &str, position: usize) -> PageReference {
    PageReference {
        kind: ReferenceKind::Anchor,
        raw_target: href.to_string(),
        resolved_url: Url::parse(href).ok(),
        visible_text: Some(text.to_string()),
        is_internal: true,
        alt_text: None,
        accessible_name: (!text.is_empty()).then(|| text.to_string()),
        inside_anchor: false,
        position,
    }
}

fn image(src: &str, alt: Option<&str>, inside_anchor: bool) -> PageReference {
    PageReference {
        kind: ReferenceKind::Image,
        raw_target: src.to_string(),
        resolved_url: Url::parse(src).ok(),
        visible_text: None,
        is_internal: true,
        alt_text: alt.map(str::to_string),
        accessible_name: None,
        inside_anchor,
        position: 0,
    }
}

fn extract_page(html: &str) -> ExtractedRefs {
    let page = url("https://site.com/");
    let matcher = DomainMatcher::new(
        &page,
        InternalPolicy::RegistrableDomain,
        Arc::new(TldExtractor::new(TldOption::default())),
    );
    extract(html.as_bytes(), &page, true, &matcher)
}

/// Builds a URL of exactly `len` characters.
fn url_of_length(len: usize) -> Url {
    let prefix = "https://ex.com/";
    let u = url(&format!("{}{}", prefix, "a".repeat(len - prefix.len())));
    assert_eq!(u.as_str().len(), len);
    u
}

#[test]
fn test_url_length_boundary() {
    let policy = AuditPolicy::default();
    let limit = policy.long_url_threshold;
    assert!(classify_url_length(&url_of_length(limit), ReferenceKind::Anchor, &policy).is_none());
    let finding =
        classify_url_length(&url_of_length(limit + 1), ReferenceKind::Anchor, &policy).unwrap();
    assert_eq!(finding.category, Category::LongUrl);
}

#[test]
fn test_url_length_follows_policy() {
    for threshold in [40, 80, 120] {
        let policy = AuditPolicy {
            long_url_threshold: threshold,
            ..AuditPolicy::default()
        };
        assert!(
            classify_url_length(&url_of_length(threshold), ReferenceKind::Anchor, &policy)
                .is_none()
        );
        assert!(
            classify_url_length(&url_of_length(threshold + 1), ReferenceKind::Anchor, &policy)
                .is_some()
        );
    }
}

#[test]
fn test_generic_anchor_text_case_insensitive() {
    let policy = AuditPolicy::default();
    let finding = classify_anchor_text("Click Here", 1, &policy).unwrap();
    assert_eq!(finding.category, Category::GenericAnchorText);
    assert_eq!(
        finding.subject,
        Subject::AnchorText {
            text: "Click Here".to_string()
        }
    );

    assert!(classify_anchor_text("  READ   more ", 1, &policy).is_some());
    assert!(classify_anchor_text("Pricing for teams", 1, &policy).is_none());
    assert!(classify_anchor_text("", 1, &policy).is_none());
}

#[test]
fn test_overoptimized_anchor_text_boundary() {
    for threshold in [2, 5, 9] {
        let policy = AuditPolicy {
            anchor_repeat_threshold: threshold,
            ..AuditPolicy::default()
        };
        assert!(classify_anchor_text("Buy shoes online", threshold, &policy).is_none());
        let finding = classify_anchor_text("Buy shoes online", threshold + 1, &policy).unwrap();
        assert_eq!(
            finding.category,
            Category::OveroptimizedAnchorText {
                occurrences: threshold + 1
            }
        );
    }
}

#[test]
fn test_classify_anchor_texts_counts_across_page() {
    let policy = AuditPolicy {
        anchor_repeat_threshold: 2,
        ..AuditPolicy::default()
    };
    let anchors: Vec<PageReference> = (0..3)
        .map(|i| anchor("Cheap Flights", &format!("https://site.com/{i}"), i))
        .chain(std::iter::once(anchor("cheap flights", "https://site.com/x", 3)))
        .chain(std::iter::once(anchor("About", "https://site.com/about", 4)))
        .collect();

    let findings = classify_anchor_texts(&anchors, &policy);
    assert_eq!(findings.len(), 1);
    assert_eq!(
        findings[0].category,
        Category::OveroptimizedAnchorText { occurrences: 4 }
    );
}

#[test]
fn test_mixed_content() {
    let target = url("http://site.com/x");
    let finding = classify_protocol_downgrade(true, &target, ReferenceKind::Anchor).unwrap();
    assert_eq!(finding.category, Category::MixedContent);
    assert_eq!(finding.severity, Severity::Warning);

    assert!(classify_protocol_downgrade(true, &url("https://site.com/x"), ReferenceKind::Anchor)
        .is_none());
    assert!(classify_protocol_downgrade(false, &target, ReferenceKind::Anchor).is_none());

    let script = classify_protocol_downgrade(true, &target, ReferenceKind::Script).unwrap();
    assert_eq!(script.severity, Severity::Fail);
}

#[test]
fn test_volume_boundary() {
    let page = url("https://site.com/");
    for max_links in [3, 100] {
        let policy = AuditPolicy {
            max_links,
            ..AuditPolicy::default()
        };
        assert!(classify_volume(&page, max_links, &policy).is_none());
        let finding = classify_volume(&page, max_links + 1, &policy).unwrap();
        assert_eq!(
            finding.category,
            Category::TooManyLinks {
                count: max_links + 1
            }
        );
    }
}

#[test]
fn test_resource_as_link() {
    let linked = image("https://site.com/a.png", Some("a"), true);
    let plain = image("https://site.com/b.png", Some("b"), false);
    assert_eq!(
        classify_resource_as_link(&linked).unwrap().category,
        Category::ResourceFormattedAsLink
    );
    assert!(classify_resource_as_link(&plain).is_none());
}

#[test]
fn test_classifiers_are_order_independent() {
    let html = r#"<html lang="en"><body>
        <a href="http://site.com/a">click here</a>
        <a href="https://other.com/b">Partner site</a>
        <a href="http://site.com/a">click here</a>
        <a href="/c"><img src="/IMG_1234.jpg"></a>
    </body></html>"#;
    let refs = extract_page(html);
    let policy = AuditPolicy::default();

    let forward = classify(&refs, &policy);

    let mut reversed = refs.clone();
    reversed.anchors.reverse();
    reversed.images.reverse();
    let backward = classify(&reversed, &policy);

    for (section, findings) in &forward {
        let mut a: Vec<String> = findings.iter().map(|f| format!("{:?}", f)).collect();
        let mut b: Vec<String> = backward[section].iter().map(|f| format!("{:?}", f)).collect();
        a.sort();
        b.sort();
        assert_eq!(a, b, "section {section} differs");
    }
    assert_eq!(forward.len(), backward.len());
}

#[test]
fn test_classify_references_dedups_and_sections() {
    let html = r#"<body>
        <a href="http://site.com/a">Docs</a>
        <a href="http://site.com/a">Docs again</a>
        <script src="http://cdn.site.com/app.js"></script>
    </body>"#;
    let refs = extract_page(html);
    let sections = classify_references(&refs, &AuditPolicy::default());

    let links = &sections[&Section::Links];
    assert_eq!(
        links
            .iter()
            .filter(|f| f.category == Category::MixedContent)
            .count(),
        1
    );
    let crawl = &sections[&Section::Crawlability];
    assert_eq!(crawl.len(), 1);
    assert_eq!(crawl[0].subject.kind(), Some(ReferenceKind::Script));
}

#[test]
fn test_title_checks() {
    let page = url("https://site.com/");
    let policy = AuditPolicy::default();
    assert_eq!(
        check_title(&page, None, &policy).unwrap().category,
        Category::MissingTitle
    );
    let max = *policy.title_length.end();
    let min = *policy.title_length.start();
    assert!(check_title(&page, Some(&"t".repeat(max)), &policy).is_none());
    assert!(check_title(&page, Some(&"t".repeat(min)), &policy).is_none());
    assert_eq!(
        check_title(&page, Some(&"t".repeat(max + 1)), &policy)
            .unwrap()
            .category,
        Category::TitleTooLong { length: max + 1 }
    );
    assert_eq!(
        check_title(&page, Some(&"t".repeat(min - 1)), &policy)
            .unwrap()
            .category,
        Category::TitleTooShort { length: min - 1 }
    );
}

#[test]
fn test_meta_description_checks() {
    let page = url("https://site.com/");
    let policy = AuditPolicy {
        meta_description_length: 5..=10,
        ..AuditPolicy::default()
    };
    assert_eq!(
        check_meta_description(&page, None, &policy)
            .unwrap()
            .category,
        Category::MissingMetaDescription
    );
    assert!(check_meta_description(&page, Some("seven c"), &policy).is_none());
    assert!(matches!(
        check_meta_description(&page, Some("this is too long"), &policy)
            .unwrap()
            .category,
        Category::MetaDescriptionTooLong { .. }
    ));
    assert!(matches!(
        check_meta_description(&page, Some("abc"), &policy)
            .unwrap()
            .category,
        Category::MetaDescriptionTooShort { length: 3 }
    ));
}

#[test]
fn test_heading_checks() {
    let page = url("https://site.com/");
    let h = |level: u8| Heading {
        level,
        text: format!("Heading {level}"),
    };

    let findings = check_headings(&page, &[h(2), h(3)]);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].category, Category::MissingH1);

    let findings = check_headings(&page, &[h(1), h(2), h(1)]);
    assert_eq!(findings[0].category, Category::MultipleH1 { count: 2 });

    let findings = check_headings(&page, &[h(1), h(2), h(4), h(2), h(3)]);
    assert_eq!(findings.len(), 1);
    assert_eq!(
        findings[0].category,
        Category::SkippedHeadingLevel { from: 2, to: 4 }
    );

    assert!(check_headings(&page, &[h(1), h(2), h(3), h(2)]).is_empty());
}

#[test]
fn test_non_descriptive_filenames() {
    for bad in [
        "https://s.com/IMG_1234.jpg",
        "https://s.com/DSC0001.JPG",
        "https://s.com/uploads/image1.png",
        "https://s.com/12345.webp",
        "https://s.com/screenshot-3.png",
        "https://s.com/3f2a9c8e1b7d4a6f9e0c.jpg",
    ] {
        assert!(is_non_descriptive_filename(&url(bad)), "{bad}");
    }
    for good in [
        "https://s.com/red-running-shoes.jpg",
        "https://s.com/team/alice-portrait.png",
        "https://s.com/images/",
        "https://s.com/logo.svg",
    ] {
        assert!(!is_non_descriptive_filename(&url(good)), "{good}");
    }
}

#[test]
fn test_image_checks_once_per_distinct_image() {
    let images = vec![
        image("https://site.com/IMG_1.jpg", None, false),
        image("https://site.com/IMG_1.jpg", None, false),
        image("https://site.com/team.jpg", Some(""), false),
        image("https://site.com/logo.png", Some("Company logo"), false),
    ];
    let findings = check_images(&images);
    let missing_alt = findings
        .iter()
        .filter(|f| f.category == Category::MissingAltText)
        .count();
    let bad_names = findings
        .iter()
        .filter(|f| f.category == Category::NonDescriptiveFilename)
        .count();
    assert_eq!(missing_alt, 2);
    assert_eq!(bad_names, 1);
}

#[test]
fn test_accessibility_checks() {
    let page = url("https://site.com/");
    let anchors = vec![
        anchor("", "https://site.com/icon", 0),
        anchor("Contact", "https://site.com/contact", 1),
    ];
    let findings = check_accessibility(&page, None, &anchors);
    assert_eq!(findings.len(), 2);
    assert_eq!(findings[0].category, Category::MissingLangAttribute);
    assert_eq!(findings[1].category, Category::EmptyAnchorText);

    assert_eq!(check_accessibility(&page, Some("en"), &anchors[1..]).len(), 0);
}

#[test]
fn test_findings_carry_recommendations() {
    let page = url("https://site.com/");
    let finding = check_title(&page, None, &AuditPolicy::default()).unwrap();
    assert!(finding.recommendation.is_some());
}
