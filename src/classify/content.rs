//! Document-level content checks: title, meta description, headings, images
//! and accessibility.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::config::AuditPolicy;
use crate::parse::{ExtractedRefs, Heading, PageReference};
use crate::report::{push_finding, Category, Finding, Section, SectionFindings, Severity, Subject};

/// Camera defaults, numbered uploads and bare hashes.
static NON_DESCRIPTIVE_STEM: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:(?:img|image|dsc|dscn|dscf|pxl|pic|photo|screenshot|untitled|unnamed|file)[-_ ]?\d*|\d+|[0-9a-f]{16,})$",
    )
    .map_err(|e| log::error!("Failed to compile filename pattern: {}", e))
    .ok()
});

fn page_subject(url: &Url) -> Subject {
    Subject::Page { url: url.clone() }
}

fn element_or_reference(reference: &PageReference, element: &str) -> Subject {
    match &reference.resolved_url {
        Some(url) => Subject::Reference {
            kind: reference.kind,
            url: url.clone(),
        },
        None => Subject::Element {
            description: format!("<{} {}>", element, reference.raw_target),
        },
    }
}

/// Checks presence and length of the `<title>`.
pub fn check_title(page_url: &Url, title: Option<&str>, policy: &AuditPolicy) -> Option<Finding> {
    let Some(title) = title else {
        return Some(Finding::new(
            Category::MissingTitle,
            page_subject(page_url),
            Severity::Fail,
            "The page has no <title>.",
        ));
    };

    let length = title.chars().count();
    if length > *policy.title_length.end() {
        Some(Finding::new(
            Category::TitleTooLong { length },
            page_subject(page_url),
            Severity::Fail,
            format!(
                "Title is {} characters long (at most {} recommended).",
                length,
                policy.title_length.end()
            ),
        ))
    } else if length < *policy.title_length.start() {
        Some(Finding::new(
            Category::TitleTooShort { length },
            page_subject(page_url),
            Severity::Fail,
            format!(
                "Title is {} characters long (at least {} recommended).",
                length,
                policy.title_length.start()
            ),
        ))
    } else {
        None
    }
}

/// Checks presence and length of the meta description.
pub fn check_meta_description(
    page_url: &Url,
    description: Option<&str>,
    policy: &AuditPolicy,
) -> Option<Finding> {
    let Some(description) = description else {
        return Some(Finding::new(
            Category::MissingMetaDescription,
            page_subject(page_url),
            Severity::Fail,
            "The page has no meta description.",
        ));
    };

    let length = description.chars().count();
    let range = &policy.meta_description_length;
    if length > *range.end() {
        Some(Finding::new(
            Category::MetaDescriptionTooLong { length },
            page_subject(page_url),
            Severity::Fail,
            format!(
                "Meta description is {} characters long (at most {} recommended).",
                length,
                range.end()
            ),
        ))
    } else if length < *range.start() {
        Some(Finding::new(
            Category::MetaDescriptionTooShort { length },
            page_subject(page_url),
            Severity::Fail,
            format!(
                "Meta description is {} characters long (at least {} recommended).",
                length,
                range.start()
            ),
        ))
    } else {
        None
    }
}

/// Checks the heading outline: exactly one `<h1>` and no skipped levels.
pub fn check_headings(page_url: &Url, headings: &[Heading]) -> Vec<Finding> {
    let mut findings = Vec::new();

    let h1_count = headings.iter().filter(|h| h.level == 1).count();
    match h1_count {
        0 => findings.push(Finding::new(
            Category::MissingH1,
            page_subject(page_url),
            Severity::Fail,
            "The page has no <h1> heading.",
        )),
        1 => {}
        count => findings.push(Finding::new(
            Category::MultipleH1 { count },
            page_subject(page_url),
            Severity::Warning,
            format!("The page has {} <h1> headings.", count),
        )),
    }

    for pair in headings.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if next.level > prev.level + 1 {
            findings.push(Finding::new(
                Category::SkippedHeadingLevel {
                    from: prev.level,
                    to: next.level,
                },
                Subject::Element {
                    description: format!("<h{}> {}", next.level, next.text),
                },
                Severity::Warning,
                format!(
                    "Heading jumps from <h{}> to <h{}>.",
                    prev.level, next.level
                ),
            ));
        }
    }

    findings
}

/// True when a filename stem says nothing about the image.
pub fn is_non_descriptive_filename(url: &Url) -> bool {
    let Some(name) = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
    else {
        return false;
    };
    let stem = name.rsplit_once('.').map_or(name, |(stem, _)| stem);
    if stem.is_empty() {
        return false;
    }
    NON_DESCRIPTIVE_STEM
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(stem))
}

/// Missing alt text and non-descriptive filenames, once per distinct image.
pub fn check_images(images: &[PageReference]) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for image in images {
        let key = image
            .resolved_url
            .as_ref()
            .map_or_else(|| image.raw_target.clone(), Url::to_string);
        if !seen.insert(key) {
            continue;
        }

        if image.alt_text.as_deref().map_or(true, str::is_empty) {
            findings.push(Finding::new(
                Category::MissingAltText,
                element_or_reference(image, "img"),
                Severity::Warning,
                format!("Image {} has no alt text.", image.raw_target),
            ));
        }

        if let Some(url) = &image.resolved_url {
            if is_non_descriptive_filename(url) {
                findings.push(Finding::new(
                    Category::NonDescriptiveFilename,
                    element_or_reference(image, "img"),
                    Severity::Warning,
                    format!("Image filename of {} is not descriptive.", url),
                ));
            }
        }
    }

    findings
}

/// `<html lang>` presence and anchors without an accessible name.
pub fn check_accessibility(
    page_url: &Url,
    lang: Option<&str>,
    anchors: &[PageReference],
) -> Vec<Finding> {
    let mut findings = Vec::new();

    if lang.is_none() {
        findings.push(Finding::new(
            Category::MissingLangAttribute,
            page_subject(page_url),
            Severity::Warning,
            "The <html> element has no lang attribute.",
        ));
    }

    for anchor in anchors.iter().filter(|a| a.accessible_name.is_none()) {
        findings.push(Finding::new(
            Category::EmptyAnchorText,
            element_or_reference(anchor, "a"),
            Severity::Warning,
            format!("Link to {} has no accessible text.", anchor.raw_target),
        ));
    }

    findings
}

/// Runs every content check and assigns findings to sections.
pub fn classify_content(refs: &ExtractedRefs, policy: &AuditPolicy) -> SectionFindings {
    let mut sections = SectionFindings::new();
    let page_url = &refs.page_url;
    let metadata = &refs.metadata;

    if let Some(finding) = check_title(page_url, metadata.title.as_deref(), policy) {
        push_finding(&mut sections, Section::Title, finding);
    }
    if let Some(finding) =
        check_meta_description(page_url, metadata.meta_description.as_deref(), policy)
    {
        push_finding(&mut sections, Section::Meta, finding);
    }
    for finding in check_headings(page_url, &metadata.headings) {
        push_finding(&mut sections, Section::Headings, finding);
    }
    for finding in check_images(&refs.images) {
        push_finding(&mut sections, Section::Images, finding);
    }
    for finding in check_accessibility(page_url, metadata.lang.as_deref(), &refs.anchors) {
        push_finding(&mut sections, Section::Accessibility, finding);
    }

    sections
}
