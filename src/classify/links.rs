//! Policy checks over extracted references.
//!
//! Every function here is total and order-independent: no I/O, no shared
//! state, and evaluating them in any order yields the same set of findings.

use std::collections::{HashMap, HashSet};

use url::Url;

use crate::config::AuditPolicy;
use crate::parse::{ExtractedRefs, PageReference, ReferenceKind};
use crate::report::{push_finding, Category, Finding, Section, SectionFindings, Severity, Subject};
use crate::utils::collapse_whitespace;

fn reference_subject(reference: &PageReference) -> Subject {
    match &reference.resolved_url {
        Some(url) => Subject::Reference {
            kind: reference.kind,
            url: url.clone(),
        },
        None => Subject::Element {
            description: format!("{} \"{}\"", reference.kind, reference.raw_target),
        },
    }
}

/// Flags generic or over-used anchor text.
///
/// `occurrences` is how often this text appears across the page. A generic
/// phrase (case-insensitive, whitespace-collapsed) yields `GenericAnchorText`;
/// otherwise more than `policy.anchor_repeat_threshold` occurrences yields
/// `OveroptimizedAnchorText`.
pub fn classify_anchor_text(text: &str, occurrences: usize, policy: &AuditPolicy) -> Option<Finding> {
    let normalized = collapse_whitespace(text).to_lowercase();
    if normalized.is_empty() {
        return None;
    }

    let is_generic = policy
        .generic_anchor_phrases
        .iter()
        .any(|phrase| collapse_whitespace(phrase).to_lowercase() == normalized);
    let subject = Subject::AnchorText {
        text: collapse_whitespace(text),
    };

    if is_generic {
        return Some(Finding::new(
            Category::GenericAnchorText,
            subject,
            Severity::Warning,
            format!(
                "Anchor text \"{}\" does not describe its destination.",
                collapse_whitespace(text)
            ),
        ));
    }

    if occurrences > policy.anchor_repeat_threshold {
        return Some(Finding::new(
            Category::OveroptimizedAnchorText { occurrences },
            subject,
            Severity::Warning,
            format!(
                "Anchor text \"{}\" is used {} times (more than {}).",
                collapse_whitespace(text),
                occurrences,
                policy.anchor_repeat_threshold
            ),
        ));
    }

    None
}

/// Runs [`classify_anchor_text`] once per distinct anchor text, in first-seen order.
pub fn classify_anchor_texts(anchors: &[PageReference], policy: &AuditPolicy) -> Vec<Finding> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut first_seen: Vec<(String, &str)> = Vec::new();

    for text in anchors.iter().filter_map(|a| a.visible_text.as_deref()) {
        let key = text.to_lowercase();
        if key.is_empty() {
            continue;
        }
        let count = counts.entry(key.clone()).or_insert(0);
        if *count == 0 {
            first_seen.push((key, text));
        }
        *count += 1;
    }

    first_seen
        .into_iter()
        .filter_map(|(key, text)| {
            let occurrences = counts.get(&key).copied().unwrap_or(0);
            classify_anchor_text(text, occurrences, policy)
        })
        .collect()
}

/// Flags URLs longer than `policy.long_url_threshold` characters.
pub fn classify_url_length(url: &Url, kind: ReferenceKind, policy: &AuditPolicy) -> Option<Finding> {
    let length = url.as_str().chars().count();
    (length > policy.long_url_threshold).then(|| {
        Finding::new(
            Category::LongUrl,
            Subject::Reference {
                kind,
                url: url.clone(),
            },
            Severity::Warning,
            format!(
                "URL is {} characters long (limit {}).",
                length, policy.long_url_threshold
            ),
        )
    })
}

/// Flags an `http://` target referenced from a page served over HTTPS.
///
/// Browsers block insecure scripts, stylesheets and images outright, so those
/// fail; insecure links and link elements are warnings.
pub fn classify_protocol_downgrade(
    page_is_https: bool,
    target: &Url,
    kind: ReferenceKind,
) -> Option<Finding> {
    if !page_is_https || target.scheme() != "http" {
        return None;
    }
    let severity = if kind.is_resource() {
        Severity::Fail
    } else {
        Severity::Warning
    };
    Some(Finding::new(
        Category::MixedContent,
        Subject::Reference {
            kind,
            url: target.clone(),
        },
        severity,
        format!("HTTPS page references insecure {} {}.", kind, target),
    ))
}

/// Flags a page carrying more than `policy.max_links` links. Page-level, at most once.
pub fn classify_volume(page_url: &Url, total: usize, policy: &AuditPolicy) -> Option<Finding> {
    (total > policy.max_links).then(|| {
        Finding::new(
            Category::TooManyLinks { count: total },
            Subject::Page {
                url: page_url.clone(),
            },
            Severity::Warning,
            format!(
                "Page has {} links (more than {}).",
                total, policy.max_links
            ),
        )
    })
}

/// Flags an `<img>` nested in an `<a>`.
pub fn classify_resource_as_link(reference: &PageReference) -> Option<Finding> {
    if reference.kind != ReferenceKind::Image || !reference.inside_anchor {
        return None;
    }
    Some(Finding::new(
        Category::ResourceFormattedAsLink,
        reference_subject(reference),
        Severity::Warning,
        format!("Image {} is used as a link.", reference.raw_target),
    ))
}

/// Applies every reference policy check and assigns findings to sections.
///
/// Per-target checks run once per `(kind, resolved_url)`.
pub fn classify_references(refs: &ExtractedRefs, policy: &AuditPolicy) -> SectionFindings {
    let mut sections = SectionFindings::new();
    let page_is_https = refs.page_url.scheme() == "https";
    let mut seen: HashSet<(ReferenceKind, &Url)> = HashSet::new();

    for reference in refs.references() {
        let Some(key) = reference.target_key() else {
            continue;
        };
        if !seen.insert(key) {
            continue;
        }
        let (kind, url) = key;
        let section = Section::for_kind(kind);

        if kind == ReferenceKind::Anchor {
            if let Some(finding) = classify_url_length(url, kind, policy) {
                push_finding(&mut sections, section, finding);
            }
        }
        if let Some(finding) = classify_protocol_downgrade(page_is_https, url, kind) {
            push_finding(&mut sections, section, finding);
        }
        if let Some(finding) = classify_resource_as_link(reference) {
            push_finding(&mut sections, section, finding);
        }
    }

    if let Some(finding) = classify_volume(&refs.page_url, refs.anchors.len(), policy) {
        push_finding(&mut sections, Section::Links, finding);
    }

    for finding in classify_anchor_texts(&refs.anchors, policy) {
        push_finding(&mut sections, Section::AnchorText, finding);
    }

    sections
}
