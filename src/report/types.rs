//! Report data types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum_macros::{Display, EnumIter};
use url::Url;

use crate::parse::ReferenceKind;

/// Report sections in presentation order.
///
/// The derived `Ord` follows declaration order, which is the pipeline's
/// execution order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    #[strum(serialize = "Title")]
    Title,
    #[strum(serialize = "Meta Description")]
    Meta,
    #[strum(serialize = "Headings")]
    Headings,
    #[strum(serialize = "Images")]
    Images,
    #[strum(serialize = "Links")]
    Links,
    #[strum(serialize = "Anchor Text")]
    AnchorText,
    #[strum(serialize = "Page Speed")]
    PageSpeed,
    #[strum(serialize = "Crawlability")]
    Crawlability,
    #[strum(serialize = "Accessibility")]
    Accessibility,
}

impl Section {
    /// Section that receives probe results and per-reference checks for `kind`.
    pub fn for_kind(kind: ReferenceKind) -> Self {
        match kind {
            ReferenceKind::Anchor => Section::Links,
            ReferenceKind::Image => Section::Images,
            ReferenceKind::Stylesheet
            | ReferenceKind::Script
            | ReferenceKind::Canonical
            | ReferenceKind::Hreflang => Section::Crawlability,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[strum(serialize = "FAIL")]
    Fail,
    #[strum(serialize = "WARN")]
    Warning,
    #[strum(serialize = "PASS")]
    Pass,
    #[strum(serialize = "INFO")]
    Informational,
}

/// What a finding is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Subject {
    /// The audited page as a whole
    Page { url: Url },
    /// One deduplicated reference target
    Reference { kind: ReferenceKind, url: Url },
    /// Every audited target of one kind
    Kind { kind: ReferenceKind },
    /// An anchor text, independent of where it points
    AnchorText { text: String },
    /// A page element or provider value without its own URL
    Element { description: String },
}

impl Subject {
    pub fn url(&self) -> Option<&Url> {
        match self {
            Subject::Page { url } | Subject::Reference { url, .. } => Some(url),
            _ => None,
        }
    }

    pub fn kind(&self) -> Option<ReferenceKind> {
        match self {
            Subject::Reference { kind, .. } | Subject::Kind { kind } => Some(*kind),
            _ => None,
        }
    }

    /// Short label for rendering.
    pub fn label(&self) -> String {
        match self {
            Subject::Page { url } => url.to_string(),
            Subject::Reference { url, .. } => url.to_string(),
            Subject::Kind { kind } => format!("all {kind} targets"),
            Subject::AnchorText { text } => format!("\"{text}\""),
            Subject::Element { description } => description.clone(),
        }
    }
}

/// Finding categories. Counts that matter to consumers are carried in the variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Category {
    BrokenLink,
    LongUrl,
    /// HTTPS page referencing an `http://` target
    MixedContent,
    ForbiddenResource,
    GenericAnchorText,
    OveroptimizedAnchorText { occurrences: usize },
    TooManyLinks { count: usize },
    ResourceFormattedAsLink,
    /// Broken image, script or stylesheet
    BrokenResource,
    RedirectChain { hops: usize },
    RedirectLoop,
    PermanentRedirect,
    TemporaryRedirect,
    NoIssue,
    /// The target was not probed (deadline, external links disabled)
    Skipped,
    MissingTitle,
    TitleTooLong { length: usize },
    TitleTooShort { length: usize },
    MissingMetaDescription,
    MetaDescriptionTooLong { length: usize },
    MetaDescriptionTooShort { length: usize },
    MissingH1,
    MultipleH1 { count: usize },
    SkippedHeadingLevel { from: u8, to: u8 },
    MissingAltText,
    NonDescriptiveFilename,
    MissingLangAttribute,
    EmptyAnchorText,
    PageSpeedMetric { name: String, value: String },
    ProviderUnavailable,
    NotChecked,
    Advice,
}

impl Category {
    /// Stable human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Category::BrokenLink => "Broken link",
            Category::LongUrl => "Long URL",
            Category::MixedContent => "Mixed content (HTTPS to HTTP)",
            Category::ForbiddenResource => "Forbidden resource",
            Category::GenericAnchorText => "Generic anchor text",
            Category::OveroptimizedAnchorText { .. } => "Over-optimized anchor text",
            Category::TooManyLinks { .. } => "Too many links",
            Category::ResourceFormattedAsLink => "Image formatted as link",
            Category::BrokenResource => "Broken resource",
            Category::RedirectChain { .. } => "Redirect chain",
            Category::RedirectLoop => "Redirect loop",
            Category::PermanentRedirect => "Permanent redirect",
            Category::TemporaryRedirect => "Temporary redirect",
            Category::NoIssue => "No issues",
            Category::Skipped => "Skipped",
            Category::MissingTitle => "Missing title",
            Category::TitleTooLong { .. } => "Title too long",
            Category::TitleTooShort { .. } => "Title too short",
            Category::MissingMetaDescription => "Missing meta description",
            Category::MetaDescriptionTooLong { .. } => "Meta description too long",
            Category::MetaDescriptionTooShort { .. } => "Meta description too short",
            Category::MissingH1 => "Missing H1",
            Category::MultipleH1 { .. } => "Multiple H1 headings",
            Category::SkippedHeadingLevel { .. } => "Skipped heading level",
            Category::MissingAltText => "Missing alt text",
            Category::NonDescriptiveFilename => "Non-descriptive image filename",
            Category::MissingLangAttribute => "Missing lang attribute",
            Category::EmptyAnchorText => "Link without accessible text",
            Category::PageSpeedMetric { .. } => "Page speed metric",
            Category::ProviderUnavailable => "Provider unavailable",
            Category::NotChecked => "Not checked",
            Category::Advice => "Advice",
        }
    }

    /// How to fix it, for categories that describe a problem.
    pub fn recommendation(&self) -> Option<&'static str> {
        let text = match self {
            Category::BrokenLink => "Fix or remove the link so it points to a live page.",
            Category::BrokenResource => "Restore the file or update the reference to its new location.",
            Category::LongUrl => "Use a shorter, descriptive URL.",
            Category::MixedContent => "Reference the HTTPS version of the target.",
            Category::ForbiddenResource => "Check that the target is publicly accessible.",
            Category::GenericAnchorText => "Describe the destination in the link text.",
            Category::OveroptimizedAnchorText { .. } => "Vary the anchor text across links.",
            Category::TooManyLinks { .. } => "Keep only the links that help readers.",
            Category::ResourceFormattedAsLink => "Give the linked image descriptive alt text or link with text instead.",
            Category::RedirectChain { .. } => "Link directly to the final destination.",
            Category::RedirectLoop => "Break the loop in the server's redirect rules.",
            Category::PermanentRedirect => "Update the link to the redirect target.",
            Category::TemporaryRedirect => "Use a 301 if the move is permanent, or link to the target directly.",
            Category::MissingTitle => "Add a unique <title> that describes the page.",
            Category::TitleTooLong { .. } => "Shorten the title so it is not truncated in search results.",
            Category::TitleTooShort { .. } => "Expand the title with the page's main topic.",
            Category::MissingMetaDescription => "Add a <meta name=\"description\"> summarizing the page.",
            Category::MetaDescriptionTooLong { .. } => "Shorten the description so it is not truncated.",
            Category::MetaDescriptionTooShort { .. } => "Expand the description to summarize the page.",
            Category::MissingH1 => "Add one <h1> stating the page's topic.",
            Category::MultipleH1 { .. } => "Keep a single <h1> and demote the others.",
            Category::SkippedHeadingLevel { .. } => "Use heading levels in sequence.",
            Category::MissingAltText => "Add alt text describing the image.",
            Category::NonDescriptiveFilename => "Rename the file to describe the image.",
            Category::MissingLangAttribute => "Declare the page language on <html lang>.",
            Category::EmptyAnchorText => "Add link text, an aria-label or alt text on the linked image.",
            _ => return None,
        };
        Some(text)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One reportable issue or informational note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub category: Category,
    pub subject: Subject,
    pub severity: Severity,
    /// Deterministic explanation built from the category and subject
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

impl Finding {
    pub fn new(
        category: Category,
        subject: Subject,
        severity: Severity,
        detail: impl Into<String>,
    ) -> Self {
        let recommendation = category.recommendation().map(str::to_string);
        Self {
            category,
            subject,
            severity,
            detail: detail.into(),
            recommendation,
        }
    }

    pub fn is_issue(&self) -> bool {
        matches!(self.severity, Severity::Fail | Severity::Warning)
    }
}

/// The findings of one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionReport {
    pub section: Section,
    pub findings: Vec<Finding>,
}

impl SectionReport {
    /// Overall status: the worst severity present, where Informational only
    /// counts when nothing else is.
    pub fn status(&self) -> Severity {
        let has = |severity: Severity| self.findings.iter().any(|f| f.severity == severity);
        if has(Severity::Fail) {
            Severity::Fail
        } else if has(Severity::Warning) {
            Severity::Warning
        } else if has(Severity::Pass) {
            Severity::Pass
        } else {
            Severity::Informational
        }
    }
}

/// The aggregate output for one audited URL. Immutable once returned.
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    /// The input URL (after normalization)
    pub page_url: Url,
    /// The URL the page was served from after redirects
    pub final_url: Url,
    pub sections: Vec<SectionReport>,
    pub generated_at: DateTime<Utc>,
}

impl AuditReport {
    pub fn section(&self, section: Section) -> Option<&SectionReport> {
        self.sections.iter().find(|s| s.section == section)
    }

    /// All findings in section order.
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.sections.iter().flat_map(|s| s.findings.iter())
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.findings().filter(|f| f.severity == severity).count()
    }

    pub fn has_failures(&self) -> bool {
        self.count(Severity::Fail) > 0
    }
}
