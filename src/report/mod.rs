//! Findings and the aggregated audit report.
//!
//! Every check in the crate produces [`Finding`] values. The aggregator
//! groups them into the fixed section order and guarantees every section has
//! at least one entry, so "checked, clean" is never confused with "not
//! checked".

mod types;

use std::collections::BTreeMap;

use chrono::Utc;
use strum::IntoEnumIterator;
use url::Url;

pub use types::{AuditReport, Category, Finding, Section, SectionReport, Severity, Subject};

/// Findings grouped by section. `BTreeMap` keeps the sections in pipeline order.
pub type SectionFindings = BTreeMap<Section, Vec<Finding>>;

/// Appends `finding` to its section's list.
pub fn push_finding(sections: &mut SectionFindings, section: Section, finding: Finding) {
    sections.entry(section).or_default().push(finding);
}

/// Merges per-section findings into a report.
///
/// Sections appear in [`Section`] order. Findings within a section keep their
/// insertion order and are not deduplicated, even across sections. A section
/// with no findings receives a single `NoIssue` / `Pass` entry.
pub fn aggregate(page_url: &Url, final_url: &Url, mut sections: SectionFindings) -> AuditReport {
    let sections = Section::iter()
        .map(|section| {
            let mut findings = sections.remove(&section).unwrap_or_default();
            if findings.is_empty() {
                findings.push(Finding::new(
                    Category::NoIssue,
                    Subject::Page {
                        url: final_url.clone(),
                    },
                    Severity::Pass,
                    "No issues found.",
                ));
            }
            SectionReport { section, findings }
        })
        .collect();

    AuditReport {
        page_url: page_url.clone(),
        final_url: final_url.clone(),
        sections,
        generated_at: Utc::now(),
    }
}
