//! Reference classification and content checks.
//!
//! Pure functions only: nothing here blocks, performs I/O or fails. Each
//! check returns findings (possibly none); [`classify`] runs them all and
//! sorts the results into report sections.

mod content;
mod links;

pub use content::{
    check_accessibility, check_headings, check_images, check_meta_description, check_title,
    classify_content, is_non_descriptive_filename,
};
pub use links::{
    classify_anchor_text, classify_anchor_texts, classify_protocol_downgrade,
    classify_references, classify_resource_as_link, classify_url_length, classify_volume,
};

use crate::config::AuditPolicy;
use crate::parse::ExtractedRefs;
use crate::report::SectionFindings;

/// Runs every no-I/O check over an extracted page.
pub fn classify(refs: &ExtractedRefs, policy: &AuditPolicy) -> SectionFindings {
    let mut sections = classify_content(refs, policy);
    for (section, findings) in classify_references(refs, policy) {
        sections.entry(section).or_default().extend(findings);
    }
    sections
}
