//! Report export for the CLI.
//!
//! Two formats are supported:
//! - JSON: the serde serialization of [`AuditReport`]
//! - Text: sections in order with severity markers

mod text;
mod writer;

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

pub use text::render_text;

use crate::config::OutputFormat;
use crate::report::AuditReport;

/// Serializes the report as pretty-printed JSON.
pub fn render_json(report: &AuditReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize report")
}

/// Renders `report` in `format` and writes it to `output` (stdout when `None`).
///
/// Color is only used for text written to stdout.
pub fn write_report(report: &AuditReport, format: OutputFormat, output: Option<&Path>) -> Result<()> {
    let rendered = match format {
        OutputFormat::Json => render_json(report)?,
        OutputFormat::Text => render_text(report, output.is_none()),
    };

    let mut writer = writer::open_output(output)?;
    writer
        .write_all(rendered.as_bytes())
        .context("Failed to write report")?;
    if !rendered.ends_with('\n') {
        writer.write_all(b"\n").context("Failed to write report")?;
    }
    writer.flush().context("Failed to flush report")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{aggregate, push_finding, Category, Finding, Section, SectionFindings, Severity, Subject};
    use url::Url;

    fn sample_report() -> AuditReport {
        let page = Url::parse("https://ex.com/").unwrap();
        let mut sections = SectionFindings::new();
        push_finding(
            &mut sections,
            Section::Links,
            Finding::new(
                Category::BrokenLink,
                Subject::Reference {
                    kind: crate::parse::ReferenceKind::Anchor,
                    url: Url::parse("https://ex.com/gone").unwrap(),
                },
                Severity::Fail,
                "The link https://ex.com/gone returned HTTP 404.",
            ),
        );
        aggregate(&page, &page, sections)
    }

    #[test]
    fn test_render_json_shape() {
        let json = render_json(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let sections = value["sections"].as_array().unwrap();
        assert_eq!(sections.len(), 9);
        assert_eq!(sections[0]["section"], "title");
        let links = sections
            .iter()
            .find(|s| s["section"] == "links")
            .unwrap();
        assert_eq!(links["findings"][0]["category"]["type"], "broken_link");
        assert_eq!(links["findings"][0]["severity"], "fail");
        assert_eq!(links["findings"][0]["subject"]["kind"], "anchor");
    }

    #[test]
    fn test_render_text_lists_sections_in_order() {
        let text = render_text(&sample_report(), false);
        let title = text.find("Title [PASS]").unwrap();
        let links = text.find("Links [FAIL]").unwrap();
        let accessibility = text.find("Accessibility [PASS]").unwrap();
        assert!(title < links && links < accessibility);
        assert!(text.contains("[FAIL] Broken link: The link https://ex.com/gone returned HTTP 404."));
        assert!(text.contains("Summary: 1 failed"));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn test_write_report_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_report(&sample_report(), OutputFormat::Json, Some(&path)).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["page_url"], "https://ex.com/");
    }
}
