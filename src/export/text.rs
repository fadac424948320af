//! Plain-text report rendering.

use std::fmt::Write as _;

use colored::Colorize;

use crate::report::{AuditReport, Finding, SectionReport, Severity};

fn marker(severity: Severity, color: bool) -> String {
    let text = format!("[{}]", severity);
    if !color {
        return text;
    }
    match severity {
        Severity::Fail => text.red().bold().to_string(),
        Severity::Warning => text.yellow().bold().to_string(),
        Severity::Pass => text.green().to_string(),
        Severity::Informational => text.cyan().to_string(),
    }
}

fn render_finding(out: &mut String, finding: &Finding, color: bool) {
    let _ = writeln!(
        out,
        "  {} {}: {}",
        marker(finding.severity, color),
        finding.category,
        finding.detail
    );
    if let Some(recommendation) = &finding.recommendation {
        let _ = writeln!(out, "       Fix: {}", recommendation);
    }
}

fn render_section(out: &mut String, section: &SectionReport, color: bool) {
    let heading = format!("{} {}", section.section, marker(section.status(), color));
    let _ = writeln!(
        out,
        "{}",
        if color {
            heading.bold().to_string()
        } else {
            heading
        }
    );
    for finding in &section.findings {
        render_finding(out, finding, color);
    }
    out.push('\n');
}

/// Renders the report as sectioned text with severity markers.
///
/// `color` adds ANSI styling to markers and headings.
pub fn render_text(report: &AuditReport, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "SEO audit of {}", report.page_url);
    if report.final_url != report.page_url {
        let _ = writeln!(out, "Served from {}", report.final_url);
    }
    let _ = writeln!(
        out,
        "Generated {}\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    for section in &report.sections {
        render_section(&mut out, section, color);
    }

    let _ = writeln!(
        out,
        "Summary: {} failed, {} warnings, {} passed, {} notes",
        report.count(Severity::Fail),
        report.count(Severity::Warning),
        report.count(Severity::Pass),
        report.count(Severity::Informational)
    );
    out
}
