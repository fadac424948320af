//! Link auditor.
//!
//! Probes every deduplicated reference target of a page and classifies the
//! outcomes:
//! - Deduplication by `(kind, resolved_url)`, keeping the first occurrence
//! - Internal targets are scheduled before external ones
//! - A run-scoped single-flight cache so a URL shared by several kinds is probed once
//! - A concurrency cap, per-host spacing and an overall deadline
//!
//! Every deduplicated target settles exactly once: probed, failed or skipped.

mod cache;
mod outcome;
mod throttle;

pub use outcome::classify_outcome;

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, info, warn};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::{LinkAuditOptions, ProgressEvent, DEADLINE_SKIP_REASON, EXTERNAL_SKIP_REASON};
use crate::error_handling::{update_probe_stats, ProcessingStats};
use crate::fetch::{FetchOutcome, FetchStatus, Fetcher};
use crate::initialization::init_semaphore;
use crate::parse::{PageReference, ReferenceKind};
use crate::report::{push_finding, Category, Finding, Section, SectionFindings, Severity, Subject};

use cache::OutcomeCache;
use throttle::HostThrottle;

/// One deduplicated reference target and how it settled.
#[derive(Debug, Clone)]
pub struct AuditedTarget {
    pub kind: ReferenceKind,
    pub url: Url,
    pub is_internal: bool,
    /// Extraction position of the first reference to this target
    pub position: usize,
    pub outcome: FetchOutcome,
}

/// Result of one [`audit_links`] run.
pub struct LinkAudit {
    /// Findings in extraction order, followed by one `NoIssue` per clean kind
    pub findings: Vec<Finding>,
    /// Every deduplicated target exactly once, in extraction order
    pub targets: Vec<AuditedTarget>,
    pub stats: ProcessingStats,
}

impl LinkAudit {
    /// Findings grouped by the report section of their reference kind.
    pub fn section_findings(&self) -> SectionFindings {
        route_findings(&self.findings)
    }

    /// Number of targets that were never probed.
    pub fn skipped(&self) -> usize {
        self.targets
            .iter()
            .filter(|t| matches!(t.outcome.status, FetchStatus::Skipped(_)))
            .count()
    }
}

/// Groups link-audit findings by the section of their subject's kind.
pub fn route_findings(findings: &[Finding]) -> SectionFindings {
    let mut sections = SectionFindings::new();
    for finding in findings {
        let section = finding
            .subject
            .kind()
            .map_or(Section::Links, Section::for_kind);
        push_finding(&mut sections, section, finding.clone());
    }
    sections
}

/// Deduplicates references by `(kind, resolved_url)`.
///
/// References without a resolved URL are dropped. The result is in
/// extraction order.
pub fn deduplicate(refs: &[PageReference]) -> Vec<(ReferenceKind, Url, bool, usize)> {
    let mut seen: HashSet<(ReferenceKind, &Url)> = HashSet::new();
    let mut targets: Vec<_> = refs
        .iter()
        .filter_map(|reference| {
            let key = reference.target_key()?;
            seen.insert(key).then(|| {
                (
                    reference.kind,
                    key.1.clone(),
                    reference.is_internal,
                    reference.position,
                )
            })
        })
        .collect();
    targets.sort_by_key(|target| target.3);
    targets
}

fn notify(options: &LinkAuditOptions, completed: usize, total: usize) {
    if let Some(progress) = &options.progress {
        // A dropped receiver only means nobody is watching
        let _ = progress.send(ProgressEvent { completed, total });
    }
}

/// Probes and classifies every reference target on a page.
///
/// Never fails: unreachable targets become findings and targets still
/// outstanding at `options.deadline` are reported as skipped. Findings are
/// sorted into extraction order regardless of probe completion order, so two
/// runs against an unchanged page produce the same findings.
pub async fn audit_links(
    page_url: &Url,
    refs: &[PageReference],
    fetcher: &Fetcher,
    options: &LinkAuditOptions,
) -> LinkAudit {
    let deduplicated = deduplicate(refs);
    let total = deduplicated.len();
    let stats = ProcessingStats::new();
    info!(
        "Auditing {} unique targets ({} references) on {}",
        total,
        refs.len(),
        page_url
    );

    // Internal targets first; the stable sort keeps extraction order within each group
    let mut schedule: Vec<usize> = (0..total).collect();
    schedule.sort_by_key(|&index| !deduplicated[index].2);

    let probed = |index: &usize| deduplicated[*index].2 || options.check_external;
    let throttle = Arc::new(HostThrottle::new(
        schedule
            .iter()
            .filter(|index| probed(index))
            .map(|&index| &deduplicated[index].1),
        options.host_spacing,
        options.host_spacing_threshold,
    ));
    let cache = Arc::new(OutcomeCache::new());
    let semaphore = init_semaphore(options.max_concurrency);
    let token = CancellationToken::new();
    let fetcher = Arc::new(fetcher.clone());

    let mut settled: Vec<Option<FetchOutcome>> = vec![None; total];
    let mut completed = 0;
    let mut tasks = FuturesUnordered::new();

    for index in schedule {
        let (_, url, is_internal, _) = &deduplicated[index];
        if !is_internal && !options.check_external {
            settled[index] = Some(FetchOutcome::skipped(url.clone(), EXTERNAL_SKIP_REASON));
            completed += 1;
            notify(options, completed, total);
            continue;
        }

        let url = url.clone();
        let cache = Arc::clone(&cache);
        let throttle = Arc::clone(&throttle);
        let semaphore = Arc::clone(&semaphore);
        let fetcher = Arc::clone(&fetcher);
        let token = token.clone();
        tasks.push(tokio::spawn(async move {
            let work = async {
                let _permit = semaphore.acquire_owned().await.ok();
                cache
                    .get_or_probe(&url, || async {
                        throttle.wait(&url).await;
                        debug!("Probing {}", url);
                        fetcher.probe(&url).await
                    })
                    .await
            };
            let outcome = tokio::select! {
                biased;
                _ = token.cancelled() => None,
                outcome = work => Some(outcome),
            };
            (index, outcome)
        }));
    }

    let deadline = tokio::time::sleep(options.deadline);
    tokio::pin!(deadline);
    let mut deadline_passed = false;

    loop {
        tokio::select! {
            joined = tasks.next() => {
                let Some(joined) = joined else { break };
                match joined {
                    Ok((index, Some(outcome))) => {
                        update_probe_stats(&stats, &outcome);
                        settled[index] = Some(outcome);
                        completed += 1;
                        notify(options, completed, total);
                    }
                    // Cancelled at the deadline; settled below
                    Ok((_, None)) => {}
                    Err(e) => warn!("Probe task failed: {}", e),
                }
            }
            _ = &mut deadline, if !deadline_passed => {
                deadline_passed = true;
                warn!(
                    "Audit deadline of {:?} exceeded with {} of {} targets outstanding",
                    options.deadline,
                    total - completed,
                    total
                );
                token.cancel();
            }
        }
    }

    let targets: Vec<AuditedTarget> = deduplicated
        .into_iter()
        .zip(settled)
        .map(|((kind, url, is_internal, position), outcome)| {
            let outcome = outcome.unwrap_or_else(|| {
                let reason = if deadline_passed {
                    DEADLINE_SKIP_REASON
                } else {
                    "probe did not complete"
                };
                FetchOutcome::skipped(url.clone(), reason)
            });
            AuditedTarget {
                kind,
                url,
                is_internal,
                position,
                outcome,
            }
        })
        .collect();
    notify(options, total, total);

    debug!(
        "Probed {} unique URLs for {} targets",
        cache.len(),
        targets.len()
    );
    stats.log_summary();

    LinkAudit {
        findings: classify_targets(&targets),
        targets,
        stats,
    }
}

/// Classifies settled targets in order and adds one `NoIssue` per kind
/// that produced no finding.
fn classify_targets(targets: &[AuditedTarget]) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut kinds_with_findings: HashSet<ReferenceKind> = HashSet::new();
    let mut kinds_present: BTreeSet<ReferenceKind> = BTreeSet::new();

    for target in targets {
        kinds_present.insert(target.kind);
        if let Some(finding) = classify_outcome(target.kind, &target.outcome) {
            kinds_with_findings.insert(target.kind);
            findings.push(finding);
        }
    }

    for kind in kinds_present {
        if kinds_with_findings.contains(&kind) {
            continue;
        }
        let count = targets.iter().filter(|t| t.kind == kind).count();
        findings.push(Finding::new(
            Category::NoIssue,
            Subject::Kind { kind },
            Severity::Pass,
            format!("All {} {} targets responded without issues.", count, kind),
        ));
    }

    findings
}
