//! Report assembly
//!
//! Runs the post-crawl passes in order (graph builder, link classifier,
//! metrics aggregator, score calculator) and composes the final report.

use crate::crawler::{CrawlOutput, StopReason};
use crate::graph::{build_link_graph, classify_links, LinkEdge};
use crate::output::metrics::{aggregate_metrics, LinkDistributionEntry, PerformanceStats};
use crate::output::score::{calculate_score, Penalties, ScoreCategory, ScoreInputs};
use crate::state::{PageMap, PageRecord, PageStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Short description of a page, used in report lists
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub url: String,
    pub title: Option<String>,
    pub depth: u32,
    pub status_code: u16,
}

impl From<&PageRecord> for PageSummary {
    fn from(page: &PageRecord) -> Self {
        Self {
            url: page.url.clone(),
            title: page.title().map(str::to_string),
            depth: page.depth,
            status_code: page.status_code(),
        }
    }
}

/// Full per-page detail
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageReport {
    pub url: String,
    pub status: PageStatus,
    pub status_code: u16,
    pub depth: u32,
    pub title: Option<String>,
    pub has_meta_description: bool,
    pub h1_count: usize,
    pub incoming_links: Vec<String>,
    pub outgoing_links: Vec<String>,
    pub is_orphan: bool,
    pub redirect_target: Option<String>,
    pub load_time_ms: u64,
    pub size_kb: f64,
}

impl From<&PageRecord> for PageReport {
    fn from(page: &PageRecord) -> Self {
        let facts = page.facts();
        Self {
            url: page.url.clone(),
            status: page.status(),
            status_code: page.status_code(),
            depth: page.depth,
            title: page.title().map(str::to_string),
            has_meta_description: facts.is_some_and(|f| f.has_meta_description),
            h1_count: facts.map_or(0, |f| f.h1_count),
            incoming_links: page.incoming_links.iter().cloned().collect(),
            outgoing_links: page.outgoing_links().map(str::to_string).collect(),
            is_orphan: page.is_orphan,
            redirect_target: page.redirect_target().map(str::to_string),
            load_time_ms: page.load_time_ms,
            size_kb: page.size_kb,
        }
    }
}

/// On-page issues found on Healthy pages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentIssues {
    pub missing_title: Vec<String>,
    pub missing_meta_description: Vec<String>,
    /// Pages with no `<h1>` or more than one
    pub h1_issues: Vec<String>,
    pub infinite_scroll_pages: Vec<String>,
}

impl ContentIssues {
    fn collect(pages: &PageMap) -> Self {
        let mut issues = Self::default();
        for page in pages.iter() {
            let Some(facts) = page.facts() else {
                continue;
            };
            if facts.title.is_none() {
                issues.missing_title.push(page.url.clone());
            }
            if !facts.has_meta_description {
                issues.missing_meta_description.push(page.url.clone());
            }
            if facts.h1_count != 1 {
                issues.h1_issues.push(page.url.clone());
            }
            if facts.has_infinite_scroll {
                issues.infinite_scroll_pages.push(page.url.clone());
            }
        }
        issues
    }
}

/// The audit result handed to report consumers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoReport {
    pub start_url: String,
    pub domain: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub stop_reason: StopReason,

    pub total_pages: usize,
    pub total_internal_links: usize,

    pub orphan_pages: Vec<PageSummary>,
    pub broken_links: Vec<LinkEdge>,
    pub redirect_links: Vec<LinkEdge>,
    pub healthy_links: Vec<LinkEdge>,

    pub link_distribution: Vec<LinkDistributionEntry>,
    pub depth_analysis: BTreeMap<u32, usize>,
    pub performance: PerformanceStats,

    pub score: u8,
    pub score_category: ScoreCategory,
    pub penalties: Penalties,

    pub content_issues: ContentIssues,
    pub pages: Vec<PageReport>,
}

/// Builds the report from a finished crawl
pub fn assemble_report(
    output: CrawlOutput,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
) -> SeoReport {
    let CrawlOutput {
        target,
        mut pages,
        stop_reason,
    } = output;
    let start_url = target.start_url.to_string();

    build_link_graph(&mut pages, &start_url);
    let links = classify_links(&pages);
    let metrics = aggregate_metrics(&pages);

    let orphan_pages: Vec<PageSummary> = pages
        .iter()
        .filter(|p| p.is_orphan)
        .map(PageSummary::from)
        .collect();

    let inputs = ScoreInputs {
        total_pages: pages.len(),
        orphan_pages: orphan_pages.len(),
        broken_links: links.broken.len(),
        redirect_links: links.redirect.len(),
        outgoing_counts: metrics
            .link_distribution
            .iter()
            .map(|e| e.outgoing_count)
            .collect(),
        incoming_counts: metrics
            .link_distribution
            .iter()
            .map(|e| e.incoming_count)
            .collect(),
        max_depth_seen: metrics.max_depth_seen,
        average_load_time_ms: metrics.performance.average_load_time_ms,
    };
    let score = calculate_score(&inputs);

    tracing::info!(
        "Report for {}: {} pages, {} orphans, {} broken links, score {} ({})",
        start_url,
        pages.len(),
        orphan_pages.len(),
        links.broken.len(),
        score.score,
        score.category
    );

    let duration_ms = (finished_at - started_at).num_milliseconds().max(0) as u64;

    SeoReport {
        start_url,
        domain: target.domain,
        started_at,
        finished_at,
        duration_ms,
        stop_reason,
        total_pages: pages.len(),
        total_internal_links: metrics.total_internal_links,
        orphan_pages,
        broken_links: links.broken,
        redirect_links: links.redirect,
        healthy_links: links.healthy,
        link_distribution: metrics.link_distribution,
        depth_analysis: metrics.depth_analysis,
        performance: metrics.performance,
        score: score.score,
        score_category: score.category,
        penalties: score.penalties,
        content_issues: ContentIssues::collect(&pages),
        pages: pages.iter().map(PageReport::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::CrawlTarget;
    use crate::state::{PageFacts, PageOutcome};
    use std::collections::BTreeSet;

    fn healthy(url: &str, depth: u32, title: Option<&str>, links: &[&str]) -> PageRecord {
        PageRecord::new(
            url.to_string(),
            depth,
            PageOutcome::Healthy {
                status_code: 200,
                facts: PageFacts {
                    title: title.map(str::to_string),
                    has_meta_description: title.is_some(),
                    h1_count: 1,
                    has_infinite_scroll: false,
                },
                outgoing_links: links.iter().map(|l| l.to_string()).collect::<BTreeSet<_>>(),
            },
            200,
            3.0,
        )
    }

    fn output(pages: PageMap) -> CrawlOutput {
        CrawlOutput {
            target: CrawlTarget::parse("https://example.com/").unwrap(),
            pages,
            stop_reason: StopReason::FrontierExhausted,
        }
    }

    #[test]
    fn test_single_page_report() {
        let mut pages = PageMap::new();
        pages.insert(healthy("https://example.com/", 0, Some("Home"), &[]));

        let now = Utc::now();
        let report = assemble_report(output(pages), now, now);

        assert_eq!(report.total_pages, 1);
        assert!(report.orphan_pages.is_empty());
        assert!(report.broken_links.is_empty());
        assert_eq!(report.healthy_links.len(), 1);
        assert_eq!(report.depth_analysis, BTreeMap::from([(0, 1)]));
        assert!(report.score <= 100);
    }

    #[test]
    fn test_orphans_and_content_issues() {
        let mut pages = PageMap::new();
        pages.insert(healthy("https://example.com/", 0, Some("Home"), &[]));
        pages.insert(healthy("https://example.com/stray", 1, None, &[]));

        let now = Utc::now();
        let report = assemble_report(output(pages), now, now);

        assert_eq!(report.orphan_pages.len(), 1);
        assert_eq!(report.orphan_pages[0].url, "https://example.com/stray");
        assert_eq!(
            report.content_issues.missing_title,
            vec!["https://example.com/stray".to_string()]
        );
        assert!(report.penalties.orphan > 0.0);
    }

    #[test]
    fn test_report_serializes_with_camel_case_keys() {
        let mut pages = PageMap::new();
        pages.insert(healthy(
            "https://example.com/",
            0,
            Some("Home"),
            &["https://example.com/a"],
        ));
        pages.insert(healthy("https://example.com/a", 1, Some("A"), &[]));

        let now = Utc::now();
        let report = assemble_report(output(pages), now, now);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["totalPages"], 2);
        assert_eq!(json["totalInternalLinks"], 1);
        assert_eq!(json["depthAnalysis"]["1"], 1);
        assert_eq!(json["healthyLinks"][0]["sourcePage"], "https://example.com/");
        assert_eq!(json["stopReason"], "FrontierExhausted");
        assert!(json["performance"]["averageLoadTimeMs"].is_number());
    }
}
