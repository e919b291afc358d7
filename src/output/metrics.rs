//! Metrics aggregation over a finished crawl
//!
//! Produces the link-distribution table, the depth histogram and load-time
//! statistics.
//!
//! Performance policy: the average load time covers every visited page,
//! including Broken pages whose load time is zero or near zero; fastest and
//! slowest consider Healthy pages only.

use crate::state::PageMap;
use serde::Serialize;
use std::collections::BTreeMap;

/// Link counts of one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDistributionEntry {
    pub url: String,
    pub incoming_count: usize,
    pub outgoing_count: usize,
    pub depth: u32,
}

/// A page and its load time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageTiming {
    pub url: String,
    pub load_time_ms: u64,
}

/// Load-time statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceStats {
    pub average_load_time_ms: f64,
    pub fastest_page: Option<PageTiming>,
    pub slowest_page: Option<PageTiming>,
    pub total_size_kb: f64,
}

/// Aggregated crawl metrics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlMetrics {
    pub link_distribution: Vec<LinkDistributionEntry>,

    /// Depth -> number of pages first seen at that depth
    pub depth_analysis: BTreeMap<u32, usize>,

    pub performance: PerformanceStats,

    pub max_depth_seen: u32,

    pub total_internal_links: usize,
}

/// Aggregates metrics from a page map whose link graph has been built
pub fn aggregate_metrics(pages: &PageMap) -> CrawlMetrics {
    let link_distribution: Vec<LinkDistributionEntry> = pages
        .iter()
        .map(|page| LinkDistributionEntry {
            url: page.url.clone(),
            incoming_count: page.incoming_links.len(),
            outgoing_count: page.outgoing_count(),
            depth: page.depth,
        })
        .collect();

    let mut depth_analysis = BTreeMap::new();
    for page in pages.iter() {
        *depth_analysis.entry(page.depth).or_insert(0) += 1;
    }

    let max_depth_seen = pages.iter().map(|p| p.depth).max().unwrap_or(0);
    let total_internal_links = pages.iter().map(|p| p.outgoing_count()).sum();

    CrawlMetrics {
        link_distribution,
        depth_analysis,
        performance: performance_stats(pages),
        max_depth_seen,
        total_internal_links,
    }
}

fn performance_stats(pages: &PageMap) -> PerformanceStats {
    if pages.is_empty() {
        return PerformanceStats::default();
    }

    let total_load: u64 = pages.iter().map(|p| p.load_time_ms).sum();
    let average_load_time_ms = total_load as f64 / pages.len() as f64;

    let timing = |page: &crate::state::PageRecord| PageTiming {
        url: page.url.clone(),
        load_time_ms: page.load_time_ms,
    };

    let fastest_page = pages
        .iter()
        .filter(|p| p.is_healthy())
        .min_by_key(|p| p.load_time_ms)
        .map(timing);
    let slowest_page = pages
        .iter()
        .filter(|p| p.is_healthy())
        .max_by_key(|p| p.load_time_ms)
        .map(timing);

    PerformanceStats {
        average_load_time_ms,
        fastest_page,
        slowest_page,
        total_size_kb: pages.iter().map(|p| p.size_kb).sum(),
    }
}
