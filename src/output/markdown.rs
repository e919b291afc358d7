//! Markdown report generation
//!
//! Renders an [`SeoReport`] as a human-readable summary.

use crate::graph::LinkEdge;
use crate::output::report::SeoReport;
use std::fmt::Write;

/// Formats a report as markdown
pub fn format_markdown_report(report: &SeoReport) -> Result<String, std::fmt::Error> {
    let mut md = String::new();
    write_report(&mut md, report)?;
    Ok(md)
}

fn write_report(md: &mut String, report: &SeoReport) -> std::fmt::Result {
    writeln!(md, "# Link Structure Report: {}\n", report.domain)?;

    writeln!(md, "## Run Information\n")?;
    writeln!(md, "- **Start URL**: {}", report.start_url)?;
    writeln!(md, "- **Started**: {}", report.started_at.to_rfc3339())?;
    writeln!(md, "- **Finished**: {}", report.finished_at.to_rfc3339())?;
    writeln!(
        md,
        "- **Duration**: {:.2} seconds",
        report.duration_ms as f64 / 1000.0
    )?;
    writeln!(md, "- **Stopped because**: {:?}\n", report.stop_reason)?;

    writeln!(md, "## Score\n")?;
    writeln!(
        md,
        "**{} / 100** ({})\n",
        report.score, report.score_category
    )?;
    writeln!(md, "| Penalty | Points |")?;
    writeln!(md, "|---------|--------|")?;
    let p = &report.penalties;
    for (name, value) in [
        ("Orphan pages", p.orphan),
        ("Broken links", p.broken),
        ("Redirects", p.redirect),
        ("Link balance", p.link_balance),
        ("Click depth", p.depth),
        ("Performance", p.performance),
        ("Incoming links", p.incoming),
    ] {
        writeln!(md, "| {} | {:.2} |", name, value)?;
    }
    writeln!(md)?;

    writeln!(md, "## Overall Statistics\n")?;
    writeln!(md, "- **Total Pages**: {}", report.total_pages)?;
    writeln!(md, "- **Internal Links**: {}", report.total_internal_links)?;
    writeln!(md, "- **Orphan Pages**: {}", report.orphan_pages.len())?;
    writeln!(md, "- **Broken Links**: {}", report.broken_links.len())?;
    writeln!(md, "- **Redirect Links**: {}", report.redirect_links.len())?;
    writeln!(md, "- **Healthy Links**: {}\n", report.healthy_links.len())?;

    writeln!(md, "## Depth Breakdown\n")?;
    writeln!(md, "| Depth | Pages |")?;
    writeln!(md, "|-------|-------|")?;
    for (depth, count) in &report.depth_analysis {
        writeln!(md, "| {} | {} |", depth, count)?;
    }
    writeln!(md)?;

    writeln!(md, "## Performance\n")?;
    let perf = &report.performance;
    writeln!(
        md,
        "- **Average load time**: {:.0}ms (all pages)",
        perf.average_load_time_ms
    )?;
    if let Some(fastest) = &perf.fastest_page {
        writeln!(
            md,
            "- **Fastest**: {} ({}ms)",
            fastest.url, fastest.load_time_ms
        )?;
    }
    if let Some(slowest) = &perf.slowest_page {
        writeln!(
            md,
            "- **Slowest**: {} ({}ms)",
            slowest.url, slowest.load_time_ms
        )?;
    }
    writeln!(md, "- **Total size**: {:.1} KB\n", perf.total_size_kb)?;

    if !report.orphan_pages.is_empty() {
        writeln!(md, "## Orphan Pages\n")?;
        for page in &report.orphan_pages {
            match &page.title {
                Some(title) => writeln!(md, "- {} ({})", page.url, title)?,
                None => writeln!(md, "- {}", page.url)?,
            }
        }
        writeln!(md)?;
    }

    write_edges(md, "Broken Links", &report.broken_links)?;
    write_edges(md, "Redirects", &report.redirect_links)?;

    let issues = &report.content_issues;
    for (heading, urls) in [
        ("Pages Missing a Title", &issues.missing_title),
        (
            "Pages Missing a Meta Description",
            &issues.missing_meta_description,
        ),
        ("Pages Without Exactly One H1", &issues.h1_issues),
        ("Pages Using Infinite Scroll", &issues.infinite_scroll_pages),
    ] {
        if urls.is_empty() {
            continue;
        }
        writeln!(md, "## {}\n", heading)?;
        for url in urls {
            writeln!(md, "- {}", url)?;
        }
        writeln!(md)?;
    }

    Ok(())
}

fn write_edges(md: &mut String, heading: &str, edges: &[LinkEdge]) -> std::fmt::Result {
    if edges.is_empty() {
        return Ok(());
    }

    writeln!(md, "## {}\n", heading)?;
    writeln!(md, "| Target | Status | Linked From | Detail |")?;
    writeln!(md, "|--------|--------|-------------|--------|")?;
    for edge in edges {
        let detail = edge
            .redirect_target
            .as_deref()
            .map(|t| format!("-> {}", t))
            .or_else(|| edge.reason.clone())
            .unwrap_or_default();
        writeln!(
            md,
            "| {} | {} | {} | {} |",
            edge.target_url, edge.status_code, edge.source_page, detail
        )?;
    }
    writeln!(md)
}
