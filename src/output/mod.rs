//! Output module for assembling and writing audit reports
//!
//! This module handles:
//! - Aggregating crawl metrics and computing the SEO score
//! - Assembling the final [`SeoReport`]
//! - Rendering the report as JSON or markdown

mod markdown;
pub mod metrics;
mod report;
pub mod score;

pub use markdown::format_markdown_report;
pub use metrics::{
    aggregate_metrics, CrawlMetrics, LinkDistributionEntry, PageTiming, PerformanceStats,
};
pub use report::{assemble_report, ContentIssues, PageReport, PageSummary, SeoReport};
pub use score::{
    calculate_penalties, calculate_score, Penalties, ScoreCategory, ScoreInputs, SeoScore,
};

use crate::config::OutputFormat;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while writing a report
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to format report: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Result type alias for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Renders a report in the requested format
pub fn render_report(report: &SeoReport, format: OutputFormat) -> OutputResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Markdown => Ok(format_markdown_report(report)?),
    }
}

/// Writes a report to `path`, or to stdout when no path is given
///
/// # Arguments
///
/// * `report` - The assembled report
/// * `format` - Output format
/// * `path` - Destination file; parent directories are created if needed
pub fn write_report(
    report: &SeoReport,
    format: OutputFormat,
    path: Option<&Path>,
) -> OutputResult<()> {
    let rendered = render_report(report, format)?;

    match path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::write(path, rendered)?;
            tracing::info!("Report written to: {}", path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(())
}
