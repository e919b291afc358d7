//! Crawler module for site traversal and page processing
//!
//! This module contains the core crawling logic, including:
//! - Breadth-first frontier with depth and page bounds
//! - HTML parsing for links and on-page facts
//! - Politeness pacing between renders
//! - Overall crawl coordination

mod coordinator;
mod frontier;
mod parser;

pub use coordinator::{CrawlOutput, CrawlPhase, CrawlTarget, Crawler, StopReason};
pub use frontier::{Frontier, FrontierEntry, Pacer};
pub use parser::{extract_page, ExtractedPage};

use crate::config::{validate, Config, CrawlOptions};
use crate::output::{assemble_report, SeoReport};
use crate::renderer::{HttpRenderer, PageRenderer};
use chrono::Utc;

impl<R: PageRenderer> Crawler<R> {
    /// Crawls the site and assembles the full audit report
    pub async fn crawl(&self, start_url: &str) -> crate::Result<SeoReport> {
        let started_at = Utc::now();
        let output = self.run(start_url).await?;
        let finished_at = Utc::now();

        Ok(assemble_report(output, started_at, finished_at))
    }
}

/// Runs a complete audit of the site rooted at `start_url`
///
/// This is the main entry point. It will:
/// 1. Validate the start URL and derive the crawled domain
/// 2. Acquire a render session
/// 3. Visit pages breadth-first within the configured bounds
/// 4. Build the link graph, classify links and compute metrics
/// 5. Score the site and return the report
///
/// # Arguments
///
/// * `start_url` - Absolute http(s) URL the crawl starts from
/// * `options` - Crawl bounds and timing
/// * `renderer` - Page renderer used for every visit
///
/// # Returns
///
/// * `Ok(SeoReport)` - The assembled report
/// * `Err(LinkscopeError)` - The crawl could not produce any page
pub async fn crawl<R: PageRenderer>(
    start_url: &str,
    options: CrawlOptions,
    renderer: R,
) -> crate::Result<SeoReport> {
    Crawler::new(renderer, options).crawl(start_url).await
}

/// Validates `config` and audits the site with the built-in HTTP renderer
///
/// # Returns
///
/// * `Err(LinkscopeError::Config)` - The configuration failed validation
pub async fn crawl_with_config(start_url: &str, config: &Config) -> crate::Result<SeoReport> {
    validate(config)?;

    let renderer = HttpRenderer::new(config.user_agent.clone());
    crawl(start_url, config.crawler.clone(), renderer).await
}
