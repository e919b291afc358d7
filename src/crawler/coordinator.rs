//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the breadth-first crawl loop. Each call to
//! [`Crawler::run`] owns its own frontier and page map, so independent crawls
//! never share mutable state.
//!
//! Per page the loop:
//! - Waits out the politeness delay
//! - Renders the page with a bounded timeout
//! - Classifies the result as Healthy, Broken or Redirect
//! - Expands internal links of Healthy pages into the frontier

use crate::config::CrawlOptions;
use crate::crawler::frontier::{Frontier, FrontierEntry, Pacer};
use crate::crawler::parser::extract_page;
use crate::renderer::{PageRenderer, RenderError, RenderSession, RenderedPage};
use crate::state::{PageMap, PageOutcome, PageRecord};
use crate::url::{extract_domain, is_internal, normalize_url, resolve_url};
use crate::{LinkscopeError, UrlError};
use serde::Serialize;
use std::collections::BTreeSet;
use tokio::time::Instant;
use url::Url;

/// Lifecycle of one crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlPhase {
    Init,
    Crawling,
    Done(StopReason),
}

/// Why the crawl loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StopReason {
    /// Every reachable page within the depth bound was visited
    FrontierExhausted,

    /// `max_pages` pages were visited while work remained
    PageLimit,

    /// The overall wall-clock deadline elapsed
    Deadline,
}

/// Validated crawl target
#[derive(Debug, Clone)]
pub struct CrawlTarget {
    /// Canonical start URL
    pub start_url: Url,

    /// Host the crawl is confined to
    pub domain: String,
}

impl CrawlTarget {
    /// Normalizes the start URL and extracts the crawled domain
    pub fn parse(start_url: &str) -> Result<Self, LinkscopeError> {
        let url = normalize_url(start_url).map_err(|e| match e {
            UrlError::MissingDomain => LinkscopeError::UnresolvableDomain(start_url.to_string()),
            other => LinkscopeError::InvalidUrl(format!("{}: {}", start_url, other)),
        })?;

        let domain = extract_domain(&url)
            .ok_or_else(|| LinkscopeError::UnresolvableDomain(start_url.to_string()))?;

        Ok(Self {
            start_url: url,
            domain,
        })
    }
}

/// Pages collected by one finished crawl
#[derive(Debug)]
pub struct CrawlOutput {
    pub target: CrawlTarget,
    pub pages: PageMap,
    pub stop_reason: StopReason,
}

/// Main crawler structure
///
/// Holds only immutable settings and the renderer; all crawl state lives in
/// the [`CrawlRun`] created per call.
pub struct Crawler<R> {
    renderer: R,
    options: CrawlOptions,
}

impl<R: PageRenderer> Crawler<R> {
    pub fn new(renderer: R, options: CrawlOptions) -> Self {
        Self { renderer, options }
    }

    /// Crawls the site rooted at `start_url`
    ///
    /// The render session is acquired once and closed on every exit path.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlOutput)` - Visited pages and the reason the crawl stopped
    /// * `Err(LinkscopeError)` - Invalid start URL, renderer failure, or the
    ///   start page could not be rendered at all
    pub async fn run(&self, start_url: &str) -> Result<CrawlOutput, LinkscopeError> {
        let target = CrawlTarget::parse(start_url)?;

        let mut session = self.renderer.start().await.map_err(|e| {
            tracing::error!("Renderer failed to start: {}", e);
            LinkscopeError::RendererUnavailable(e.to_string())
        })?;

        let mut run = CrawlRun::new(&target, &self.options);
        let result = run.execute(session.as_mut()).await;
        session.close().await;

        let stop_reason = result?;
        let pages = run.pages;
        Ok(CrawlOutput {
            target,
            pages,
            stop_reason,
        })
    }
}

/// State of a single crawl invocation
struct CrawlRun<'a> {
    target: &'a CrawlTarget,
    options: &'a CrawlOptions,
    frontier: Frontier,
    pages: PageMap,
    pacer: Pacer,
    phase: CrawlPhase,
}

impl<'a> CrawlRun<'a> {
    fn new(target: &'a CrawlTarget, options: &'a CrawlOptions) -> Self {
        Self {
            target,
            options,
            frontier: Frontier::new(options.max_depth),
            pages: PageMap::new(),
            pacer: Pacer::new(options.per_page_delay()),
            phase: CrawlPhase::Init,
        }
    }

    async fn execute(
        &mut self,
        session: &mut dyn RenderSession,
    ) -> Result<StopReason, LinkscopeError> {
        tracing::info!(
            "Starting crawl of {} (max depth {}, max pages {})",
            self.target.start_url,
            self.options.max_depth,
            self.options.max_pages
        );

        let started = Instant::now();
        self.frontier.push(self.target.start_url.clone(), 0, false);
        self.transition(CrawlPhase::Crawling);

        let stop_reason = loop {
            if self.pages.len() >= self.options.max_pages {
                break if self.frontier.is_empty() {
                    StopReason::FrontierExhausted
                } else {
                    StopReason::PageLimit
                };
            }

            if let Some(deadline) = self.options.crawl_deadline() {
                if started.elapsed() >= deadline {
                    tracing::warn!(
                        "Crawl deadline of {}ms reached, stopping early",
                        deadline.as_millis()
                    );
                    break StopReason::Deadline;
                }
            }

            let Some(entry) = self.frontier.pop() else {
                break StopReason::FrontierExhausted;
            };

            if self.pages.contains(entry.url.as_str()) {
                continue;
            }

            self.visit(session, entry).await?;

            if self.pages.len() % 10 == 0 {
                tracing::info!(
                    "Progress: {} pages crawled, {} in frontier, {:.1}s elapsed",
                    self.pages.len(),
                    self.frontier.len(),
                    started.elapsed().as_secs_f64()
                );
            }
        };

        self.transition(CrawlPhase::Done(stop_reason));

        if self.pages.is_empty() {
            return Err(LinkscopeError::NoPagesCrawled {
                url: self.target.start_url.to_string(),
                reason: format!("crawl stopped ({:?}) before any page was visited", stop_reason),
            });
        }

        tracing::info!(
            "Crawl completed: {} pages crawled in {:?} ({:?})",
            self.pages.len(),
            started.elapsed(),
            stop_reason
        );

        Ok(stop_reason)
    }

    fn transition(&mut self, next: CrawlPhase) {
        tracing::debug!("Crawl phase {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }

    /// Renders, classifies and records one page, then expands its links
    async fn visit(
        &mut self,
        session: &mut dyn RenderSession,
        entry: FrontierEntry,
    ) -> Result<(), LinkscopeError> {
        let FrontierEntry { url, depth } = entry;
        tracing::debug!("Visiting [depth {}]: {}", depth, url);

        self.pacer.wait_turn().await;

        let timeout = self.options.page_timeout();
        let rendered = tokio::time::timeout(timeout, session.render(url.as_str(), timeout))
            .await
            .unwrap_or_else(|_| {
                Err(RenderError::Timeout {
                    url: url.to_string(),
                    timeout_ms: self.options.page_timeout_ms,
                })
            });

        if let Err(e) = &rendered {
            if url == self.target.start_url {
                return Err(LinkscopeError::NoPagesCrawled {
                    url: url.to_string(),
                    reason: e.to_string(),
                });
            }
        }

        let record = self.classify(&url, depth, rendered);
        let expand: Vec<Url> = record
            .outgoing_links()
            .filter_map(|link| Url::parse(link).ok())
            .collect();

        if !record.is_healthy() {
            tracing::warn!(
                "{} recorded as {} (status {})",
                record.url,
                record.status(),
                record.status_code()
            );
        }

        self.pages.insert(record);

        for link in expand {
            let visited = self.pages.contains(link.as_str());
            self.frontier.push(link, depth + 1, visited);
        }

        Ok(())
    }

    /// Maps a render result onto the page's final record
    fn classify(
        &self,
        url: &Url,
        depth: u32,
        rendered: Result<RenderedPage, RenderError>,
    ) -> PageRecord {
        let page = match rendered {
            Ok(page) => page,
            Err(e) => {
                let outcome = PageOutcome::Broken {
                    status_code: None,
                    reason: e.to_string(),
                };
                return PageRecord::new(url.to_string(), depth, outcome, 0, 0.0);
            }
        };

        let size_kb = page.content.len() as f64 / 1024.0;
        let status_code = page.status_code;

        let outcome = if (300..400).contains(&status_code) {
            match page
                .redirect_location
                .as_deref()
                .map(|location| resolve_url(location, url))
            {
                Some(Ok(target)) => PageOutcome::Redirect {
                    status_code,
                    target: target.to_string(),
                },
                Some(Err(e)) => PageOutcome::Broken {
                    status_code: Some(status_code),
                    reason: format!("Malformed redirect: {}", e),
                },
                None => PageOutcome::Broken {
                    status_code: Some(status_code),
                    reason: "Redirect without Location header".to_string(),
                },
            }
        } else if !(200..300).contains(&status_code) {
            PageOutcome::Broken {
                status_code: Some(status_code),
                reason: format!("HTTP {}", status_code),
            }
        } else {
            let base = Url::parse(&page.final_url).unwrap_or_else(|_| url.clone());
            let extracted = extract_page(&page.content);
            PageOutcome::Healthy {
                status_code,
                facts: extracted.facts,
                outgoing_links: self.internal_links(url, &base, &extracted.hrefs),
            }
        };

        PageRecord::new(url.to_string(), depth, outcome, page.elapsed_ms, size_kb)
    }

    /// Resolves hrefs and keeps canonical internal links other than the page itself
    fn internal_links(&self, page_url: &Url, base: &Url, hrefs: &[String]) -> BTreeSet<String> {
        hrefs
            .iter()
            .filter_map(|href| match resolve_url(href, base) {
                Ok(link) => Some(link),
                Err(e) => {
                    tracing::debug!("Discarding link {:?} on {}: {}", href, page_url, e);
                    None
                }
            })
            .filter(|link| is_internal(&self.target.domain, link))
            .filter(|link| link != page_url)
            .map(|link| link.to_string())
            .collect()
    }
}
