//! Integration tests for the crawler
//!
//! The wiremock tests drive the full audit through the HTTP renderer against a
//! mock server. The remaining tests use an in-memory site so that large or
//! cyclic link structures and renderer failures can be scripted precisely.

use async_trait::async_trait;
use linkscope::config::CrawlOptions;
use linkscope::crawler::{crawl, Crawler, StopReason};
use linkscope::renderer::{RenderError, RenderSession, RenderedPage};
use linkscope::{HttpRenderer, LinkscopeError, PageRenderer, PageStatus};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Crawl options suitable for tests: no politeness delay
fn test_options(max_depth: u32, max_pages: usize) -> CrawlOptions {
    CrawlOptions {
        max_depth,
        max_pages,
        per_page_delay_ms: 0,
        page_timeout_ms: 2_000,
        crawl_deadline_ms: None,
    }
}

fn html(links: &[String]) -> String {
    let anchors: String = links
        .iter()
        .map(|l| format!(r#"<a href="{}">link</a>"#, l))
        .collect();
    format!(
        "<html><head><title>Page</title></head><body><h1>Page</h1>{}</body></html>",
        anchors
    )
}

async fn mount_page(server: &MockServer, at: &str, links: &[&str]) {
    let links: Vec<String> = links.iter().map(|l| l.to_string()).collect();
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html(&links), "text/html"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_single_isolated_page() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &[]).await;

    let report = crawl(&server.uri(), test_options(3, 10), HttpRenderer::default())
        .await
        .expect("crawl should succeed");

    assert_eq!(report.total_pages, 1);
    assert!(report.orphan_pages.is_empty(), "start page is exempt");
    assert!(report.broken_links.is_empty());
    assert_eq!(report.stop_reason, StopReason::FrontierExhausted);
}

#[tokio::test]
async fn test_linear_chain_has_no_orphans() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/a"]).await;
    mount_page(&server, "/a", &["/b"]).await;
    mount_page(&server, "/b", &[]).await;
    // Nothing links here, so it must never appear
    mount_page(&server, "/c", &[]).await;

    let report = crawl(&server.uri(), test_options(3, 10), HttpRenderer::default())
        .await
        .unwrap();

    assert_eq!(report.total_pages, 3);
    assert!(report.orphan_pages.is_empty());
    assert!(!report.pages.iter().any(|p| p.url.ends_with("/c")));

    let depth_of = |suffix: &str| {
        report
            .pages
            .iter()
            .find(|p| p.url.ends_with(suffix))
            .map(|p| p.depth)
    };
    assert_eq!(depth_of("/a"), Some(1));
    assert_eq!(depth_of("/b"), Some(2));
}

#[tokio::test]
async fn test_404_link_is_broken() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/missing"]).await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string(html(&["/never".to_string()])))
        .mount(&server)
        .await;

    let report = crawl(&server.uri(), test_options(3, 10), HttpRenderer::default())
        .await
        .unwrap();

    let home = format!("{}/", server.uri());
    let broken: Vec<_> = report
        .broken_links
        .iter()
        .filter(|e| e.source_page == home)
        .collect();
    assert_eq!(broken.len(), 1);
    assert!(broken[0].target_url.ends_with("/missing"));
    assert_eq!(broken[0].status_code, 404);

    // Broken pages are not expanded
    assert_eq!(report.total_pages, 2);
    assert!(report.penalties.broken > 0.0);
}

#[tokio::test]
async fn test_redirect_is_classified_with_target() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/old", "/new"]).await;
    mount_page(&server, "/new", &[]).await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/new"))
        .mount(&server)
        .await;

    let report = crawl(&server.uri(), test_options(3, 10), HttpRenderer::default())
        .await
        .unwrap();

    let redirect = report
        .redirect_links
        .iter()
        .find(|e| e.target_url.ends_with("/old"))
        .expect("redirect edge");
    assert_eq!(redirect.status_code, 302);
    assert_eq!(
        redirect.redirect_target.as_deref(),
        Some(format!("{}/new", server.uri()).as_str())
    );

    let new_page = report
        .pages
        .iter()
        .find(|p| p.url.ends_with("/new"))
        .expect("target page visited");
    assert_eq!(new_page.status, PageStatus::Healthy);
    assert_eq!(new_page.depth, 1);
}

#[tokio::test]
async fn test_start_page_http_error_yields_one_page_report() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let report = crawl(&server.uri(), test_options(3, 10), HttpRenderer::default())
        .await
        .unwrap();

    assert_eq!(report.total_pages, 1);
    assert_eq!(report.pages[0].status, PageStatus::Broken);
}

#[tokio::test]
async fn test_invalid_start_url_is_rejected() {
    let result = crawl("not a url", test_options(3, 10), HttpRenderer::default()).await;
    assert!(matches!(result, Err(LinkscopeError::InvalidUrl(_))));
}

// In-memory site

#[derive(Clone)]
enum Scripted {
    Page(Vec<String>),
    Status(u16),
    /// Never answers within any sensible timeout
    Hang,
    /// Answers after the given delay
    Slow(Duration, Vec<String>),
}

#[derive(Default)]
struct ScriptedSite {
    pages: HashMap<String, Scripted>,
    fail_start: bool,
    sessions_closed: Arc<AtomicUsize>,
    renders: Arc<AtomicUsize>,
}

impl ScriptedSite {
    fn with_pages(pages: impl IntoIterator<Item = (String, Scripted)>) -> Self {
        Self {
            pages: pages.into_iter().collect(),
            ..Self::default()
        }
    }
}

#[async_trait]
impl PageRenderer for ScriptedSite {
    async fn start(&self) -> Result<Box<dyn RenderSession>, RenderError> {
        if self.fail_start {
            return Err(RenderError::Unavailable("no browser".to_string()));
        }
        Ok(Box::new(ScriptedSession {
            pages: self.pages.clone(),
            closed: Arc::clone(&self.sessions_closed),
            renders: Arc::clone(&self.renders),
        }))
    }
}

struct ScriptedSession {
    pages: HashMap<String, Scripted>,
    closed: Arc<AtomicUsize>,
    renders: Arc<AtomicUsize>,
}

fn ok_page(url: &str, links: &[String]) -> RenderedPage {
    RenderedPage {
        final_url: url.to_string(),
        status_code: 200,
        redirect_location: None,
        content: html(links),
        elapsed_ms: 10,
    }
}

#[async_trait]
impl RenderSession for ScriptedSession {
    async fn render(&mut self, url: &str, _timeout: Duration) -> Result<RenderedPage, RenderError> {
        self.renders.fetch_add(1, Ordering::SeqCst);
        match self.pages.get(url).cloned() {
            Some(Scripted::Page(links)) => Ok(ok_page(url, &links)),
            Some(Scripted::Slow(delay, links)) => {
                tokio::time::sleep(delay).await;
                Ok(ok_page(url, &links))
            }
            Some(Scripted::Hang) => {
                tokio::time::sleep(Duration::from_secs(3_600)).await;
                Ok(ok_page(url, &[]))
            }
            Some(Scripted::Status(code)) => Ok(RenderedPage {
                final_url: url.to_string(),
                status_code: code,
                redirect_location: None,
                content: String::new(),
                elapsed_ms: 1,
            }),
            None => Ok(RenderedPage {
                final_url: url.to_string(),
                status_code: 404,
                redirect_location: None,
                content: String::new(),
                elapsed_ms: 1,
            }),
        }
    }

    async fn close(self: Box<Self>) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

const SITE: &str = "https://site.test";

fn page_url(n: usize) -> String {
    if n == 0 {
        format!("{}/", SITE)
    } else {
        format!("{}/p{}", SITE, n)
    }
}

/// Homepage links to every page 1..count; each page links back home
fn hub_site(count: usize) -> ScriptedSite {
    let mut pages = vec![(
        page_url(0),
        Scripted::Page((1..count).map(page_url).collect()),
    )];
    pages.extend((1..count).map(|n| (page_url(n), Scripted::Page(vec![page_url(0)]))));
    ScriptedSite::with_pages(pages)
}

#[tokio::test]
async fn test_redirect_without_location_is_broken() {
    let site = ScriptedSite::with_pages([
        (page_url(0), Scripted::Page(vec![page_url(1), page_url(2)])),
        (page_url(1), Scripted::Status(301)),
        (page_url(2), Scripted::Page(vec![])),
    ]);

    let report = crawl(SITE, test_options(3, 10), &site).await.unwrap();

    assert_eq!(report.total_pages, 3);
    let moved = report.pages.iter().find(|p| p.url == page_url(1)).unwrap();
    assert_eq!(moved.status, PageStatus::Broken);
    assert_eq!(moved.status_code, 301);
    assert_eq!(moved.redirect_target, None);

    let sibling = report.pages.iter().find(|p| p.url == page_url(2)).unwrap();
    assert_eq!(sibling.status, PageStatus::Healthy);
    assert!(report.redirect_links.is_empty());
}

#[tokio::test]
async fn test_unparsable_hrefs_are_discarded() {
    let site = ScriptedSite::with_pages([
        (
            page_url(0),
            Scripted::Page(vec![
                "http://[bad".to_string(),
                "https://exa mple.com:99999/".to_string(),
                page_url(1),
            ]),
        ),
        (page_url(1), Scripted::Page(vec![])),
    ]);

    let report = crawl(SITE, test_options(3, 10), &site).await.unwrap();

    assert_eq!(report.total_pages, 2);
    assert!(report.pages.iter().any(|p| p.url == page_url(1)));
    assert!(report.broken_links.is_empty());
    assert_eq!(report.pages[0].outgoing_links, vec![page_url(1)]);
}

#[tokio::test]
async fn test_page_limit_stops_at_exactly_max_pages() {
    let site = hub_site(60);

    let report = crawl(SITE, test_options(3, 30), &site).await.unwrap();

    assert_eq!(report.total_pages, 30);
    assert_eq!(report.stop_reason, StopReason::PageLimit);
    assert_eq!(site.renders.load(Ordering::SeqCst), 30);
    assert_eq!(site.sessions_closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_cyclic_graph_terminates() {
    // 0 -> 1 -> 2 -> 3 -> 0, plus 2 -> 1
    let site = ScriptedSite::with_pages([
        (page_url(0), Scripted::Page(vec![page_url(1)])),
        (page_url(1), Scripted::Page(vec![page_url(2)])),
        (page_url(2), Scripted::Page(vec![page_url(3), page_url(1)])),
        (page_url(3), Scripted::Page(vec![page_url(0)])),
    ]);

    let report = crawl(SITE, test_options(10, 100), &site).await.unwrap();

    assert_eq!(report.total_pages, 4);
    assert_eq!(site.renders.load(Ordering::SeqCst), 4);
    assert_eq!(report.stop_reason, StopReason::FrontierExhausted);
}

#[tokio::test]
async fn test_depth_is_shortest_distance() {
    // 0 -> 1 -> 2 -> 3 and a shortcut 0 -> 3
    let site = ScriptedSite::with_pages([
        (page_url(0), Scripted::Page(vec![page_url(1), page_url(3)])),
        (page_url(1), Scripted::Page(vec![page_url(2)])),
        (page_url(2), Scripted::Page(vec![page_url(3)])),
        (page_url(3), Scripted::Page(vec![])),
    ]);

    let report = crawl(SITE, test_options(10, 100), &site).await.unwrap();

    let depths: HashMap<_, _> = report
        .pages
        .iter()
        .map(|p| (p.url.clone(), p.depth))
        .collect();
    assert_eq!(depths[&page_url(1)], 1);
    assert_eq!(depths[&page_url(2)], 2);
    assert_eq!(depths[&page_url(3)], 1);
}

#[tokio::test]
async fn test_max_depth_bound() {
    let site = ScriptedSite::with_pages(
        (0..6).map(|n| (page_url(n), Scripted::Page(vec![page_url(n + 1)]))),
    );

    let report = crawl(SITE, test_options(2, 100), &site).await.unwrap();

    assert_eq!(report.total_pages, 3);
    assert!(report.pages.iter().all(|p| p.depth <= 2));
    // The link out of the deepest page points past the bound
    assert!(report
        .broken_links
        .iter()
        .any(|e| e.target_url == page_url(3)));
}

#[tokio::test]
async fn test_renderer_start_failure() {
    let site = ScriptedSite {
        fail_start: true,
        ..ScriptedSite::default()
    };

    let result = crawl(SITE, test_options(3, 10), &site).await;

    assert!(matches!(result, Err(LinkscopeError::RendererUnavailable(_))));
    assert_eq!(site.renders.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_start_page_timeout_is_no_pages_crawled() {
    let site = ScriptedSite::with_pages([(page_url(0), Scripted::Hang)]);
    let options = CrawlOptions {
        page_timeout_ms: 100,
        ..test_options(3, 10)
    };

    let result = crawl(SITE, options, &site).await;

    assert!(matches!(result, Err(LinkscopeError::NoPagesCrawled { .. })));
    assert_eq!(site.sessions_closed.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_on_inner_page_is_broken() {
    let site = ScriptedSite::with_pages([
        (page_url(0), Scripted::Page(vec![page_url(1), page_url(2)])),
        (page_url(1), Scripted::Hang),
        (page_url(2), Scripted::Page(vec![])),
    ]);
    let options = CrawlOptions {
        page_timeout_ms: 100,
        ..test_options(3, 10)
    };

    let report = crawl(SITE, options, &site).await.unwrap();

    assert_eq!(report.total_pages, 3);
    let hung = report.pages.iter().find(|p| p.url == page_url(1)).unwrap();
    assert_eq!(hung.status, PageStatus::Broken);
    assert_eq!(hung.status_code, 0);
    assert_eq!(hung.load_time_ms, 0);
}

#[tokio::test(start_paused = true)]
async fn test_deadline_returns_partial_report() {
    let slow = Duration::from_millis(50);
    let mut pages = vec![(
        page_url(0),
        Scripted::Slow(slow, (1..20).map(page_url).collect()),
    )];
    pages.extend((1..20).map(|n| (page_url(n), Scripted::Slow(slow, vec![]))));
    let site = ScriptedSite::with_pages(pages);

    let options = CrawlOptions {
        crawl_deadline_ms: Some(175),
        ..test_options(3, 30)
    };

    let report = crawl(SITE, options, &site).await.unwrap();

    assert_eq!(report.stop_reason, StopReason::Deadline);
    assert!(report.total_pages >= 1 && report.total_pages < 20);
    assert_eq!(site.sessions_closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_concurrent_crawls_share_no_state() {
    let small = Arc::new(hub_site(5));
    let large = Arc::new(hub_site(12));

    let a = Crawler::new(Arc::clone(&small), test_options(3, 30));
    let b = Crawler::new(Arc::clone(&large), test_options(3, 30));
    let c = Crawler::new(Arc::clone(&small), test_options(3, 30));

    let (ra, rb, rc) = tokio::join!(a.crawl(SITE), b.crawl(SITE), c.crawl(SITE));

    assert_eq!(ra.unwrap().total_pages, 5);
    assert_eq!(rb.unwrap().total_pages, 12);
    assert_eq!(rc.unwrap().total_pages, 5);
    assert_eq!(small.sessions_closed.load(Ordering::SeqCst), 2);
}
