//! HTML fact extraction
//!
//! This module turns rendered markup into the on-page facts the audit needs:
//! - Page title and meta description presence
//! - Number of `<h1>` headings
//! - Outgoing hrefs (still relative; resolution happens in the crawler)
//! - Whether the page appears to load content by infinite scroll

use crate::state::PageFacts;
use scraper::{Html, Selector};

/// Class and attribute markers used by common infinite-scroll widgets
const INFINITE_SCROLL_MARKERS: &[&str] = &[
    "[data-infinite-scroll]",
    "[infinite-scroll]",
    ".infinite-scroll",
    ".infinite-scroll-container",
    ".load-more",
    "[data-load-more]",
];

/// Facts extracted from one rendered page
#[derive(Debug, Clone, Default)]
pub struct ExtractedPage {
    pub facts: PageFacts,

    /// Raw href values, excluding fragment-only and non-navigable ones
    pub hrefs: Vec<String>,
}

/// Parses rendered content and extracts page facts and links
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags anywhere in the document
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - Fragment-only hrefs (`#section`)
/// - `javascript:`, `mailto:`, `tel:` links and data URIs
///
/// `rel="nofollow"` links are kept: they are still internal links for the
/// purpose of the link graph.
///
/// # Example
///
/// ```
/// use linkscope::crawler::extract_page;
///
/// let html = r#"<html><head><title>Test</title></head><body><h1>Hi</h1><a href="/page">Link</a></body></html>"#;
/// let page = extract_page(html);
/// assert_eq!(page.facts.title, Some("Test".to_string()));
/// assert_eq!(page.facts.h1_count, 1);
/// assert_eq!(page.hrefs, vec!["/page".to_string()]);
/// ```
pub fn extract_page(html: &str) -> ExtractedPage {
    let document = Html::parse_document(html);

    let facts = PageFacts {
        title: extract_title(&document),
        has_meta_description: has_meta_description(&document),
        h1_count: count(&document, "h1"),
        has_infinite_scroll: detect_infinite_scroll(&document),
    };

    ExtractedPage {
        facts,
        hrefs: extract_hrefs(&document),
    }
}

fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn has_meta_description(document: &Html) -> bool {
    let Ok(selector) = Selector::parse("meta[name][content]") else {
        return false;
    };

    document.select(&selector).any(|element| {
        let value = element.value();
        value
            .attr("name")
            .is_some_and(|name| name.eq_ignore_ascii_case("description"))
            && value
                .attr("content")
                .is_some_and(|content| !content.trim().is_empty())
    })
}

fn count(document: &Html, selector: &str) -> usize {
    Selector::parse(selector)
        .map(|s| document.select(&s).count())
        .unwrap_or(0)
}

fn detect_infinite_scroll(document: &Html) -> bool {
    let marked = INFINITE_SCROLL_MARKERS
        .iter()
        .any(|marker| count(document, marker) > 0);
    if marked {
        return true;
    }

    let Ok(script_selector) = Selector::parse("script:not([src])") else {
        return false;
    };

    document.select(&script_selector).any(|script| {
        let code = script.text().collect::<String>();
        code.contains("IntersectionObserver") || code.contains("infiniteScroll")
    })
}

fn extract_hrefs(document: &Html) -> Vec<String> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter(|element| element.value().attr("download").is_none())
        .filter_map(|element| element.value().attr("href"))
        .map(str::trim)
        .filter(|href| is_navigable(href))
        .map(str::to_string)
        .collect()
}

fn is_navigable(href: &str) -> bool {
    if href.is_empty() || href.starts_with('#') {
        return false;
    }

    let lowered = href.to_ascii_lowercase();
    !(lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:"))
}
