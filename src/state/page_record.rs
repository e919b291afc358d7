use super::page_state::{PageFacts, PageOutcome, PageStatus};
use std::collections::{BTreeSet, HashMap};

/// One visited page, keyed by its canonical URL
#[derive(Debug, Clone, PartialEq)]
pub struct PageRecord {
    pub url: String,

    /// BFS level at first discovery
    pub depth: u32,

    pub outcome: PageOutcome,

    pub load_time_ms: u64,

    pub size_kb: f64,

    /// Filled by the post-crawl graph pass
    pub incoming_links: BTreeSet<String>,

    /// Filled by the post-crawl graph pass
    pub is_orphan: bool,
}

impl PageRecord {
    pub fn new(
        url: String,
        depth: u32,
        outcome: PageOutcome,
        load_time_ms: u64,
        size_kb: f64,
    ) -> Self {
        Self {
            url,
            depth,
            outcome,
            load_time_ms,
            size_kb,
            incoming_links: BTreeSet::new(),
            is_orphan: false,
        }
    }

    pub fn status(&self) -> PageStatus {
        self.outcome.status()
    }

    pub fn status_code(&self) -> u16 {
        self.outcome.status_code()
    }

    pub fn is_healthy(&self) -> bool {
        self.status() == PageStatus::Healthy
    }

    pub fn facts(&self) -> Option<&PageFacts> {
        match &self.outcome {
            PageOutcome::Healthy { facts, .. } => Some(facts),
            _ => None,
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.facts().and_then(|f| f.title.as_deref())
    }

    /// Outgoing internal links; empty for Broken and Redirect pages
    pub fn outgoing_links(&self) -> impl Iterator<Item = &str> {
        let links = match &self.outcome {
            PageOutcome::Healthy { outgoing_links, .. } => Some(outgoing_links),
            _ => None,
        };
        links.into_iter().flatten().map(String::as_str)
    }

    pub fn outgoing_count(&self) -> usize {
        match &self.outcome {
            PageOutcome::Healthy { outgoing_links, .. } => outgoing_links.len(),
            _ => 0,
        }
    }

    pub fn redirect_target(&self) -> Option<&str> {
        match &self.outcome {
            PageOutcome::Redirect { target, .. } => Some(target),
            _ => None,
        }
    }
}

/// Visited pages in visit order, keyed by canonical URL
///
/// A record can be inserted only once per URL.
#[derive(Debug, Default, Clone)]
pub struct PageMap {
    pages: HashMap<String, PageRecord>,
    order: Vec<String>,
}

impl PageMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record; returns false and drops it if the URL is already present
    pub fn insert(&mut self, record: PageRecord) -> bool {
        if self.pages.contains_key(&record.url) {
            return false;
        }
        self.order.push(record.url.clone());
        self.pages.insert(record.url.clone(), record);
        true
    }

    pub fn get(&self, url: &str) -> Option<&PageRecord> {
        self.pages.get(url)
    }

    pub(crate) fn get_mut(&mut self, url: &str) -> Option<&mut PageRecord> {
        self.pages.get_mut(url)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.pages.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates records in the order they were visited
    pub fn iter(&self) -> impl Iterator<Item = &PageRecord> {
        self.order.iter().filter_map(|url| self.pages.get(url))
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}
