//! Crawl frontier and request pacing
//!
//! This module handles:
//! - The FIFO queue of `(url, depth)` pairs waiting to be visited
//! - Enqueue-time dedup so each canonical URL is queued at most once
//! - The politeness delay between consecutive page renders

use std::collections::{HashSet, VecDeque};
use std::time::Duration;
use tokio::time::Instant;
use url::Url;

/// A URL waiting in the frontier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// Canonical URL to visit
    pub url: Url,

    /// BFS level at which the URL was discovered
    pub depth: u32,
}

/// Breadth-first frontier scoped to a single crawl
///
/// FIFO order means entries are popped in non-decreasing depth, so the first
/// time a URL is visited is always at its minimum distance from the start.
#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
    queued: HashSet<String>,
    max_depth: u32,
}

impl Frontier {
    pub fn new(max_depth: u32) -> Self {
        Self {
            queue: VecDeque::new(),
            queued: HashSet::new(),
            max_depth,
        }
    }

    /// Queues a URL unless it is already visited, already queued or too deep
    ///
    /// Returns true if the URL was added.
    pub fn push(&mut self, url: Url, depth: u32, visited: bool) -> bool {
        if visited || depth > self.max_depth {
            return false;
        }

        if !self.queued.insert(url.as_str().to_string()) {
            return false;
        }

        self.queue.push_back(FrontierEntry { url, depth });
        true
    }

    /// Pops the next entry within the depth bound
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        while let Some(entry) = self.queue.pop_front() {
            if entry.depth > self.max_depth {
                tracing::debug!("Discarding {} beyond max depth", entry.url);
                continue;
            }
            return Some(entry);
        }
        None
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Keeps consecutive renders at least `delay` apart
#[derive(Debug)]
pub struct Pacer {
    delay: Duration,
    last_request: Option<Instant>,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_request: None,
        }
    }

    /// Waits out the remainder of the delay, then records a new request
    pub async fn wait_turn(&mut self) {
        if let Some(last) = self.last_request {
            let ready_at = last + self.delay;
            if ready_at > Instant::now() {
                tokio::time::sleep_until(ready_at).await;
            }
        }
        self.last_request = Some(Instant::now());
    }
}
