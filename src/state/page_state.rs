/// Page status definitions for crawled pages
///
/// A rendered page ends up in exactly one of three states. The state and the
/// data that belongs to it are fixed at render time.
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Coarse classification of a visited page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    /// 2xx response that rendered successfully
    Healthy,

    /// Non-2xx response, render failure, timeout or malformed redirect
    Broken,

    /// 3xx response carrying a usable `Location`
    Redirect,
}

impl PageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Broken => "broken",
            Self::Redirect => "redirect",
        }
    }
}

impl fmt::Display for PageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// On-page SEO facts extracted from a rendered page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageFacts {
    pub title: Option<String>,
    pub has_meta_description: bool,
    pub h1_count: usize,
    pub has_infinite_scroll: bool,
}

/// Render outcome of a page, carrying only the fields relevant to it
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Healthy {
        status_code: u16,
        facts: PageFacts,
        /// Canonical internal URLs this page links to
        outgoing_links: BTreeSet<String>,
    },
    Broken {
        /// Absent when no response was received at all
        status_code: Option<u16>,
        reason: String,
    },
    Redirect {
        status_code: u16,
        /// Canonical redirect target
        target: String,
    },
}

impl PageOutcome {
    pub fn status(&self) -> PageStatus {
        match self {
            Self::Healthy { .. } => PageStatus::Healthy,
            Self::Broken { .. } => PageStatus::Broken,
            Self::Redirect { .. } => PageStatus::Redirect,
        }
    }

    /// HTTP status code, or 0 when the request never produced a response
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Healthy { status_code, .. } | Self::Redirect { status_code, .. } => *status_code,
            Self::Broken { status_code, .. } => status_code.unwrap_or(0),
        }
    }
}
