//! Linkscope: an internal link-structure auditor
//!
//! This crate crawls a single site breadth-first, rebuilds its internal link
//! graph and scores the structural SEO defects it finds: orphaned pages,
//! broken internal links, redirects, excessive click depth and unbalanced
//! link distribution.

pub mod config;
pub mod crawler;
pub mod graph;
pub mod output;
pub mod renderer;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Linkscope operations
#[derive(Debug, Error)]
pub enum LinkscopeError {
    #[error("Invalid start URL: {0}")]
    InvalidUrl(String),

    #[error("Start URL has no resolvable domain: {0}")]
    UnresolvableDomain(String),

    #[error("No pages crawled: start URL {url} failed to render ({reason})")]
    NoPagesCrawled { url: String, reason: String },

    #[error("Page renderer unavailable: {0}")]
    RendererUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Malformed URL: {0}")]
    Malformed(String),

    #[error("Link is not navigable: {0}")]
    NonNavigable(String),
}

/// Result type alias for Linkscope operations
pub type Result<T> = std::result::Result<T, LinkscopeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{Config, CrawlOptions};
pub use crawler::{crawl, crawl_with_config, Crawler};
pub use output::SeoReport;
pub use renderer::{HttpRenderer, PageRenderer};
pub use state::{PageRecord, PageStatus};
pub use url::{is_internal, normalize_url};
