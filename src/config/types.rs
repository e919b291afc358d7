use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Linkscope
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlOptions,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Bounds and pacing for a single crawl
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CrawlOptions {
    /// Maximum BFS depth to visit from the start URL
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Maximum number of pages visited in one crawl
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Politeness delay before each page render (milliseconds)
    #[serde(rename = "per-page-delay-ms")]
    pub per_page_delay_ms: u64,

    /// Upper bound for a single page render (milliseconds)
    #[serde(rename = "page-timeout-ms")]
    pub page_timeout_ms: u64,

    /// Optional wall-clock budget for the whole crawl (milliseconds)
    #[serde(rename = "crawl-deadline-ms")]
    pub crawl_deadline_ms: Option<u64>,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            max_depth: 3,
            max_pages: 30,
            per_page_delay_ms: 500,
            page_timeout_ms: 30_000,
            crawl_deadline_ms: None,
        }
    }
}

impl CrawlOptions {
    pub fn per_page_delay(&self) -> Duration {
        Duration::from_millis(self.per_page_delay_ms)
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_millis(self.page_timeout_ms)
    }

    pub fn crawl_deadline(&self) -> Option<Duration> {
        self.crawl_deadline_ms.map(Duration::from_millis)
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "Linkscope".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://github.com/linkscope/linkscope".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Markdown,
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Report format
    pub format: OutputFormat,

    /// File to write the report to; stdout when absent
    pub path: Option<String>,
}
