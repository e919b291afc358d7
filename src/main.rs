//! Linkscope main entry point
//!
//! This is the command-line interface for the Linkscope link-structure auditor.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use linkscope::config::{load_config, validate, Config, OutputFormat};
use linkscope::crawler::crawl_with_config;
use linkscope::output::write_report;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Linkscope: an internal link-structure auditor
///
/// Linkscope crawls a single site breadth-first, rebuilds its internal link
/// graph and reports orphan pages, broken links, redirects and an overall
/// structural SEO score.
#[derive(Parser, Debug)]
#[command(name = "linkscope")]
#[command(version)]
#[command(about = "An internal link-structure auditor", long_about = None)]
struct Cli {
    /// URL the crawl starts from
    #[arg(value_name = "START_URL")]
    start_url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum click depth to crawl
    #[arg(long)]
    max_depth: Option<u32>,

    /// Maximum number of pages to visit
    #[arg(long)]
    max_pages: Option<usize>,

    /// Delay between page renders in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Per-page render timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Overall crawl deadline in milliseconds
    #[arg(long)]
    deadline_ms: Option<u64>,

    /// Report format
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Write the report to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Json,
    Markdown,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Markdown => OutputFormat::Markdown,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_effective_config(&cli)?;

    let report = match crawl_with_config(&cli.start_url, &config).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e).context(format!("Failed to audit {}", cli.start_url));
        }
    };

    tracing::info!(
        "Audit complete: {} pages, score {} ({})",
        report.total_pages,
        report.score,
        report.score_category
    );

    let path = config.output.path.as_deref().map(Path::new);
    write_report(&report, config.output.format, path).context("Failed to write report")?;

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("linkscope=info,warn"),
            1 => EnvFilter::new("linkscope=debug,info"),
            2 => EnvFilter::new("linkscope=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr so a report on stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file if given, then applies command-line overrides
fn load_effective_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    let crawler = &mut config.crawler;
    if let Some(max_depth) = cli.max_depth {
        crawler.max_depth = max_depth;
    }
    if let Some(max_pages) = cli.max_pages {
        crawler.max_pages = max_pages;
    }
    if let Some(delay_ms) = cli.delay_ms {
        crawler.per_page_delay_ms = delay_ms;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        crawler.page_timeout_ms = timeout_ms;
    }
    if cli.deadline_ms.is_some() {
        crawler.crawl_deadline_ms = cli.deadline_ms;
    }

    if let Some(format) = cli.format {
        config.output.format = format.into();
    }
    if let Some(output) = &cli.output {
        config.output.path = Some(output.display().to_string());
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}
