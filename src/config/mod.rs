//! Configuration module for Linkscope
//!
//! This module handles crawl options, the optional TOML configuration file
//! and its validation.
//!
//! # Example
//!
//! ```no_run
//! use linkscope::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("linkscope.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{Config, CrawlOptions, OutputConfig, OutputFormat, UserAgentConfig};

pub use parser::{load_config, parse_config};
pub use validation::{validate, validate_crawl_options};
