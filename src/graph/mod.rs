//! Link graph reconstruction
//!
//! Post-crawl passes over the completed page map:
//! - `build_link_graph`: incoming-link sets and orphan flags
//! - `classify_links`: healthy / broken / redirect edge lists with source attribution

mod builder;
mod classifier;

pub use builder::build_link_graph;
pub use classifier::{classify_links, ClassifiedLinks, LinkEdge, DIRECT_ACCESS};
