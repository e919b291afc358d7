//! State module for crawl results
//!
//! # Components
//!
//! - `PageStatus` / `PageOutcome`: the Healthy / Broken / Redirect result of a render
//! - `PageRecord`: one visited page with its facts, depth and link sets
//! - `PageMap`: the visited pages of one crawl, in visit order

mod page_record;
mod page_state;

pub use page_record::{PageMap, PageRecord};
pub use page_state::{PageFacts, PageOutcome, PageStatus};
