//! URL handling module for Linkscope
//!
//! This module provides URL normalization, href resolution, domain extraction
//! and internal/external membership checks.

mod domain;
mod matcher;
mod normalize;

pub use domain::{extract_domain, registered_domain};
pub use matcher::{is_internal, matches_wildcard};
pub use normalize::{normalize_url, resolve_url};
