//! Page rendering seam
//!
//! The crawler never talks to the network directly. It acquires one
//! [`RenderSession`] from a [`PageRenderer`] per crawl, renders pages through
//! it and closes it when the crawl ends. [`HttpRenderer`] is the built-in
//! implementation; a headless browser can be plugged in behind the same traits.

mod http;

pub use http::{build_http_client, HttpRenderer};

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Result of rendering one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// URL the content was served from
    pub final_url: String,

    pub status_code: u16,

    /// Raw `Location` header of a 3xx response
    pub redirect_location: Option<String>,

    /// Rendered markup
    pub content: String,

    pub elapsed_ms: u64,
}

/// Errors that can occur while rendering
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("Render of {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("Renderer could not start: {0}")]
    Unavailable(String),
}

/// Factory for render sessions
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Acquires the rendering resource for one crawl
    async fn start(&self) -> Result<Box<dyn RenderSession>, RenderError>;
}

/// An acquired rendering resource, used sequentially by one crawl
#[async_trait]
pub trait RenderSession: Send {
    async fn render(&mut self, url: &str, timeout: Duration) -> Result<RenderedPage, RenderError>;

    /// Releases the resource
    async fn close(self: Box<Self>);
}

#[async_trait]
impl<T: PageRenderer + ?Sized> PageRenderer for Arc<T> {
    async fn start(&self) -> Result<Box<dyn RenderSession>, RenderError> {
        (**self).start().await
    }
}

#[async_trait]
impl<T: PageRenderer + ?Sized> PageRenderer for &T {
    async fn start(&self) -> Result<Box<dyn RenderSession>, RenderError> {
        (**self).start().await
    }
}
