//! HTTP renderer implementation
//!
//! Fetches pages with reqwest. Redirects are not followed so a 3xx response
//! and its `Location` header reach the crawler untouched.

use super::{PageRenderer, RenderError, RenderSession, RenderedPage};
use crate::config::UserAgentConfig;
use async_trait::async_trait;
use reqwest::{header, redirect::Policy, Client};
use std::time::{Duration, Instant};

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```
/// use linkscope::config::UserAgentConfig;
/// use linkscope::renderer::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Largest body read from a single response
pub const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

/// True unless the response declares a non-HTML content type
fn is_markup(headers: &header::HeaderMap) -> bool {
    match headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) {
        Some(content_type) => content_type.to_ascii_lowercase().contains("html"),
        None => true,
    }
}

/// Reads the body chunk by chunk, stopping at [`MAX_BODY_BYTES`]
async fn read_capped(response: &mut reqwest::Response) -> Result<String, reqwest::Error> {
    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        let room = MAX_BODY_BYTES - body.len();
        if chunk.len() >= room {
            body.extend_from_slice(&chunk[..room]);
            break;
        }
        body.extend_from_slice(&chunk);
    }
    Ok(String::from_utf8_lossy(&body).into_owned())
}

/// Renders pages by plain HTTP GET
#[derive(Debug, Clone, Default)]
pub struct HttpRenderer {
    user_agent: UserAgentConfig,
}

impl HttpRenderer {
    pub fn new(user_agent: UserAgentConfig) -> Self {
        Self { user_agent }
    }
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    async fn start(&self) -> Result<Box<dyn RenderSession>, RenderError> {
        let client = build_http_client(&self.user_agent)
            .map_err(|e| RenderError::Unavailable(e.to_string()))?;
        tracing::debug!("HTTP render session started");
        Ok(Box::new(HttpSession {
            client,
            rendered: 0,
        }))
    }
}

struct HttpSession {
    client: Client,
    rendered: usize,
}

#[async_trait]
impl RenderSession for HttpSession {
    async fn render(&mut self, url: &str, timeout: Duration) -> Result<RenderedPage, RenderError> {
        let started = Instant::now();
        self.rendered += 1;

        let client = &self.client;
        let fetch = async move {
            let mut response = client.get(url).send().await?;
            let status_code = response.status().as_u16();
            let final_url = response.url().to_string();
            let redirect_location = if response.status().is_redirection() {
                response
                    .headers()
                    .get(header::LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            } else {
                None
            };
            let content = if is_markup(response.headers()) {
                read_capped(&mut response).await?
            } else {
                tracing::debug!("Skipping non-HTML body of {}", url);
                String::new()
            };
            Ok::<_, reqwest::Error>((final_url, status_code, redirect_location, content))
        };

        let timed_out = || RenderError::Timeout {
            url: url.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        };

        let (final_url, status_code, redirect_location, content) =
            match tokio::time::timeout(timeout, fetch).await {
                Err(_) => return Err(timed_out()),
                Ok(Err(e)) if e.is_timeout() => return Err(timed_out()),
                Ok(Err(e)) => {
                    let message = if e.is_connect() {
                        "Connection refused".to_string()
                    } else {
                        e.to_string()
                    };
                    return Err(RenderError::Network {
                        url: url.to_string(),
                        message,
                    });
                }
                Ok(Ok(parts)) => parts,
            };

        Ok(RenderedPage {
            final_url,
            status_code,
            redirect_location,
            content,
            elapsed_ms: started.elapsed().as_millis() as u64,
        })
    }

    async fn close(self: Box<Self>) {
        tracing::debug!("HTTP render session closed after {} pages", self.rendered);
    }
}
