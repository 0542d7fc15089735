//! HTTP fetching of gallery pages and image bytes.
//!
//! Every request goes through the same retry policy: transient failures
//! (timeouts, connection errors, 5xx, 429) are retried with exponential
//! backoff, permanent ones fail immediately.

mod request;
mod retry;

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::debug;
use tokio_retry::RetryIf;
use url::Url;

use crate::config::MAX_IMAGE_BODY_SIZE;
use crate::error_handling::get_retry_strategy;
use crate::sites::Page;

use request::RequestHeaders;
use retry::{BodyTooLarge, EmptyBody};

pub(crate) use retry::is_retriable_error;

/// Fetches pages and images with a shared client.
#[derive(Clone)]
pub struct PageFetcher {
    client: Arc<reqwest::Client>,
    max_body_bytes: usize,
}

impl PageFetcher {
    pub fn new(client: Arc<reqwest::Client>) -> Self {
        Self {
            client,
            max_body_bytes: MAX_IMAGE_BODY_SIZE,
        }
    }

    /// Caps the size of image bodies accepted by [`fetch_bytes`](Self::fetch_bytes).
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    /// Fetches and parses an HTML page.
    ///
    /// The returned page is keyed by the final URL after redirects, so
    /// relative links resolve the way a browser would resolve them.
    pub async fn fetch_page(&self, url: &str) -> Result<Page> {
        let parsed = Url::parse(url).with_context(|| format!("Invalid page URL {url}"))?;
        let client = &self.client;
        let parsed = &parsed;

        let (final_url, body) = with_retry(url, move || async move {
            let response = RequestHeaders::page(client.get(parsed.clone()))
                .send()
                .await?
                .error_for_status()?;
            let final_url = response.url().clone();
            let body = response.text().await?;
            Ok::<_, anyhow::Error>((final_url, body))
        })
        .await
        .with_context(|| format!("Failed to fetch page {url}"))?;

        debug!("Fetched page {final_url} ({} bytes)", body.len());
        Ok(Page::parse(final_url, &body))
    }

    /// Fetches the bytes of an image referenced from the page at `referer`.
    ///
    /// # Errors
    ///
    /// Fails on network errors, non-success statuses, empty bodies and bodies
    /// larger than the configured maximum. The size is checked against
    /// `Content-Length` first and again while the body streams in.
    pub async fn fetch_bytes(&self, url: &str, referer: Option<&str>) -> Result<Vec<u8>> {
        let parsed = Url::parse(url).with_context(|| format!("Invalid image URL {url}"))?;
        let client = &self.client;
        let parsed = &parsed;
        let max = self.max_body_bytes;

        with_retry(url, move || async move {
            let mut response = RequestHeaders::image(client.get(parsed.clone()), referer)
                .send()
                .await?
                .error_for_status()?;

            if let Some(size) = response.content_length() {
                if size > max as u64 {
                    return Err(anyhow::Error::new(BodyTooLarge { size, max }));
                }
            }

            let mut bytes = Vec::new();
            while let Some(chunk) = response.chunk().await? {
                if bytes.len() + chunk.len() > max {
                    let size = (bytes.len() + chunk.len()) as u64;
                    return Err(anyhow::Error::new(BodyTooLarge { size, max }));
                }
                bytes.extend_from_slice(&chunk);
            }

            if bytes.is_empty() {
                return Err(anyhow::Error::new(EmptyBody));
            }
            Ok::<_, anyhow::Error>(bytes)
        })
        .await
        .with_context(|| format!("Failed to download {url}"))
    }
}

async fn with_retry<T, F, Fut>(url: &str, operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    RetryIf::spawn(get_retry_strategy(), operation, |error: &anyhow::Error| {
        let retriable = is_retriable_error(error);
        if retriable {
            debug!("Retrying {url} after transient error: {error:#}");
        }
        retriable
    })
    .await
}
