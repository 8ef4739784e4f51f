//! HTTP retrieval of notice pages and PDF attachments.

use crate::document;
use crate::error::{FetchError, Result};
use reqwest::Client;
use tracing::{debug, info};

/// Desktop browser User-Agent; some university sites reject the reqwest default.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }

    /// Client that ignores proxy environment variables, for loopback servers.
    #[cfg(test)]
    pub(crate) fn direct() -> Self {
        let client = Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .no_proxy()
            .build()
            .unwrap();
        Self { client }
    }

    /// Raw HTML of a page.
    pub async fn fetch_page(&self, url: &str) -> std::result::Result<String, FetchError> {
        debug!("Fetching page: {}", url);
        let resp = self.get(url).await?;
        let html = resp.text().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;
        info!("Fetched {} bytes of HTML from {}", html.len(), url);
        Ok(html)
    }

    /// Whole response body; no streaming and no size limit.
    pub async fn fetch_bytes(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
        debug!("Downloading: {}", url);
        let resp = self.get(url).await?;
        let bytes = resp.bytes().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;
        info!("Downloaded {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }

    /// Download a PDF and return its text, pages concatenated in order.
    pub async fn fetch_document_text(&self, url: &str) -> Result<String> {
        let bytes = self.fetch_bytes(url).await?;
        let text = document::extract_text(bytes).await?;
        Ok(text)
    }

    async fn get(&self, url: &str) -> std::result::Result<reqwest::Response, FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(resp)
    }
}
