//! Page fetching over plain HTTP(S)
//!
//! One GET per documentation page through a shared client. Certificate
//! verification is off unless asked for: many council sites serve broken
//! chains.

use crate::collect::CollectConfig;
use crate::error::{PageError, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Browser-like User-Agent sent unless overridden
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(config: &CollectConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-GB,en;q=0.9"));

        let mut builder = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .danger_accept_invalid_certs(!config.verify_tls);

        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Fetch a page body, failing on any non-2xx final status
    pub async fn fetch(&self, url: &Url) -> Result<String> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        debug!(url = %url, status = status.as_u16(), "Fetched page");

        if !status.is_success() {
            return Err(PageError::Status(status));
        }

        let body = response.bytes().await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

/// Parse a documentation URL, accepting only absolute http(s) URLs with a host
pub fn parse_page_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| PageError::InvalidUrl(format!("{}: {}", raw, e)))?;

    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        _ => Err(PageError::InvalidUrl(format!(
            "{}: expected an http(s) URL",
            raw
        ))),
    }
}
