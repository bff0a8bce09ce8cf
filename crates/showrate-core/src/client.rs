//! HTTP client for IMDb pages
//!
//! Thin wrapper over `reqwest` that sets browser-like headers, resolves paths
//! against a base URL and turns non-success statuses into errors. Failed
//! requests are not retried.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use tracing::debug;

use crate::error::{Result, ShowrateError};

/// Base URL for IMDb
pub const IMDB_BASE_URL: &str = "https://www.imdb.com";

/// Default User-Agent mimicking a modern browser
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// English pages keep ratings formatted as "8.5" rather than "8,5"
const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Configuration for the IMDb HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Scheme and host that request paths are appended to (default: IMDb)
    pub base_url: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: IMDB_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    /// Default configuration pointed at another host, e.g. a local mock server
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

/// HTTP client for IMDb
pub struct ImdbClient {
    client: reqwest::Client,
    base_url: String,
}

impl ImdbClient {
    /// Create a new client with default configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static(DEFAULT_ACCEPT_LANGUAGE),
        );

        let client = reqwest::Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ShowrateError::ClientBuild)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Absolute URL for a path on the configured host
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch a page and return its body as text
    ///
    /// # Arguments
    /// * `path` - Path and query on the configured host (e.g. "/title/tt0411008/episodes?season=1")
    ///
    /// # Errors
    /// - `ShowrateError::Fetch` on transport failure, a non-2xx status, or an
    ///   unreadable body
    pub async fn fetch(&self, path: &str) -> Result<String> {
        let url = self.url_for(path);
        let fetch_error = |source| ShowrateError::Fetch {
            url: url.clone(),
            source,
        };

        let response = self.client.get(&url).send().await.map_err(fetch_error)?;
        let status = response.status();
        debug!(url = %url, status = status.as_u16(), "Fetched page");

        let response = response.error_for_status().map_err(fetch_error)?;
        response.text().await.map_err(fetch_error)
    }
}
