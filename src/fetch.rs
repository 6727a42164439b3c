//! Page fetch collaborator: retrieve raw page markup over HTTP.
//!
//! The fetcher returns the page body as a string rather than a parsed tree;
//! parsing happens synchronously in [`crate::extract`] since the parsed
//! document never needs to cross an await point. The acquisition loop treats
//! every [`FetchError`] as opaque and recoverable.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// Browser-like user agent; some archive frontends reject default clients.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Request timeout for a single page fetch.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur while fetching a page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Building the HTTP client failed.
    #[error("failed to build HTTP client: {source}")]
    Client {
        /// The underlying client construction error.
        #[source]
        source: reqwest::Error,
    },

    /// The page address is malformed.
    #[error("invalid page address: {url}")]
    InvalidUrl {
        /// The invalid address string.
        url: String,
    },

    /// Network-level error (DNS, connection, TLS, timeout).
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The address that failed to fetch.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The address that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },
}

impl FetchError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an invalid address error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }
}

/// Fetches raw page markup for a canonical page address.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Returns the page body, or an opaque failure the caller may skip over.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// HTTP implementation of [`PageFetcher`] backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Builds a fetcher with a request timeout and a browser-like user agent.
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|source| FetchError::Client { source })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        if Url::parse(url).is_err() {
            return Err(FetchError::invalid_url(url));
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::http_status(url, status.as_u16()));
        }

        response.text().await.map_err(|e| FetchError::network(url, e))
    }
}
