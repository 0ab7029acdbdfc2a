//! Raw RSS/XML feed fetching
//!
//! One GET per URL, strictly in input order. The first failure aborts the
//! whole batch and no partial results are returned.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

/// Raw feed body paired with the URL it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedResult {
    pub url: String,
    #[serde(rename = "xml")]
    pub body: String,
}

/// Feed fetching errors
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid feed URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Request to '{url}' failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Request to '{url}' returned HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Sequential feed fetcher
#[derive(Debug, Clone, Default)]
pub struct FeedFetcher {
    client: reqwest::Client,
}

impl FeedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse an existing client; its defaults (redirects, TLS) apply as-is
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Check every URL parses before any request goes out (pure function)
    fn parse_urls(urls: &[String]) -> Result<Vec<Url>, FetchError> {
        urls.iter()
            .map(|url| {
                Url::parse(url).map_err(|source| FetchError::InvalidUrl {
                    url: url.clone(),
                    source,
                })
            })
            .collect()
    }

    /// Fetch every URL in order, returning `{url, body}` pairs in the same order
    pub async fn fetch_all(&self, urls: &[String]) -> Result<Vec<FeedResult>, FetchError> {
        let parsed = Self::parse_urls(urls)?;

        let mut results = Vec::with_capacity(urls.len());
        for (url, target) in urls.iter().zip(parsed) {
            results.push(self.fetch_one(url, target).await?);
        }

        info!(feeds = results.len(), "Fetched feed batch");
        Ok(results)
    }

    async fn fetch_one(&self, url: &str, target: Url) -> Result<FeedResult, FetchError> {
        debug!(url, "Fetching feed");

        let response = self
            .client
            .get(target)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        debug!(url, bytes = body.len(), "Feed fetched");

        // The caller's spelling of the URL is kept, not the normalized form
        Ok(FeedResult {
            url: url.to_string(),
            body,
        })
    }
}
