//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scanner:
//! - Building the HTTP client with browser-like headers
//! - GET requests returning the page body as an owned `Document`
//! - Fixed-delay retries for transport failures and non-success statuses

use crate::config::FetcherConfig;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// A fetched page
///
/// The body is kept as a string; extractors parse it synchronously so no
/// parsed tree ever crosses an await point.
#[derive(Debug, Clone)]
pub struct Document {
    /// URL the page was requested from, used to resolve relative links
    pub url: Url,
    pub body: String,
}

/// Fetch failures surfaced after all attempts are used up
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Fetching {url} failed after {attempts} attempt(s): {last_error}")]
    Exhausted {
        url: String,
        attempts: u32,
        last_error: String,
    },
}

/// Builds an HTTP client with proper configuration
///
/// Compression is negotiated by reqwest itself so that bodies are
/// transparently decoded; only the language header is set explicitly.
///
/// # Example
///
/// ```no_run
/// use jobscan::config::FetcherConfig;
/// use jobscan::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&config.accept_language) {
        headers.insert(ACCEPT_LANGUAGE, value);
    }

    Client::builder()
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()
}

/// GET with retries
///
/// Every attempt, including the first, may fail on transport errors,
/// timeouts or a non-2xx status. Between attempts the fetcher sleeps for
/// the configured delay; there is no sleep after the last attempt.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    max_tries: u32,
    retry_delay: Duration,
}

impl Fetcher {
    pub fn new(client: Client, config: &FetcherConfig) -> Self {
        Self {
            client,
            max_tries: config.max_tries.max(1),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        }
    }

    /// Fetches a page, retrying up to the configured number of attempts
    pub async fn fetch(&self, url: &Url) -> Result<Document, FetchError> {
        let mut last_error = String::new();

        for attempt in 1..=self.max_tries {
            match self.try_fetch(url).await {
                Ok(body) => {
                    debug!("Fetched {} ({} bytes, attempt {})", url, body.len(), attempt);
                    return Ok(Document {
                        url: url.clone(),
                        body,
                    });
                }
                Err(e) => {
                    warn!(
                        "Attempt {}/{} for {} failed: {}",
                        attempt, self.max_tries, url, e
                    );
                    last_error = e;
                }
            }

            if attempt < self.max_tries {
                tokio::time::sleep(self.retry_delay).await;
            }
        }

        Err(FetchError::Exhausted {
            url: url.to_string(),
            attempts: self.max_tries,
            last_error,
        })
    }

    async fn try_fetch(&self, url: &Url) -> Result<String, String> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {}", status.as_u16()));
        }

        response.text().await.map_err(|e| classify(&e))
    }
}

fn classify(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        format!("Connection failed: {}", error)
    } else {
        error.to_string()
    }
}
