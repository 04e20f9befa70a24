//! HTTP client for catalogue page fetches
//!
//! One GET per call against the fixed catalogue site. The header set looks
//! like a desktop browser because the site gates bare clients by region;
//! the caller decides skip/abort policy, so there is no internal retry.

use crate::config::FetcherConfig;
use crate::{ConfigError, KashimoriError};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8";

/// Typed outcome of a failed page fetch
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("request timeout for {url}")]
    Timeout { url: String },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Builds the shared HTTP client with browser-like headers and the
/// configured timeout
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, KashimoriError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
    let accept_language = HeaderValue::from_str(&config.accept_language)
        .map_err(|e| ConfigError::Validation(format!("invalid accept-language: {}", e)))?;
    headers.insert(ACCEPT_LANGUAGE, accept_language);

    let client = Client::builder()
        .user_agent(&config.user_agent)
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Fetches one page and returns its body as text
///
/// Non-2xx statuses and transport failures are typed failures. The body is
/// decoded with the charset the response declares, falling back to UTF-8
/// (`reqwest::Response::text` semantics).
pub async fn fetch_page(client: &Client, url: &str) -> Result<String, FetchError> {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            if e.is_timeout() {
                return Err(FetchError::Timeout {
                    url: url.to_string(),
                });
            }
            return Err(FetchError::Transport {
                url: url.to_string(),
                source: e,
            });
        }
    };

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|e| FetchError::Body {
        url: url.to_string(),
        source: e,
    })
}
