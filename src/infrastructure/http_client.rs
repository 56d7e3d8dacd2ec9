//! HTTP fetching for listing and record pages
//!
//! The crawler only depends on `PageFetcher`. `HttpClient` is the reqwest
//! backed implementation used by the binary; tests substitute an in-memory
//! fetcher.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::infrastructure::config::defaults;

/// Response of a single GET
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub url: String,
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    pub fn error_for_status(&self) -> Result<(), FetchError> {
        if self.is_success() {
            Ok(())
        } else {
            Err(FetchError::Status {
                url: self.url.clone(),
                status: self.status,
            })
        }
    }
}

#[derive(Error, Debug)]
pub enum FetchError {
    /// Timeout, connection failure or unreadable body
    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// Non-2xx response, see [`FetchedPage::error_for_status`]
    #[error("Request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

impl FetchError {
    pub fn transport(url: &str, err: impl std::fmt::Display) -> Self {
        Self::Transport {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

/// Anything that can turn a URL into a status code and body
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpClientConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_redirects: usize,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::USER_AGENT.to_string(),
            timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            max_redirects: defaults::MAX_REDIRECTS,
        }
    }
}

/// reqwest client with a fixed timeout and user agent
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    pub fn new(config: HttpClientConfig) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).context("Invalid user agent")?,
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    fn transport_error(&self, url: &str, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::transport(url, format!("timed out after {}s", self.config.timeout_seconds))
        } else {
            FetchError::transport(url, err)
        }
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        debug!(url, "Fetching");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(url, e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(url, e))?;

        debug!(url, status, bytes = body.len(), "Fetched");
        Ok(FetchedPage {
            url: url.to_string(),
            status,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_constants() {
        let config = HttpClientConfig::default();
        assert_eq!(config.timeout_seconds, 5);
        assert!(config.user_agent.contains("Firefox"));
    }

    #[test]
    fn test_client_creation() {
        assert!(HttpClient::new(HttpClientConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_user_agent_is_rejected() {
        let config = HttpClientConfig {
            user_agent: "bad\nagent".to_string(),
            ..HttpClientConfig::default()
        };
        assert!(HttpClient::new(config).is_err());
    }

    #[test]
    fn test_status_classification() {
        let page = |status| FetchedPage {
            url: "https://a.hu".into(),
            status,
            body: String::new(),
        };
        assert!(page(200).is_success());
        assert!(!page(404).is_success());
        assert!(page(404).is_not_found());
        assert!(!page(503).is_not_found());
    }

    #[test]
    fn test_error_for_status() {
        let page = |status| FetchedPage {
            url: "https://a.hu/2".into(),
            status,
            body: String::new(),
        };
        assert!(page(204).error_for_status().is_ok());

        let err = page(503).error_for_status().unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 503, .. }));
        assert_eq!(err.to_string(), "Request to https://a.hu/2 returned HTTP 503");
    }
}
