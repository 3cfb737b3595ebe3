//! HTTP client for the management API.
//!
//! Authenticates every request with the oauth token and retries requests
//! the API rejects with 429 (rate limited).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, StatusCode};
use serde_json::Value;

use super::error::ApiError;
use super::region::Region;
use super::SpaceApi;

/// Backoff settings for rate-limited requests.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry, doubled on each further retry
    pub initial_backoff: Duration,
    /// Upper bound for a single delay
    pub max_backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(8),
        }
    }
}

impl RetryConfig {
    /// No retries at all.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (zero based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

/// Management API client.
#[derive(Debug, Clone)]
pub struct ManagementClient {
    http: reqwest::Client,
    base_url: String,
    oauth_token: String,
    retry: RetryConfig,
}

impl ManagementClient {
    /// Creates a client against an explicit base URL.
    pub fn new(base_url: impl Into<String>, oauth_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            oauth_token: oauth_token.into(),
            retry: RetryConfig::default(),
        }
    }

    /// Creates a client for the management API host of a region.
    pub fn for_region(region: Region, oauth_token: impl Into<String>) -> Self {
        Self::new(region.base_url(), oauth_token)
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins a resource path onto the base URL.
    fn build_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value, ApiError> {
        let url = self.build_url(path);
        let mut attempt = 0;

        loop {
            tracing::debug!(%method, %url, attempt, "Sending request");

            let mut request = self
                .http
                .request(method.clone(), &url)
                .header(AUTHORIZATION, &self.oauth_token);
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request
                .send()
                .await
                .map_err(|e| ApiError::Transport(e.to_string()))?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS && attempt < self.retry.max_retries {
                let delay = self.retry.delay_for(attempt);
                tracing::debug!(%url, delay_ms = delay.as_millis() as u64, "Rate limited, backing off");
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            let text = response
                .text()
                .await
                .map_err(|e| ApiError::Transport(e.to_string()))?;

            if !status.is_success() {
                return Err(ApiError::Http {
                    status: status.as_u16(),
                    message: text,
                });
            }

            if text.trim().is_empty() {
                return Ok(Value::Null);
            }

            return serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()));
        }
    }
}

#[async_trait]
impl SpaceApi for ManagementClient {
    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.send(Method::GET, path, None).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.send(Method::POST, path, Some(body)).await
    }

    async fn put(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.send(Method::PUT, path, Some(body)).await
    }
}
