//! HTTP client with rate limiting awareness.
//!
//! Provides a wrapper around reqwest with:
//! - GitHub default headers (accept, user agent, optional token)
//! - Rate limit tracking from response headers
//! - Throttling when approaching limits
//! - Non-success responses surfaced as errors carrying status, reason and body

use crate::config::{ChonkersConfig, NetworkConfig};
use crate::{ChonkersError, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_LENGTH};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// Rate limit state extracted from response headers.
#[derive(Debug, Clone, Default)]
pub struct RateLimitState {
    /// Remaining requests allowed.
    pub remaining: Option<u64>,
    /// Total request limit.
    pub limit: Option<u64>,
    /// Unix timestamp when the rate limit resets.
    pub reset: Option<u64>,
}

impl RateLimitState {
    /// Check if we should throttle requests.
    pub fn should_throttle(&self) -> bool {
        match (self.remaining, self.limit) {
            (Some(remaining), Some(limit)) if limit > 0 => {
                // Throttle when below 10% of limit
                let threshold = (limit as f64 * 0.1) as u64;
                remaining < threshold.max(1)
            }
            _ => false,
        }
    }

    /// Get time until rate limit resets.
    pub fn time_until_reset(&self) -> Option<Duration> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        self.reset
            .filter(|&reset| reset > now)
            .map(|reset| Duration::from_secs(reset - now))
    }
}

/// HTTP client with rate limiting awareness.
pub struct HttpClient {
    client: Client,
    rate_limit_remaining: AtomicI64,
    rate_limit_limit: AtomicU64,
    rate_limit_reset: AtomicU64,
    /// Throttle delay when close to the rate limit.
    throttle_delay: Duration,
}

impl HttpClient {
    /// Create a client carrying the default GitHub headers from `config`.
    pub fn new(config: &ChonkersConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(NetworkConfig::ACCEPT_HEADER));
        if let Some(token) = &config.token {
            let mut value =
                HeaderValue::from_str(&format!("token {}", token)).map_err(|e| {
                    ChonkersError::Config {
                        message: format!("Invalid {} value: {}", NetworkConfig::TOKEN_ENV_VAR, e),
                    }
                })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = Client::builder()
            .user_agent(NetworkConfig::USER_AGENT)
            .default_headers(headers);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| ChonkersError::Network {
            message: format!("Failed to create HTTP client: {}", e),
            source: Some(e),
        })?;

        Ok(Self {
            client,
            rate_limit_remaining: AtomicI64::new(-1),
            rate_limit_limit: AtomicU64::new(0),
            rate_limit_reset: AtomicU64::new(0),
            throttle_delay: NetworkConfig::THROTTLE_DELAY,
        })
    }

    /// Get the current rate limit state.
    pub fn rate_limit_state(&self) -> RateLimitState {
        let remaining = self.rate_limit_remaining.load(Ordering::SeqCst);
        let limit = self.rate_limit_limit.load(Ordering::SeqCst);
        let reset = self.rate_limit_reset.load(Ordering::SeqCst);
        RateLimitState {
            remaining: (remaining >= 0).then_some(remaining as u64),
            limit: (limit > 0).then_some(limit),
            reset: (reset > 0).then_some(reset),
        }
    }

    /// Make a GET request. Non-success statuses become errors.
    pub async fn get(&self, url: &str) -> Result<Response> {
        self.maybe_throttle().await;
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| request_error("GET", url, e))?;

        self.update_rate_limits(&response);
        check_response_status(response).await
    }

    /// Make a GET request and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.get(url).await?;
        response.json::<T>().await.map_err(|e| ChonkersError::Json {
            message: format!("Failed to parse response from {}: {}", url, e),
            source: None,
        })
    }

    /// Make a HEAD request. Non-success statuses become errors.
    pub async fn head(&self, url: &str) -> Result<Response> {
        self.maybe_throttle().await;
        debug!("HEAD {}", url);

        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|e| request_error("HEAD", url, e))?;

        self.update_rate_limits(&response);
        check_response_status(response).await
    }

    /// HEAD `url` and return its `Content-Length`, if the server sent one.
    pub async fn content_length(&self, url: &str) -> Result<Option<u64>> {
        let response = self.head(url).await?;
        Ok(response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok()))
    }

    // Internal methods

    /// Pause for the fixed throttle delay when the remaining budget is low.
    ///
    /// The reset time is only logged; this never waits for the window to reset.
    async fn maybe_throttle(&self) {
        let state = self.rate_limit_state();
        if state.should_throttle() {
            warn!(
                "Rate limit approaching (remaining: {:?}/{:?}, resets in {:?}), throttling for {:?}",
                state.remaining,
                state.limit,
                state.time_until_reset(),
                self.throttle_delay
            );
            tokio::time::sleep(self.throttle_delay).await;
        }
    }

    fn update_rate_limits(&self, response: &Response) {
        let headers = response.headers();

        if let Some(num) = header_number::<i64>(headers, "X-RateLimit-Remaining") {
            self.rate_limit_remaining.store(num, Ordering::SeqCst);
        }
        if let Some(num) = header_number::<u64>(headers, "X-RateLimit-Limit") {
            self.rate_limit_limit.store(num, Ordering::SeqCst);
        }
        if let Some(num) = header_number::<u64>(headers, "X-RateLimit-Reset") {
            self.rate_limit_reset.store(num, Ordering::SeqCst);
        }

        let remaining = self.rate_limit_remaining.load(Ordering::SeqCst);
        let limit = self.rate_limit_limit.load(Ordering::SeqCst);
        if remaining >= 0 && limit > 0 {
            debug!("Rate limit: {}/{}", remaining, limit);
        }
    }
}

fn header_number<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<T>().ok())
}

fn request_error(method: &str, url: &str, e: reqwest::Error) -> ChonkersError {
    if e.is_timeout() {
        return ChonkersError::Timeout {
            url: url.to_string(),
        };
    }
    ChonkersError::Network {
        message: format!("{} {} failed: {}", method, url, e),
        source: Some(e),
    }
}

async fn check_response_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let reason = status.canonical_reason().unwrap_or("Unknown").to_string();
    let text = response.text().await.unwrap_or_default();
    Err(ChonkersError::GitHubApi {
        status: status.as_u16(),
        reason,
        body: normalize_body(&text),
    })
}

/// Compact JSON bodies; pass anything else through trimmed.
fn normalize_body(text: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(value) => value.to_string(),
        Err(_) => text.trim().to_string(),
    }
}
