//! HTTP client with bounded retries
//!
//! Provides the transport-level request loop:
//! - Fixed attempt budget with a fixed delay between attempts
//! - Basic auth on every request
//! - Error classification for retry decisions
//! - Lenient body parsing (JSON, raw text, or empty)

use crate::error::{Error, Result};
use crate::types::{JsonValue, Method};
use reqwest::{Client, Response};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Basic auth credentials attached to every request
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    /// Username
    pub user: String,
    /// Password, if any
    pub password: Option<String>,
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// Total number of attempts per request, including the first
    pub max_attempts: u32,
    /// Delay between attempts, the same before every retry
    pub retry_delay: Duration,
    /// Basic auth credentials
    pub basic_auth: Option<BasicAuth>,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_attempts: 5,
            retry_delay: Duration::from_millis(500),
            basic_auth: None,
            default_headers: HashMap::new(),
            user_agent: format!("stash-api/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the total attempt budget
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.config.max_attempts = attempts;
        self
    }

    /// Set the delay between attempts
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.config.retry_delay = delay;
        self
    }

    /// Set basic auth credentials
    pub fn basic_auth(mut self, user: impl Into<String>, password: Option<String>) -> Self {
        self.config.basic_auth = Some(BasicAuth {
            user: user.into(),
            password,
        });
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// HTTP client that retries transient failures a bounded number of times
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { client, config })
    }

    /// Client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Make a request, retrying connection failures, timeouts and
    /// retryable statuses until the attempt budget is spent
    pub async fn request(&self, method: Method, url: Url) -> Result<Response> {
        let max_attempts = self.config.max_attempts.max(1);
        let timeout_ms = self.config.timeout.as_millis() as u64;
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            let mut req = self
                .client
                .request(method.clone(), url.clone())
                .header("Accept", "application/json");

            for (key, value) in &self.config.default_headers {
                req = req.header(key.as_str(), value.as_str());
            }

            if let Some(auth) = &self.config.basic_auth {
                req = req.basic_auth(&auth.user, auth.password.as_ref());
            }

            let error = match req.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        debug!("Request succeeded: {} {} ({})", method, url, status);
                        return Ok(response);
                    }

                    let body = response.text().await.unwrap_or_default();
                    let error = Error::http_status(status.as_u16(), body);
                    if !error.is_retryable() {
                        return Err(error);
                    }
                    error
                }
                Err(e) if e.is_timeout() => Error::Timeout { timeout_ms },
                Err(e) if e.is_connect() => Error::Http(e),
                Err(e) => return Err(Error::Http(e)),
            };

            if attempt < max_attempts {
                let delay = self.config.retry_delay;
                warn!(
                    "Request {} {} failed ({}), attempt {}/{}, retrying in {:?}",
                    method, url, error, attempt, max_attempts, delay
                );
                tokio::time::sleep(delay).await;
            }
            last_error = Some(error);
        }

        Err(last_error.unwrap_or(Error::MaxRetriesExceeded { max_attempts }))
    }

    /// Make a request and parse the body
    ///
    /// JSON bodies are parsed, non-JSON bodies come back as a string value
    /// and an empty body is `null`.
    pub async fn request_json(&self, method: Method, url: Url) -> Result<JsonValue> {
        let response = self.request(method, url).await?;
        let text = response.text().await?;
        Ok(parse_body(&text))
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn parse_body(text: &str) -> JsonValue {
    if text.trim().is_empty() {
        return JsonValue::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| JsonValue::String(text.to_string()))
}

#[cfg(test)]
mod client_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_body_variants() {
        assert_eq!(parse_body(""), JsonValue::Null);
        assert_eq!(parse_body("  \n"), JsonValue::Null);
        assert_eq!(parse_body(r#"{"size": 1}"#), json!({"size": 1}));
        assert_eq!(
            parse_body("# README\nhello"),
            JsonValue::String("# README\nhello".to_string())
        );
    }

    #[test]
    fn test_basic_auth_debug_redacts() {
        let auth = BasicAuth {
            user: "admin".to_string(),
            password: Some("hunter2".to_string()),
        };
        let debug = format!("{auth:?}");
        assert!(debug.contains("admin"));
        assert!(!debug.contains("hunter2"));
    }
}
