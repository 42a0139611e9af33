//! Configuration types
//!
//! `ConnectionConfig` describes where the Stash server lives and who we are;
//! `StashConfig` wraps it together with transport tuning and can be loaded
//! from YAML:
//!
//! ```yaml
//! connection:
//!   protocol: https
//!   hostname: stash.example.com
//!   port: 7990
//!   user: build-bot
//!   password: hunter2
//! retry:
//!   max_attempts: 5
//!   retry_delay_ms: 500
//! page_limit: 100
//! ```

use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, API_BASE};
use crate::types::OptionStringExt;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use url::Url;

// ============================================================================
// Connection
// ============================================================================

/// Protocol, host, port and credentials of a Stash server
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// `http` or `https`
    #[serde(default = "default_protocol")]
    pub protocol: String,

    /// Server hostname
    pub hostname: String,

    /// Server port (scheme default when absent)
    #[serde(default)]
    pub port: Option<u16>,

    /// Username for basic auth
    #[serde(default)]
    pub user: Option<String>,

    /// Password or personal access token for basic auth
    #[serde(default)]
    pub password: Option<String>,
}

fn default_protocol() -> String {
    "http".to_string()
}

impl ConnectionConfig {
    /// Create a connection to `hostname` over plain HTTP with no credentials
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            protocol: default_protocol(),
            hostname: hostname.into(),
            port: None,
            user: None,
            password: None,
        }
    }

    /// Set the protocol
    #[must_use]
    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = protocol.into();
        self
    }

    /// Set the port
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set basic auth credentials
    #[must_use]
    pub fn with_credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self.password = Some(password.into());
        self
    }

    /// Basic auth pair, if a user is configured
    pub fn credentials(&self) -> Option<(String, Option<String>)> {
        self.user
            .clone()
            .none_if_empty()
            .map(|user| (user, self.password.clone()))
    }

    /// Check the connection is usable
    pub fn validate(&self) -> Result<()> {
        if self.hostname.trim().is_empty() {
            return Err(Error::missing_field("connection.hostname"));
        }
        if !matches!(self.protocol.as_str(), "http" | "https") {
            return Err(Error::config(format!(
                "unsupported protocol '{}', expected http or https",
                self.protocol
            )));
        }
        Ok(())
    }

    /// Root of the REST API, e.g. `https://stash.example.com:7990/rest/api/1.0/`
    pub fn base_url(&self) -> Result<Url> {
        self.validate()?;
        let authority = match self.port {
            Some(port) => format!("{}:{port}", self.hostname),
            None => self.hostname.clone(),
        };
        Ok(Url::parse(&format!(
            "{}://{authority}/{API_BASE}",
            self.protocol
        ))?)
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("protocol", &self.protocol)
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

// ============================================================================
// Retry
// ============================================================================

/// Retry policy applied to every page request
///
/// The delay is the same before every retry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    /// Total attempts per request, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay between attempts in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    5
}

fn default_retry_delay_ms() -> u64 {
    500
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StashConfig {
    /// Where to connect
    pub connection: ConnectionConfig,

    /// Retry policy
    #[serde(default)]
    pub retry: RetryConfig,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Page size requested from paged endpoints (server default when absent)
    #[serde(default)]
    pub page_limit: Option<u32>,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_timeout_secs() -> u64 {
    30
}

impl StashConfig {
    /// Create a config with default tuning for the given connection
    pub fn new(connection: ConnectionConfig) -> Self {
        Self {
            connection,
            retry: RetryConfig::default(),
            timeout_secs: default_timeout_secs(),
            page_limit: None,
            user_agent: None,
        }
    }

    /// Parse a config from YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&contents)
    }

    /// Validate all fields
    pub fn validate(&self) -> Result<()> {
        self.connection.validate()?;
        if self.retry.max_attempts == 0 {
            return Err(Error::config("retry.max_attempts must be at least 1"));
        }
        if self.page_limit == Some(0) {
            return Err(Error::config("page_limit must be greater than 0"));
        }
        Ok(())
    }

    /// Transport settings derived from this config
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .max_attempts(self.retry.max_attempts)
            .retry_delay(Duration::from_millis(self.retry.retry_delay_ms));
        if let Some((user, password)) = self.connection.credentials() {
            builder = builder.basic_auth(user, password);
        }
        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        builder.build()
    }
}
