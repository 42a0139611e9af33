//! Transport seam between the fetch engine and the network
//!
//! The engine only ever sees [`Transport::perform`]: one logical request in,
//! one parsed body or one terminal error out. Retries happen below this line.

use super::client::HttpClient;
use super::endpoint::Endpoint;
use crate::config::StashConfig;
use crate::error::{Error, Result};
use crate::types::{JsonValue, Method};
use async_trait::async_trait;
use tracing::debug;
use url::Url;

/// One page request: the fetch's fixed target plus this page's parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// HTTP method
    pub method: Method,
    /// Target endpoint
    pub endpoint: Endpoint,
    /// Pagination query parameters for this page
    pub page_params: Vec<(String, String)>,
}

impl PageRequest {
    /// Create a request with no pagination parameters
    pub fn new(method: Method, endpoint: Endpoint) -> Self {
        Self {
            method,
            endpoint,
            page_params: Vec::new(),
        }
    }

    /// Replace the pagination parameters
    #[must_use]
    pub fn with_page_params(mut self, params: Vec<(String, String)>) -> Self {
        self.page_params = params;
        self
    }
}

/// Performs a single request with retries, yielding the parsed body
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform the request
    async fn perform(&self, request: &PageRequest) -> Result<JsonValue>;
}

/// HTTP transport bound to one Stash server
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: HttpClient,
    base_url: Url,
}

impl HttpTransport {
    /// Build a transport from a client config
    pub fn new(config: &StashConfig) -> Result<Self> {
        let base_url = config.connection.base_url()?;
        let client = HttpClient::with_config(config.http_client_config())?;
        Ok(Self::from_parts(client, base_url))
    }

    /// Build a transport from an existing client and API root
    pub fn from_parts(client: HttpClient, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// API root all endpoints resolve against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn perform(&self, request: &PageRequest) -> Result<JsonValue> {
        if !is_read_method(&request.method) {
            return Err(Error::UnsupportedMethod {
                method: request.method.to_string(),
            });
        }

        let url = request
            .endpoint
            .resolve(&self.base_url, &request.page_params)?;
        debug!("{} {}", request.method, url);
        self.client.request_json(request.method.clone(), url).await
    }
}

fn is_read_method(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD
}
