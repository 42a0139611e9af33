//! HTTP transport module
//!
//! Provides the retrying HTTP client and the `Transport` seam the fetch
//! engine drives.
//!
//! # Features
//!
//! - **Bounded Retries**: fixed attempt budget (5 by default) with a fixed
//!   500ms delay between attempts
//! - **Endpoint Resolution**: paths relative to `/rest/api/1.0/`, including
//!   `../../` escapes into sibling API namespaces
//! - **Basic Auth**: credentials from the connection config

mod client;
mod endpoint;
mod transport;

pub use client::{BasicAuth, HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use endpoint::{Endpoint, API_BASE};
pub use transport::{HttpTransport, PageRequest, Transport};

#[cfg(test)]
mod tests;
