// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::needless_pass_by_value)]

//! # stash-api
//!
//! An async client for the Stash / Bitbucket Server REST API built around a
//! paginated fetch engine.
//!
//! ## Features
//!
//! - **Paged Collections**: Walks `values` / `isLastPage` / `nextPageStart` pages
//! - **Event Streams**: `start`, `newPage`, `end`, `allPages`, `error`
//! - **Composition**: Chain one fetch onto the result of another
//! - **Retries**: Five attempts with a fixed delay below the engine
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stash_api::{ConnectionConfig, FetchEvent, StashApi, StashConfig};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> stash_api::Result<()> {
//!     let config = StashConfig::new(
//!         ConnectionConfig::new("stash.example.com").with_credentials("bot", "secret"),
//!     );
//!     let api = StashApi::new(&config)?;
//!
//!     let mut events = api.repos("PRJ");
//!     while let Some(event) = events.next().await {
//!         if let FetchEvent::NewPage(repos) = event {
//!             println!("{} repos", repos.len());
//!         }
//!     }
//!
//!     let statuses = api.pull_request_build_status("PRJ", "app", 42).into_result().await?;
//!     println!("{statuses:?}");
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │  StashApi        projects() repos() pull_requests()  │
//! └──────────────────────────┬───────────────────────────┘
//!                            │ FetchStream
//! ┌──────────────┬───────────┴──────────┬────────────────┐
//! │  PagedFetch  │    FetchComposer     │ FetchListeners │
//! ├──────────────┴──────────────────────┴────────────────┤
//! │  Paginator: PagedPaginator, SinglePaginator          │
//! ├──────────────────────────────────────────────────────┤
//! │  Transport: HttpTransport → HttpClient (retry)       │
//! └──────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Connection and client configuration
pub mod config;

/// HTTP client with retry, endpoints and transport
pub mod http;

/// Pagination strategies
pub mod pagination;

/// Paginated fetch engine
pub mod engine;

/// Stash REST resources
pub mod api;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use api::StashApi;
pub use config::{ConnectionConfig, RetryConfig, StashConfig};
pub use engine::{
    EventKind, FetchComposer, FetchEvent, FetchListeners, FetchState, FetchStream, PagedFetch,
};
pub use http::{Endpoint, HttpTransport, PageRequest, Transport};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
