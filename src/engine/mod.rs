//! Paginated fetch engine
//!
//! # Overview
//!
//! The engine module provides:
//! - `PagedFetch` - one-shot state machine walking every page of an endpoint
//! - `FetchStream` - the lazy event stream a started fetch produces
//! - `FetchComposer` - chains a second fetch onto the result of a first
//! - `FetchListeners` - name-keyed handlers fed from a stream
//!
//! A fetch is built without side effects and does nothing until its stream
//! is polled, so every consumer sees every event:
//!
//! ```text
//! start → newPage* → end → allPages
//! start → newPage* → error
//! ```

mod compose;
mod listeners;
mod types;

pub use compose::FetchComposer;
pub use listeners::{FetchListeners, Handler, ListenerId};
pub use types::{EventKind, FetchEvent, FetchState};

use crate::error::{Error, Result};
use crate::http::{Endpoint, PageRequest, Transport};
use crate::pagination::{NextPage, Page, PagedPaginator, PaginationState, Paginator};
use crate::types::{JsonValue, Method};
use futures::stream::{self, BoxStream, Stream, StreamExt};
use std::collections::VecDeque;
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tracing::{debug, info, warn};

// ============================================================================
// PagedFetch
// ============================================================================

/// Fetches every page of one endpoint, one request at a time
pub struct PagedFetch {
    /// Transport performing each page request
    transport: Arc<dyn Transport>,
    /// Reads continuation metadata from each page
    paginator: Arc<dyn Paginator>,
    /// Method and endpoint repeated for every page
    request: PageRequest,
    /// Lifecycle state
    state: FetchState,
    /// Cursor and counters
    pagination: PaginationState,
    /// Every item fetched so far, in remote order
    page_buffer: Vec<JsonValue>,
    /// Events produced but not yet handed out
    outbox: VecDeque<FetchEvent>,
}

impl PagedFetch {
    /// Create a fetch for `endpoint` using the paged-collection strategy
    pub fn new(transport: Arc<dyn Transport>, method: Method, endpoint: Endpoint) -> Self {
        Self {
            transport,
            paginator: Arc::new(PagedPaginator::new()),
            request: PageRequest::new(method, endpoint),
            state: FetchState::Created,
            pagination: PaginationState::new(),
            page_buffer: Vec::new(),
            outbox: VecDeque::new(),
        }
    }

    /// Use a different pagination strategy
    #[must_use]
    pub fn with_paginator(mut self, paginator: impl Paginator + 'static) -> Self {
        self.paginator = Arc::new(paginator);
        self
    }

    /// Current lifecycle state
    pub fn state(&self) -> FetchState {
        self.state
    }

    /// Items fetched so far
    pub fn pages(&self) -> &[JsonValue] {
        &self.page_buffer
    }

    /// Turn the fetch into its event stream
    ///
    /// Nothing is requested until the stream is polled.
    pub fn start(self) -> FetchStream {
        FetchStream::new(stream::unfold(self, |mut fetch| async move {
            let event = fetch.next_event().await?;
            Some((event, fetch))
        }))
    }

    /// Produce the next event, fetching a page when none is pending
    ///
    /// Returns `None` once the fetch is terminal and drained.
    pub async fn next_event(&mut self) -> Option<FetchEvent> {
        loop {
            if let Some(event) = self.outbox.pop_front() {
                return Some(event);
            }
            if self.state.is_terminal() {
                return None;
            }
            if self.state == FetchState::Created {
                self.begin();
            } else {
                self.continue_remaining().await;
            }
        }
    }

    /// Fetch the next page if more remain
    ///
    /// Does nothing once the fetch is terminal.
    pub async fn continue_remaining(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        match self.state {
            FetchState::Created => self.begin(),
            FetchState::AwaitingContinuation => self.state = FetchState::FetchingPage,
            _ => {}
        }
        self.fetch_page().await;
    }

    fn begin(&mut self) {
        debug!(
            "Starting fetch: {} {}",
            self.request.method, self.request.endpoint
        );
        self.state = FetchState::FetchingPage;
        self.outbox.push_back(FetchEvent::Start);
    }

    async fn fetch_page(&mut self) {
        let endpoint = self.request.endpoint.to_string();
        let request = self
            .request
            .clone()
            .with_page_params(self.paginator.page_params(&self.pagination));

        let result = match self.transport.perform(&request).await {
            Ok(body) => self
                .paginator
                .process_response(&endpoint, &body, &mut self.pagination),
            Err(e) => Err(e),
        };

        match result {
            Ok(page) => self.accept_page(&endpoint, page),
            Err(e) => self.fail(&endpoint, e),
        }
    }

    fn accept_page(&mut self, endpoint: &str, page: Page) {
        let Page { items, next } = page;
        debug!(
            "{endpoint}: page {} with {} items",
            self.pagination.pages_fetched,
            items.len()
        );

        self.page_buffer.extend(items.iter().cloned());
        self.outbox.push_back(FetchEvent::NewPage(items));

        match next {
            NextPage::Continue { .. } => self.state = FetchState::AwaitingContinuation,
            NextPage::Done => {
                info!(
                    "{endpoint}: fetched {} items in {} pages",
                    self.page_buffer.len(),
                    self.pagination.pages_fetched
                );
                self.state = FetchState::Completed;
                self.outbox.push_back(FetchEvent::End);
                self.outbox
                    .push_back(FetchEvent::AllPages(self.page_buffer.clone()));
            }
        }
    }

    fn fail(&mut self, endpoint: &str, error: Error) {
        warn!("{endpoint}: fetch failed: {error}");
        self.state = FetchState::Failed;
        self.outbox.push_back(FetchEvent::Error(error));
    }
}

impl fmt::Debug for PagedFetch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagedFetch")
            .field("request", &self.request)
            .field("state", &self.state)
            .field("pagination", &self.pagination)
            .field("buffered", &self.page_buffer.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// FetchStream
// ============================================================================

/// Lazy, finite, non-restartable stream of fetch events
pub struct FetchStream {
    inner: BoxStream<'static, FetchEvent>,
}

impl FetchStream {
    /// Wrap any event stream
    pub fn new(stream: impl Stream<Item = FetchEvent> + Send + 'static) -> Self {
        Self {
            inner: stream.boxed(),
        }
    }

    /// A stream that only reports `error`
    pub fn failed(error: Error) -> Self {
        Self::new(stream::iter([FetchEvent::Error(error)]))
    }

    /// Drive the stream and return the aggregated items or the error
    pub async fn into_result(mut self) -> Result<Vec<JsonValue>> {
        while let Some(event) = self.next().await {
            match event {
                FetchEvent::AllPages(items) => return Ok(items),
                FetchEvent::Error(e) => return Err(e),
                FetchEvent::Start | FetchEvent::NewPage(_) | FetchEvent::End => {}
            }
        }
        Err(Error::Incomplete)
    }

    /// Drive the stream, handing every event to `listeners`
    ///
    /// Returns the number of events seen.
    pub async fn dispatch(mut self, listeners: &mut FetchListeners) -> usize {
        let mut seen = 0;
        while let Some(event) = self.next().await {
            listeners.emit(&event);
            seen += 1;
        }
        seen
    }

    /// Chain a second fetch built from this fetch's aggregated result
    pub fn and_then_fetch<F>(self, extract: F) -> FetchStream
    where
        F: FnOnce(Vec<JsonValue>) -> Result<FetchStream> + Send + 'static,
    {
        FetchComposer::new(self, extract).into_stream()
    }
}

impl Stream for FetchStream {
    type Item = FetchEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

impl fmt::Debug for FetchStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchStream").finish_non_exhaustive()
    }
}
