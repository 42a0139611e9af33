//! Pagination types and traits
//!
//! Defines the core pagination abstractions used by all strategies.

use crate::error::Result;
use crate::types::JsonValue;

/// Result of the next page computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// More pages available, starting at this cursor
    Continue {
        /// Opaque position to request next
        cursor: String,
    },
    /// No more pages
    Done,
}

impl NextPage {
    /// Create a continuation at the given cursor
    pub fn at(cursor: impl Into<String>) -> Self {
        Self::Continue {
            cursor: cursor.into(),
        }
    }

    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Check if this is a continue result
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue { .. })
    }
}

/// One interpreted page response
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Items carried by this page, in remote order
    pub items: Vec<JsonValue>,
    /// Whether and where to continue
    pub next: NextPage,
}

impl Page {
    /// Create a page
    pub fn new(items: Vec<JsonValue>, next: NextPage) -> Self {
        Self { items, next }
    }
}

/// Tracks pagination state during iteration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationState {
    /// Cursor for the next request; `None` means the origin
    pub cursor: Option<String>,
    /// Pages interpreted so far
    pub pages_fetched: u32,
    /// Items fetched so far
    pub total_fetched: u64,
    /// Is pagination complete?
    pub done: bool,
}

impl PaginationState {
    /// Create a new pagination state at the origin
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.done = true;
    }

    /// Set cursor
    pub fn set_cursor(&mut self, cursor: String) {
        self.cursor = Some(cursor);
    }

    /// Record one interpreted page
    pub fn add_page(&mut self, items: usize) {
        self.pages_fetched += 1;
        self.total_fetched += items as u64;
    }
}

/// Core trait for pagination strategies
pub trait Paginator: Send + Sync {
    /// Query parameters for the request at the current cursor
    fn page_params(&self, state: &PaginationState) -> Vec<(String, String)>;

    /// Interpret a response body: extract the items and decide whether to
    /// continue, advancing `state` accordingly
    fn process_response(
        &self,
        endpoint: &str,
        body: &JsonValue,
        state: &mut PaginationState,
    ) -> Result<Page>;
}
