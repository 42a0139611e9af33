//! Pagination strategy implementations
//!
//! Each strategy handles one response shape the server uses.

use super::types::{NextPage, Page, PaginationState, Paginator};
use crate::error::{Error, Result};
use crate::types::JsonValue;
use tracing::{debug, warn};

// ============================================================================
// Paged Collections
// ============================================================================

/// Stash paged-API pagination
///
/// Collection endpoints answer with:
///
/// ```json
/// { "size": 25, "limit": 25, "start": 0, "isLastPage": false,
///   "nextPageStart": 25, "values": [ ... ] }
/// ```
///
/// The next request carries `?start=<nextPageStart>`. When `nextPageStart`
/// is absent the cursor is computed as `start + size`. A missing
/// `isLastPage` ends the fetch.
#[derive(Debug, Clone)]
pub struct PagedPaginator {
    /// Query parameter name for the cursor
    pub start_param: String,
    /// Query parameter name for the page size
    pub limit_param: String,
    /// Requested page size (server default when absent)
    pub limit: Option<u32>,
}

impl Default for PagedPaginator {
    fn default() -> Self {
        Self {
            start_param: "start".to_string(),
            limit_param: "limit".to_string(),
            limit: None,
        }
    }
}

impl PagedPaginator {
    /// Create a paginator with Stash parameter names
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the requested page size
    #[must_use]
    pub fn with_limit(mut self, limit: Option<u32>) -> Self {
        self.limit = limit;
        self
    }

    fn next_cursor(&self, body: &JsonValue, items: usize, state: &PaginationState) -> Option<String> {
        if let Some(next) = body.get("nextPageStart").and_then(cursor_value) {
            return Some(next);
        }

        let current = state
            .cursor
            .as_deref()
            .and_then(|c| c.parse::<u64>().ok())
            .unwrap_or(0);
        let start = body
            .get("start")
            .and_then(JsonValue::as_u64)
            .unwrap_or(current);
        let size = body
            .get("size")
            .and_then(JsonValue::as_u64)
            .unwrap_or(items as u64);
        Some((start + size).to_string())
    }
}

impl Paginator for PagedPaginator {
    fn page_params(&self, state: &PaginationState) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(cursor) = &state.cursor {
            params.push((self.start_param.clone(), cursor.clone()));
        }
        if let Some(limit) = self.limit {
            params.push((self.limit_param.clone(), limit.to_string()));
        }
        params
    }

    fn process_response(
        &self,
        endpoint: &str,
        body: &JsonValue,
        state: &mut PaginationState,
    ) -> Result<Page> {
        let items = body
            .get("values")
            .and_then(JsonValue::as_array)
            .cloned()
            .ok_or_else(|| Error::page_contract(endpoint, "response has no 'values' array"))?;
        state.add_page(items.len());

        let next = match body.get("isLastPage").and_then(JsonValue::as_bool) {
            Some(false) => match self.next_cursor(body, items.len(), state) {
                Some(cursor) if state.cursor.as_ref() != Some(&cursor) => {
                    state.set_cursor(cursor.clone());
                    NextPage::Continue { cursor }
                }
                _ => {
                    warn!("{endpoint}: more pages announced but cursor does not advance, stopping");
                    NextPage::Done
                }
            },
            Some(true) => NextPage::Done,
            None => {
                debug!("{endpoint}: no isLastPage flag, treating page as last");
                NextPage::Done
            }
        };

        if next.is_done() {
            state.mark_done();
        }
        Ok(Page::new(items, next))
    }
}

/// Accept numeric or string cursors
fn cursor_value(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

// ============================================================================
// Single Object
// ============================================================================

/// Single-object endpoints
///
/// The whole body is the one and only item, e.g. a single pull request or
/// raw file contents.
#[derive(Debug, Clone, Default)]
pub struct SinglePaginator;

impl Paginator for SinglePaginator {
    fn page_params(&self, _state: &PaginationState) -> Vec<(String, String)> {
        Vec::new()
    }

    fn process_response(
        &self,
        _endpoint: &str,
        body: &JsonValue,
        state: &mut PaginationState,
    ) -> Result<Page> {
        state.add_page(1);
        state.mark_done();
        Ok(Page::new(vec![body.clone()], NextPage::Done))
    }
}
