//! Pagination module
//!
//! Supports: Stash paged collections, single-object responses
//!
//! # Overview
//!
//! A `Paginator` turns a response body into a `Page` (items plus a
//! continuation decision) and produces the query parameters for the next
//! request from the running `PaginationState`.

mod strategies;
mod types;

pub use strategies::{PagedPaginator, SinglePaginator};
pub use types::{NextPage, Page, PaginationState, Paginator};
