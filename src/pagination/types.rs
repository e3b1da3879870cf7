//! Pagination types and traits
//!
//! Defines the page-level abstractions the accumulator drives.

use crate::error::Result;
use async_trait::async_trait;

/// Hard upper bound the upstream accepts for one page
pub const MAX_PAGE_SIZE: usize = 100;

/// Target used when a caller does not ask for a specific count: one full page
pub const DEFAULT_MAX_RESULTS: usize = MAX_PAGE_SIZE;

/// Resolve a caller-supplied count into a target.
///
/// Absent uses `default`; zero and negative counts mean "nothing".
pub fn resolve_target(requested: Option<i64>, default: usize) -> usize {
    match requested {
        None => default,
        Some(n) if n <= 0 => 0,
        Some(n) => usize::try_from(n).unwrap_or(usize::MAX),
    }
}

/// Parameters for one upstream page fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Identifier of the resource being paged (a video id)
    pub resource_id: String,
    /// Opaque cursor, empty for the first page
    pub page_token: String,
    /// Number of items to ask for, never above [`MAX_PAGE_SIZE`]
    pub page_size: usize,
}

impl PageRequest {
    /// Create a request; the page size is clamped to [`MAX_PAGE_SIZE`]
    pub fn new(resource_id: impl Into<String>, page_token: impl Into<String>, page_size: usize) -> Self {
        Self {
            resource_id: resource_id.into(),
            page_token: page_token.into(),
            page_size: page_size.min(MAX_PAGE_SIZE),
        }
    }

    /// Request for the first page
    pub fn first(resource_id: impl Into<String>, page_size: usize) -> Self {
        Self::new(resource_id, String::new(), page_size)
    }

    /// Check if this requests the first page
    pub fn is_first_page(&self) -> bool {
        self.page_token.is_empty()
    }
}

/// One page of upstream results
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items in upstream order
    pub items: Vec<T>,
    /// Cursor for the next page, absent on the last page
    pub next_page_token: Option<String>,
}

impl<T> Page<T> {
    /// Create a page
    pub fn new(items: Vec<T>, next_page_token: Option<String>) -> Self {
        Self {
            items,
            next_page_token,
        }
    }

    /// Create a final page
    pub fn last(items: Vec<T>) -> Self {
        Self::new(items, None)
    }

    /// Check if more pages follow
    pub fn has_next(&self) -> bool {
        self.next_page_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Whether the accumulation loop should keep fetching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopResult {
    /// Fetch another page
    Continue,
    /// Stop, the collected items are the result
    Stop,
}

impl StopResult {
    /// Check if we should continue
    pub fn should_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }

    /// Check if we should stop
    pub fn should_stop(&self) -> bool {
        matches!(self, Self::Stop)
    }
}

/// Per-request state of one accumulation.
///
/// `collected` only grows, and never holds more than `target` items once a
/// page has been absorbed.
#[derive(Debug, Clone)]
pub struct AccumulationState<T> {
    collected: Vec<T>,
    target: usize,
    cursor: String,
    pages_fetched: usize,
}

impl<T> AccumulationState<T> {
    /// Fresh state for a target count
    pub fn new(target: usize) -> Self {
        Self {
            collected: Vec::with_capacity(target.min(MAX_PAGE_SIZE)),
            target,
            cursor: String::new(),
            pages_fetched: 0,
        }
    }

    /// Items still needed to reach the target
    pub fn remaining(&self) -> usize {
        self.target.saturating_sub(self.collected.len())
    }

    /// Target count
    pub fn target(&self) -> usize {
        self.target
    }

    /// Number of items collected so far
    pub fn collected_len(&self) -> usize {
        self.collected.len()
    }

    /// Current cursor, empty before the first page
    pub fn cursor(&self) -> &str {
        &self.cursor
    }

    /// Pages absorbed so far
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Check if the target has been reached
    pub fn is_satisfied(&self) -> bool {
        self.collected.len() >= self.target
    }

    /// The request for the next page: never larger than what is still needed
    pub fn next_request(&self, resource_id: &str) -> PageRequest {
        PageRequest::new(resource_id, self.cursor.clone(), self.remaining())
    }

    /// Append a page and decide whether to continue.
    ///
    /// An empty page that carries a next-page token continues the loop.
    pub fn absorb(&mut self, page: Page<T>) -> StopResult {
        self.pages_fetched += 1;
        let has_next = page.has_next();
        self.collected.extend(page.items);

        if self.is_satisfied() {
            self.collected.truncate(self.target);
            return StopResult::Stop;
        }

        match page.next_page_token {
            Some(token) if has_next => {
                self.cursor = token;
                StopResult::Continue
            }
            _ => StopResult::Stop,
        }
    }

    /// Consume the state, yielding the collected items
    pub fn into_items(self) -> Vec<T> {
        self.collected
    }
}

/// Something that can fetch one page of items for a resource
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Item type carried by each page
    type Item: Send;

    /// Fetch one page
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<Self::Item>>;
}
