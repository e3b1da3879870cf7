//! Bounded pagination accumulator
//!
//! Drives a [`PageSource`] page by page until the target count is reached
//! or the upstream runs out of pages. The loop is iterative and its state
//! lives on the stack of the call; nothing is shared between calls.

use super::types::{AccumulationState, PageSource};
use crate::error::FetchError;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Result of an accumulation: every collected item, or why there are none
pub type Outcome<T> = std::result::Result<Vec<T>, FetchError>;

/// Fetch up to `target` items of `resource_id` from `source`.
///
/// A target of zero returns an empty list without calling the source.
pub async fn fetch_up_to<S>(source: &S, resource_id: &str, target: usize) -> Outcome<S::Item>
where
    S: PageSource + ?Sized,
{
    Accumulator::new().run(source, resource_id, target).await
}

/// Impose a wall-clock budget on an accumulation.
///
/// Expiry drops the in-flight fetch and reports an upstream timeout.
pub async fn within_budget<T, F>(budget: Duration, accumulation: F) -> Outcome<T>
where
    F: Future<Output = Outcome<T>>,
{
    match tokio::time::timeout(budget, accumulation).await {
        Ok(outcome) => outcome,
        Err(_) => {
            warn!("Accumulation exceeded budget of {:?}", budget);
            Err(FetchError::upstream(format!(
                "timeout after {}ms",
                budget.as_millis()
            )))
        }
    }
}

/// Accumulation driver with cooperative cancellation
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    cancel: CancellationToken,
}

impl Accumulator {
    /// Create an accumulator that is never cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an accumulator that stops when `cancel` fires
    pub fn with_cancellation(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    /// Check if cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Run the fetch loop.
    ///
    /// Any failure, including cancellation, discards the items collected so far.
    pub async fn run<S>(&self, source: &S, resource_id: &str, target: usize) -> Outcome<S::Item>
    where
        S: PageSource + ?Sized,
    {
        if target == 0 {
            debug!(resource_id, "Target is zero, skipping upstream");
            return Ok(Vec::new());
        }

        let mut state = AccumulationState::new(target);

        loop {
            if self.cancel.is_cancelled() {
                info!(
                    resource_id,
                    pages = state.pages_fetched(),
                    "Accumulation cancelled before next page"
                );
                return Err(FetchError::Cancelled);
            }

            let request = state.next_request(resource_id);
            debug!(
                resource_id,
                page_size = request.page_size,
                first_page = request.is_first_page(),
                "Fetching page"
            );

            let fetched = tokio::select! {
                biased;
                () = self.cancel.cancelled() => None,
                result = source.fetch_page(&request) => Some(result),
            };

            let page = match fetched {
                None => {
                    info!(resource_id, "Accumulation cancelled during page fetch");
                    return Err(FetchError::Cancelled);
                }
                Some(Ok(page)) => page,
                Some(Err(e)) => {
                    let err = FetchError::from(e);
                    warn!(
                        resource_id,
                        pages = state.pages_fetched(),
                        discarded = state.collected_len(),
                        "Page fetch failed: {err}"
                    );
                    return Err(err);
                }
            };

            let page_len = page.items.len();
            if state.absorb(page).should_stop() {
                info!(
                    resource_id,
                    items = state.collected_len(),
                    pages = state.pages_fetched(),
                    "Accumulation complete"
                );
                return Ok(state.into_items());
            }

            debug!(
                resource_id,
                page_len,
                collected = state.collected_len(),
                remaining = state.remaining(),
                "Continuing to next page"
            );
        }
    }
}
