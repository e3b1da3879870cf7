//! Pagination module
//!
//! Bounded accumulation over a cursor-paginated upstream.
//!
//! # Overview
//!
//! A [`PageSource`] fetches one page at a time. The [`Accumulator`] asks it
//! for pages no larger than [`MAX_PAGE_SIZE`] and no larger than what is
//! still missing, concatenates the items in upstream order, and stops when
//! the target is met or the upstream stops returning a next-page token.

mod accumulator;
mod types;

pub use accumulator::{fetch_up_to, within_budget, Accumulator, Outcome};
pub use types::{
    resolve_target, AccumulationState, Page, PageRequest, PageSource, StopResult,
    DEFAULT_MAX_RESULTS, MAX_PAGE_SIZE,
};
