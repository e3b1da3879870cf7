//! YouTube comment API
//!
//! The authenticated client provider and the `commentThreads` page source
//! the accumulator drives.

mod client;
mod types;

pub use client::{
    YouTubeClient, YouTubeClientProvider, COMMENT_THREAD_PARTS, YOUTUBE_API_BASE_URL,
};
pub use types::{
    upstream_error_message, ApiError, ApiErrorDetail, ApiErrorEnvelope, CommentThread,
    CommentThreadListResponse,
};

#[cfg(test)]
mod tests;
