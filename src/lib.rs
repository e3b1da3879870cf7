// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # comment-relay
//!
//! An OAuth relay for the YouTube Data API that returns up to N comment
//! threads for a video, paging through the upstream on the caller's behalf.
//!
//! ## Features
//!
//! - **Bounded accumulation**: page through `commentThreads` until a target
//!   count is reached or the upstream runs out, never asking for more than
//!   is still needed
//! - **Per-request credentials**: every caller's access token gets its own
//!   client; nothing is shared across requests except the connection pool
//! - **Google OAuth relay**: consent redirect and authorization-code exchange
//! - **Transport**: retries with backoff for transient failures, outbound
//!   pacing
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use comment_relay::auth::AccessToken;
//! use comment_relay::http::HttpClientConfig;
//! use comment_relay::pagination::fetch_up_to;
//! use comment_relay::youtube::YouTubeClientProvider;
//!
//! #[tokio::main]
//! async fn main() -> comment_relay::Result<()> {
//!     let provider = YouTubeClientProvider::new(HttpClientConfig::default())?;
//!     let client = provider.get_client(AccessToken::new("ya29..."));
//!
//!     match fetch_up_to(&client, "dQw4w9WgXcQ", 250).await {
//!         Ok(threads) => println!("{} threads", threads.len()),
//!         Err(e) => eprintln!("{e}"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │   HTTP relay (axum)        /auth/google   /youtube/comments  │
//! └──────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────────┬───────────────┴───────────┬───────────────────┐
//! │     Auth     │        Pagination         │      YouTube      │
//! ├──────────────┼───────────────────────────┼───────────────────┤
//! │ Bearer       │ PageSource                │ ClientProvider    │
//! │ Google OAuth │ Accumulator (bounded)     │ commentThreads    │
//! │              │ cancellation / budget     │ error envelope    │
//! └──────────────┴───────────────────────────┴───────────────────┘
//!                                │
//! ┌──────────────────────────────┴───────────────────────────────┐
//! │   HTTP client: retry, backoff, rate limit (reqwest/governor) │
//! └──────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the relay
pub mod error;

/// Common types and type aliases
pub mod types;

/// Authentication and the Google OAuth exchange
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Bounded pagination accumulator
pub mod pagination;

/// YouTube comment-thread client
pub mod youtube;

/// Layered relay configuration
pub mod config;

/// Command-line interface and HTTP server
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, FetchError, Result};
pub use types::*;

// Re-export commonly used types
pub use config::AppConfig;
pub use pagination::{fetch_up_to, Accumulator, Outcome, DEFAULT_MAX_RESULTS};
pub use youtube::{CommentThread, YouTubeClient, YouTubeClientProvider};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
