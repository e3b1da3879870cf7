//! HTTP client module
//!
//! Transport for upstream calls.
//!
//! # Features
//!
//! - **Automatic Retries**: bounded retries with backoff for 5xx, timeouts and connect errors
//! - **Outbound Pacing**: token bucket limiter using governor
//! - **Backoff Strategies**: Constant, linear, and exponential backoff
//! - **Authentication**: per-client credentials from the auth module

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

#[cfg(test)]
mod tests;
