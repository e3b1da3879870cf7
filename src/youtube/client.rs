//! YouTube Data API client
//!
//! [`YouTubeClientProvider`] owns the shared transport and hands out one
//! [`YouTubeClient`] per credential. A client lives for one relayed request.

use super::types::{upstream_error_message, CommentThread, CommentThreadListResponse};
use crate::auth::{AccessToken, AuthConfig};
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RequestConfig};
use crate::pagination::{Accumulator, Outcome, Page, PageRequest, PageSource};
use async_trait::async_trait;
use tracing::debug;

/// Default upstream base URL
pub const YOUTUBE_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Resource parts requested for every thread
pub const COMMENT_THREAD_PARTS: &str = "snippet,replies";

/// Builds authenticated clients for the comment API
#[derive(Debug, Clone)]
pub struct YouTubeClientProvider {
    http: HttpClient,
}

impl YouTubeClientProvider {
    /// Create a provider; a config without a base URL targets [`YOUTUBE_API_BASE_URL`]
    pub fn new(mut config: HttpClientConfig) -> Result<Self> {
        if config.base_url.is_none() {
            config.base_url = Some(YOUTUBE_API_BASE_URL.to_string());
        }
        Ok(Self {
            http: HttpClient::with_config(config)?,
        })
    }

    /// Client that authenticates every request with `credential`.
    ///
    /// Nothing is validated here; a bad token surfaces on the first fetch.
    pub fn get_client(&self, credential: AccessToken) -> YouTubeClient {
        YouTubeClient {
            http: self.http.authenticated(AuthConfig::Bearer { token: credential }),
        }
    }
}

/// Authenticated handle for one caller
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    http: HttpClient,
}

impl YouTubeClient {
    /// Fetch one page of comment threads for a video
    pub async fn list_comment_threads(&self, request: &PageRequest) -> Result<Page<CommentThread>> {
        let mut config = RequestConfig::new()
            .query("part", COMMENT_THREAD_PARTS)
            .query("videoId", request.resource_id.as_str())
            .query("maxResults", request.page_size.to_string());
        if !request.is_first_page() {
            config = config.query("pageToken", request.page_token.as_str());
        }

        let response: CommentThreadListResponse = self
            .http
            .get_json_with_config("commentThreads", config)
            .await
            .map_err(describe_upstream_error)?;

        debug!(
            video_id = %request.resource_id,
            items = response.items.len(),
            has_next = response.next_page_token.is_some(),
            "Fetched comment thread page"
        );
        Ok(response.into())
    }

    /// Fetch up to `target` comment threads for a video
    pub async fn fetch_comments(
        &self,
        accumulator: &Accumulator,
        video_id: &str,
        target: usize,
    ) -> Outcome<CommentThread> {
        accumulator.run(self, video_id, target).await
    }
}

#[async_trait]
impl PageSource for YouTubeClient {
    type Item = CommentThread;

    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<CommentThread>> {
        self.list_comment_threads(request).await
    }
}

/// Replace a raw Google error body with its message, keeping the status
fn describe_upstream_error(err: Error) -> Error {
    match err {
        Error::HttpStatus { status, body } => {
            let body = upstream_error_message(&body).unwrap_or(body);
            Error::HttpStatus { status, body }
        }
        other => other,
    }
}
