//! Wire types for the `commentThreads` endpoint

use crate::pagination::Page;
use crate::types::JsonValue;
use serde::{Deserialize, Serialize};

/// A comment thread exactly as the upstream returned it.
///
/// The relay counts and forwards threads; it does not look inside them
/// beyond the id used in logs and tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentThread(JsonValue);

impl CommentThread {
    /// Wrap a raw upstream record
    pub fn new(value: JsonValue) -> Self {
        Self(value)
    }

    /// Thread id, if present
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(JsonValue::as_str)
    }

    /// Take the raw record
    pub fn into_value(self) -> JsonValue {
        self.0
    }
}

/// Response body of `commentThreads.list`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThreadListResponse {
    /// Threads on this page
    #[serde(default)]
    pub items: Vec<CommentThread>,
    /// Cursor for the next page
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl From<CommentThreadListResponse> for Page<CommentThread> {
    fn from(response: CommentThreadListResponse) -> Self {
        Page::new(response.items, response.next_page_token)
    }
}

/// Google API error envelope: `{"error": {"code": 404, "message": "...", "errors": [...]}}`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorEnvelope {
    /// The error body
    pub error: ApiError,
}

/// Google API error body
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    /// HTTP status code echoed by the API
    #[serde(default)]
    pub code: u16,
    /// Human readable message
    #[serde(default)]
    pub message: String,
    /// Individual error reasons
    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,
}

/// One entry of [`ApiError::errors`]
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    /// Machine readable reason, e.g. `videoNotFound` or `commentsDisabled`
    #[serde(default)]
    pub reason: String,
}

impl ApiError {
    /// Message with the first reason appended, e.g. `"The video ... (videoNotFound)"`
    pub fn describe(&self) -> String {
        match self.errors.first().map(|d| d.reason.as_str()) {
            Some(reason) if !reason.is_empty() => format!("{} ({reason})", self.message),
            _ => self.message.clone(),
        }
    }
}

/// Extract a readable message from an upstream error body
pub fn upstream_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error.describe())
        .filter(|message| !message.is_empty())
}
