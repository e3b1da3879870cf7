//! Tests for the YouTube client

use super::*;
use crate::auth::AccessToken;
use crate::error::{Error, FetchError};
use crate::http::HttpClientConfig;
use crate::pagination::{fetch_up_to, Accumulator, PageRequest};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider_for(server: &MockServer) -> YouTubeClientProvider {
    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .max_retries(0)
        .no_rate_limit()
        .build();
    YouTubeClientProvider::new(config).unwrap()
}

fn threads(ids: &[&str]) -> serde_json::Value {
    json!(ids
        .iter()
        .map(|id| json!({
            "kind": "youtube#commentThread",
            "id": id,
            "snippet": {"videoId": "dQw4w9WgXcQ", "totalReplyCount": 0}
        }))
        .collect::<Vec<_>>())
}

// ============================================================================
// Wire Type Tests
// ============================================================================

#[test]
fn test_comment_thread_is_transparent() {
    let raw = json!({"id": "t1", "snippet": {"topLevelComment": {"id": "c1"}}, "replies": {"comments": []}});
    let thread: CommentThread = serde_json::from_value(raw.clone()).unwrap();

    assert_eq!(thread.id(), Some("t1"));
    assert_eq!(serde_json::to_value(&thread).unwrap(), raw);
    assert_eq!(thread.into_value(), raw);
}

#[test]
fn test_list_response_without_items_or_token() {
    let response: CommentThreadListResponse =
        serde_json::from_value(json!({"kind": "youtube#commentThreadListResponse"})).unwrap();
    assert!(response.items.is_empty());
    assert!(response.next_page_token.is_none());
}

#[test]
fn test_upstream_error_message() {
    let body = json!({
        "error": {
            "code": 404,
            "message": "The video identified by the videoId parameter could not be found.",
            "errors": [{"reason": "videoNotFound", "domain": "youtube.commentThread"}]
        }
    })
    .to_string();

    assert_eq!(
        upstream_error_message(&body).as_deref(),
        Some("The video identified by the videoId parameter could not be found. (videoNotFound)")
    );
    assert_eq!(upstream_error_message("plain text"), None);
}

// ============================================================================
// Client Tests
// ============================================================================

#[tokio::test]
async fn test_first_page_request_parameters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .and(query_param("part", "snippet,replies"))
        .and(query_param("videoId", "dQw4w9WgXcQ"))
        .and(query_param("maxResults", "20"))
        .and(query_param_is_missing("pageToken"))
        .and(header("Authorization", "Bearer ya29.user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": threads(&["a", "b"]),
            "nextPageToken": "QURTSl9p"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = provider_for(&mock_server).get_client(AccessToken::new("ya29.user"));
    let page = client
        .list_comment_threads(&PageRequest::first("dQw4w9WgXcQ", 20))
        .await
        .unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].id(), Some("a"));
    assert_eq!(page.next_page_token.as_deref(), Some("QURTSl9p"));
}

#[tokio::test]
async fn test_next_page_sends_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .and(query_param("pageToken", "QURTSl9p"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": threads(&["c"])
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = provider_for(&mock_server).get_client(AccessToken::new("t"));
    let page = client
        .list_comment_threads(&PageRequest::new("vid", "QURTSl9p", 100))
        .await
        .unwrap();

    assert_eq!(page.items.len(), 1);
    assert!(!page.has_next());
}

#[tokio::test]
async fn test_not_found_keeps_status_and_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {
                "code": 404,
                "message": "Video not found.",
                "errors": [{"reason": "videoNotFound"}]
            }
        })))
        .mount(&mock_server)
        .await;

    let client = provider_for(&mock_server).get_client(AccessToken::new("t"));
    let err = client
        .list_comment_threads(&PageRequest::first("missing", 10))
        .await
        .unwrap_err();

    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "Video not found. (videoNotFound)");
        }
        other => panic!("Expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_clients_do_not_share_credentials() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("Authorization", "Bearer alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": threads(&["alice-1"])})))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(header("Authorization", "Bearer bob"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": threads(&["bob-1"])})))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let alice = provider.get_client(AccessToken::new("alice"));
    let bob = provider.get_client(AccessToken::new("bob"));

    let (a, b) = tokio::join!(
        fetch_up_to(&alice, "vid", 10),
        fetch_up_to(&bob, "vid", 10)
    );

    assert_eq!(a.unwrap()[0].id(), Some("alice-1"));
    assert_eq!(b.unwrap()[0].id(), Some("bob-1"));
}

// ============================================================================
// Accumulation over the wire
// ============================================================================

#[tokio::test]
async fn test_fetch_comments_across_pages() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .and(query_param_is_missing("pageToken"))
        .and(query_param("maxResults", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": threads(&["t1", "t2", "t3"]),
            "nextPageToken": "p2"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .and(query_param("pageToken", "p2"))
        .and(query_param("maxResults", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": threads(&["t4", "t5", "t6"]),
            "nextPageToken": "p3"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = provider_for(&mock_server).get_client(AccessToken::new("t"));
    let items = client
        .fetch_comments(&Accumulator::new(), "vid", 5)
        .await
        .unwrap();

    let ids: Vec<_> = items.iter().filter_map(CommentThread::id).collect();
    assert_eq!(ids, vec!["t1", "t2", "t3", "t4", "t5"]);
}

#[tokio::test]
async fn test_fetch_comments_maps_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("{}"))
        .mount(&mock_server)
        .await;

    let client = provider_for(&mock_server).get_client(AccessToken::new("t"));
    let err = fetch_up_to(&client, "missing", 10).await.unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_fetch_comments_maps_forbidden_to_upstream() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {"code": 403, "message": "Comments disabled.", "errors": [{"reason": "commentsDisabled"}]}
        })))
        .mount(&mock_server)
        .await;

    let client = provider_for(&mock_server).get_client(AccessToken::new("t"));
    let err = fetch_up_to(&client, "vid", 10).await.unwrap_err();

    assert_eq!(
        err,
        FetchError::upstream("HTTP 403: Comments disabled. (commentsDisabled)")
    );
}

#[tokio::test]
async fn test_fetch_comments_malformed_body_is_upstream_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let client = provider_for(&mock_server).get_client(AccessToken::new("t"));
    let err = fetch_up_to(&client, "vid", 10).await.unwrap_err();

    assert!(matches!(err, FetchError::Upstream { .. }));
}
