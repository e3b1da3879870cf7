//! HTTP server mode: the OAuth relay and the comment endpoint

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use url::Url;

use crate::auth::{AccessToken, GoogleOAuth, TokenSet};
use crate::config::AppConfig;
use crate::error::{Error, FetchError, Result};
use crate::pagination::{resolve_target, within_budget, Accumulator};
use crate::youtube::YouTubeClientProvider;

/// Policy sent with every response
pub const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; \
     script-src 'self' https://apis.google.com; \
     connect-src 'self'; \
     frame-src 'self' https://accounts.google.com";

/// Body of `GET /`
pub const WELCOME_MESSAGE: &str = "Welcome to the YouTube Comments Backend!";

/// App state shared across handlers
#[derive(Clone)]
pub struct AppState {
    config: Arc<AppConfig>,
    youtube: YouTubeClientProvider,
    oauth: Option<GoogleOAuth>,
    shutdown: CancellationToken,
}

impl AppState {
    /// Build state from configuration.
    ///
    /// Missing OAuth settings do not fail; the auth routes answer 503 instead.
    pub fn new(config: AppConfig) -> Result<Self> {
        let youtube = YouTubeClientProvider::new(config.http_client_config())?;
        let oauth = match config.oauth_client() {
            Ok(client) => Some(GoogleOAuth::new(client)?),
            Err(_) => {
                warn!(
                    missing = ?config.missing_oauth_fields(),
                    "Google OAuth not configured, /auth/google routes disabled"
                );
                None
            }
        };

        Ok(Self {
            config: Arc::new(config),
            youtube,
            oauth,
            shutdown: CancellationToken::new(),
        })
    }

    /// Use an externally owned shutdown token
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Token that stops the server and cancels in-flight accumulations
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }
}

/// Request body for the comments endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentsRequest {
    #[serde(default)]
    video_id: String,
    #[serde(default)]
    access_token: String,
    #[serde(default)]
    max_results: Option<i64>,
}

/// Query of the OAuth callback
#[derive(Debug, Deserialize)]
struct CallbackParams {
    code: Option<String>,
    error: Option<String>,
}

/// Token fields returned to a caller without a frontend redirect
#[derive(Debug, Serialize)]
struct TokenResponse<'a> {
    access_token: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_in: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    token_type: Option<&'a str>,
}

impl<'a> From<&'a TokenSet> for TokenResponse<'a> {
    fn from(tokens: &'a TokenSet) -> Self {
        Self {
            access_token: tokens.access_token.expose(),
            expires_in: tokens.expires_in,
            scope: tokens.scope.as_deref(),
            token_type: tokens.token_type.as_deref(),
        }
    }
}

/// Response wrapper
#[derive(Debug, Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn error(msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

fn error_response(status: StatusCode, msg: impl Into<String>) -> Response {
    (status, Json(ApiResponse::<()>::error(msg))).into_response()
}

/// 302 to `location`
fn found(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::FOUND, [(header::LOCATION, value)]).into_response(),
        Err(e) => {
            error!("Invalid redirect location: {e}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Invalid redirect location")
        }
    }
}

/// Build the relay router
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_allowed_origins);
    let csp = SetResponseHeaderLayer::overriding(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(CONTENT_SECURITY_POLICY),
    );

    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health))
        .route("/auth/google", get(auth_google))
        .route("/auth/google/callback", get(auth_google_callback))
        .route("/youtube/comments", post(list_comments))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(csp),
        )
        .with_state(Arc::new(state))
}

/// Any origin when `origins` is empty, otherwise exactly the listed ones
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {origin}");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

/// Start the HTTP server on `port`
pub async fn serve(state: AppState, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to port {port}: {e}")))?;

    serve_on(listener, state).await
}

/// Serve on an already bound listener until Ctrl-C or the shutdown token fires
pub async fn serve_on(listener: TcpListener, state: AppState) -> Result<()> {
    let shutdown = state.shutdown_token();
    let app = build_router(state);

    info!("Starting HTTP server on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    info!("HTTP server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or cancellation, cancelling the token either way
async fn shutdown_signal(shutdown: CancellationToken) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => match result {
            Ok(()) => info!("Shutdown signal received"),
            Err(e) => {
                warn!("Failed to listen for Ctrl-C: {e}");
                shutdown.cancelled().await;
            }
        },
        () = shutdown.cancelled() => {}
    }
    shutdown.cancel();
}

async fn welcome() -> &'static str {
    WELCOME_MESSAGE
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

fn oauth_unavailable(config: &AppConfig) -> Response {
    error_response(
        StatusCode::SERVICE_UNAVAILABLE,
        format!(
            "Google OAuth is not configured (missing {})",
            config.missing_oauth_fields().join(", ")
        ),
    )
}

/// Redirect the browser to the Google consent screen
async fn auth_google(State(state): State<Arc<AppState>>) -> Response {
    let Some(oauth) = &state.oauth else {
        return oauth_unavailable(&state.config);
    };

    match oauth.authorization_url() {
        Ok(url) => {
            info!("Redirecting to Google consent screen");
            found(url.as_str())
        }
        Err(e) => {
            error!("Failed to build consent URL: {e}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Authentication failed")
        }
    }
}

/// Exchange the authorization code and hand the access token to the caller
async fn auth_google_callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Response {
    let Some(oauth) = &state.oauth else {
        return oauth_unavailable(&state.config);
    };

    if let Some(reason) = params.error {
        warn!("Consent denied: {reason}");
        return error_response(
            StatusCode::BAD_REQUEST,
            format!("Authorization denied: {reason}"),
        );
    }

    let Some(code) = params.code.filter(|c| !c.trim().is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "Missing authorization code");
    };

    let tokens = match oauth.exchange_code(&code).await {
        Ok(tokens) => tokens,
        Err(e) => {
            error!("Error getting tokens: {e}");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Authentication failed");
        }
    };

    match &state.config.frontend_redirect_url {
        Some(frontend) => match frontend_location(frontend, &tokens) {
            Ok(location) => found(location.as_str()),
            Err(e) => {
                error!("Invalid frontend redirect URL: {e}");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Authentication failed")
            }
        },
        None => (StatusCode::OK, Json(TokenResponse::from(&tokens))).into_response(),
    }
}

/// `frontend?access_token=...`, keeping any query the frontend URL already has
fn frontend_location(frontend: &str, tokens: &TokenSet) -> Result<Url> {
    let mut url = Url::parse(frontend)?;
    url.query_pairs_mut()
        .append_pair("access_token", tokens.access_token.expose());
    Ok(url)
}

/// Relay up to `maxResults` comment threads for a video
async fn list_comments(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<CommentsRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            warn!(error = %rejection, "Rejected comments request body");
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("Invalid request body: {}", rejection.body_text()),
            );
        }
    };

    if req.video_id.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "videoId is required");
    }
    if req.access_token.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "accessToken is required");
    }

    let target = resolve_target(req.max_results, state.config.default_max_results);
    info!(video_id = %req.video_id, target, "Fetching comment threads");

    let client = state.youtube.get_client(AccessToken::new(req.access_token));
    let accumulator = Accumulator::with_cancellation(state.shutdown.child_token());
    let outcome = within_budget(
        state.config.request_timeout(),
        client.fetch_comments(&accumulator, &req.video_id, target),
    )
    .await;

    match outcome {
        Ok(threads) => (StatusCode::OK, Json(threads)).into_response(),
        Err(e) => fetch_error_response(&e),
    }
}

fn fetch_error_response(err: &FetchError) -> Response {
    let status = match err {
        FetchError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
        FetchError::Upstream { .. } | FetchError::Cancelled => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, format!("Failed to fetch comment threads: {err}"))
}
