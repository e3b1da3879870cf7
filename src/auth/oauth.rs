//! OAuth2 authorization-code flow against Google's endpoints
//!
//! Builds the consent URL the browser is redirected to and exchanges the
//! returned authorization code for tokens. Tokens are handed back to the
//! caller and never kept here.

use super::types::{AccessToken, Secret, TokenSet};
use crate::error::{Error, Result};
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Google's consent screen
pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Google's token endpoint
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Default limit for one token-endpoint round trip
pub const DEFAULT_TOKEN_TIMEOUT: Duration = Duration::from_secs(10);

/// Scope needed to read comment threads on behalf of the user
pub const YOUTUBE_FORCE_SSL_SCOPE: &str = "https://www.googleapis.com/auth/youtube.force-ssl";

/// OAuth client registration
#[derive(Debug, Clone)]
pub struct OAuthClientConfig {
    /// Client ID
    pub client_id: String,
    /// Client secret
    pub client_secret: Secret,
    /// Redirect URI registered for this client
    pub redirect_uri: String,
    /// Authorization endpoint
    pub auth_url: String,
    /// Token endpoint
    pub token_url: String,
    /// Requested scopes
    pub scopes: Vec<String>,
    /// Limit for one token-endpoint round trip
    pub timeout: Duration,
}

impl OAuthClientConfig {
    /// Registration against Google's default endpoints and the YouTube scope
    pub fn google(
        client_id: impl Into<String>,
        client_secret: impl Into<Secret>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            auth_url: GOOGLE_AUTH_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            scopes: vec![YOUTUBE_FORCE_SSL_SCOPE.to_string()],
            timeout: DEFAULT_TOKEN_TIMEOUT,
        }
    }
}

/// Authorization-code client
#[derive(Debug, Clone)]
pub struct GoogleOAuth {
    config: OAuthClientConfig,
    http_client: Client,
}

impl GoogleOAuth {
    /// Create a new OAuth client whose token requests give up after `config.timeout`
    pub fn new(config: OAuthClientConfig) -> Result<Self> {
        let http_client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(config, http_client))
    }

    /// Create an OAuth client with a custom HTTP client
    pub fn with_client(config: OAuthClientConfig, http_client: Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    /// Get the client registration
    pub fn config(&self) -> &OAuthClientConfig {
        &self.config
    }

    /// Consent URL requesting offline access for the configured scopes
    pub fn authorization_url(&self) -> Result<Url> {
        let scope = self.config.scopes.join(" ");
        let url = Url::parse_with_params(
            &self.config.auth_url,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("response_type", "code"),
                ("access_type", "offline"),
                ("scope", scope.as_str()),
            ],
        )?;
        Ok(url)
    }

    /// Exchange an authorization code for tokens
    pub async fn exchange_code(&self, code: &str) -> Result<TokenSet> {
        if code.trim().is_empty() {
            return Err(Error::oauth2("Authorization code is empty"));
        }

        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.expose()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];

        let response = self
            .http_client
            .post(&self.config.token_url)
            .form(&form)
            .send()
            .await
            .map_err(Error::Http)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!("Token exchange rejected with status {status}");
            return Err(Error::OAuth2 {
                message: format!("Token request failed with status {status}: {body}"),
            });
        }

        let token_response: TokenResponse = response.json().await.map_err(Error::Http)?;
        debug!(
            has_refresh_token = token_response.refresh_token.is_some(),
            "Token exchange succeeded"
        );
        Ok(token_response.into_token_set())
    }
}

/// OAuth2 token response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
}

impl TokenResponse {
    fn into_token_set(self) -> TokenSet {
        TokenSet {
            access_token: AccessToken::new(self.access_token),
            refresh_token: self.refresh_token.map(Secret::new),
            expires_in: self.expires_in,
            expires_at: self
                .expires_in
                .map(|secs| Utc::now() + chrono::Duration::seconds(secs)),
            scope: self.scope,
            token_type: self.token_type,
        }
    }
}
