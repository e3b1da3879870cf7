//! Relay configuration
//!
//! Values are layered, later sources winning:
//! 1. built-in defaults
//! 2. an optional YAML file
//! 3. a `.env` file in the working directory
//! 4. process environment variables

use crate::auth::{OAuthClientConfig, Secret, GOOGLE_AUTH_URL, GOOGLE_TOKEN_URL, YOUTUBE_FORCE_SSL_SCOPE};
use crate::error::{Error, Result, ResultExt};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::pagination::DEFAULT_MAX_RESULTS;
use crate::types::OptionStringExt;
use crate::youtube::YOUTUBE_API_BASE_URL;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete relay configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Port the HTTP server listens on
    pub port: u16,

    /// Google OAuth client registration
    pub google: GoogleConfig,

    /// Where the browser is sent after a successful code exchange
    pub frontend_redirect_url: Option<String>,

    /// Upstream API settings
    pub upstream: UpstreamConfig,

    /// Target count used when a request omits `maxResults`
    pub default_max_results: usize,

    /// Wall-clock budget for one comments request, in seconds
    pub request_timeout_secs: u64,

    /// Allowed CORS origins; empty allows any origin
    pub cors_allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            google: GoogleConfig::default(),
            frontend_redirect_url: None,
            upstream: UpstreamConfig::default(),
            default_max_results: DEFAULT_MAX_RESULTS,
            request_timeout_secs: 30,
            cors_allowed_origins: Vec::new(),
        }
    }
}

// ============================================================================
// Google OAuth
// ============================================================================

/// Google OAuth settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GoogleConfig {
    /// OAuth client ID
    pub client_id: Option<String>,
    /// OAuth client secret
    pub client_secret: Option<Secret>,
    /// Redirect URI registered with Google
    pub redirect_uri: Option<String>,
    /// Authorization endpoint
    pub auth_url: String,
    /// Token endpoint
    pub token_url: String,
    /// Requested scopes
    pub scopes: Vec<String>,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            redirect_uri: None,
            auth_url: GOOGLE_AUTH_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            scopes: vec![YOUTUBE_FORCE_SSL_SCOPE.to_string()],
        }
    }
}

// ============================================================================
// Upstream
// ============================================================================

/// Upstream API transport settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the YouTube Data API
    pub base_url: String,
    /// Per-request timeout, in seconds
    pub timeout_secs: u64,
    /// Retries for transient failures
    pub max_retries: u32,
    /// Outbound requests per second; 0 disables pacing
    pub requests_per_second: u32,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: YOUTUBE_API_BASE_URL.to_string(),
            timeout_secs: 10,
            max_retries: 2,
            requests_per_second: 10,
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

impl AppConfig {
    /// Load configuration from all layers
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };

        match dotenv::dotenv() {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(Error::config(format!("Failed to load .env file: {e}"))),
        }

        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML config file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Parse YAML config content
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Override values from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_lookup(|key| std::env::var(key).ok())
    }

    /// Override values from an arbitrary variable lookup.
    ///
    /// Empty values count as unset.
    pub fn apply_lookup<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).none_if_empty();

        if let Some(port) = parse_var(&get, "PORT")? {
            self.port = port;
        }
        if let Some(id) = get("GOOGLE_CLIENT_ID") {
            self.google.client_id = Some(id);
        }
        if let Some(secret) = get("GOOGLE_CLIENT_SECRET") {
            self.google.client_secret = Some(Secret::new(secret));
        }
        if let Some(uri) = get("GOOGLE_REDIRECT_URI") {
            self.google.redirect_uri = Some(uri);
        }
        if let Some(url) = get("GOOGLE_AUTH_URL") {
            self.google.auth_url = url;
        }
        if let Some(url) = get("GOOGLE_TOKEN_URL") {
            self.google.token_url = url;
        }
        if let Some(scopes) = get("OAUTH_SCOPES") {
            self.google.scopes = split_list(&scopes, char::is_whitespace);
        }
        if let Some(url) = get("FRONTEND_REDIRECT_URL") {
            self.frontend_redirect_url = Some(url);
        }
        if let Some(url) = get("YOUTUBE_API_BASE_URL") {
            self.upstream.base_url = url;
        }
        if let Some(n) = parse_var(&get, "DEFAULT_MAX_RESULTS")? {
            self.default_max_results = n;
        }
        if let Some(secs) = parse_var(&get, "REQUEST_TIMEOUT_SECS")? {
            self.request_timeout_secs = secs;
        }
        if let Some(origins) = get("CORS_ALLOWED_ORIGINS") {
            self.cors_allowed_origins = split_list(&origins, |c| c == ',');
        }

        Ok(())
    }

    /// Reject values the relay cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 {
            return Err(Error::invalid_value(
                "request_timeout_secs",
                "must be greater than zero",
            ));
        }
        if self.upstream.timeout_secs == 0 {
            return Err(Error::invalid_value(
                "upstream.timeout_secs",
                "must be greater than zero",
            ));
        }
        url::Url::parse(&self.upstream.base_url)?;
        if let Some(url) = &self.frontend_redirect_url {
            url::Url::parse(url)?;
        }
        Ok(())
    }

    /// OAuth settings that are still missing
    pub fn missing_oauth_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.google.client_id.is_none() {
            missing.push("GOOGLE_CLIENT_ID");
        }
        if self.google.client_secret.is_none() {
            missing.push("GOOGLE_CLIENT_SECRET");
        }
        if self.google.redirect_uri.is_none() {
            missing.push("GOOGLE_REDIRECT_URI");
        }
        missing
    }

    /// OAuth client registration, if fully configured
    pub fn oauth_client(&self) -> Result<OAuthClientConfig> {
        if let Some(field) = self.missing_oauth_fields().first() {
            return Err(Error::missing_field(*field));
        }
        let google = &self.google;
        Ok(OAuthClientConfig {
            client_id: google.client_id.clone().unwrap_or_default(),
            client_secret: google.client_secret.clone().unwrap_or_else(|| Secret::new("")),
            redirect_uri: google.redirect_uri.clone().unwrap_or_default(),
            auth_url: google.auth_url.clone(),
            token_url: google.token_url.clone(),
            scopes: google.scopes.clone(),
            timeout: Duration::from_secs(self.upstream.timeout_secs),
        })
    }

    /// Wall-clock budget for one comments request
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Transport settings for the upstream API
    pub fn http_client_config(&self) -> HttpClientConfig {
        let builder = HttpClientConfig::builder()
            .base_url(self.upstream.base_url.clone())
            .timeout(Duration::from_secs(self.upstream.timeout_secs))
            .max_retries(self.upstream.max_retries);

        if self.upstream.requests_per_second == 0 {
            builder.no_rate_limit().build()
        } else {
            let rps = self.upstream.requests_per_second;
            builder.rate_limit(RateLimiterConfig::new(rps, rps)).build()
        }
    }
}

/// Parse an optional variable, naming it in the error
fn parse_var<T, G>(get: &G, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    get(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| Error::invalid_value(key, format!("'{raw}': {e}")))
        })
        .transpose()
}

fn split_list(raw: &str, separator: impl Fn(char) -> bool) -> Vec<String> {
    raw.split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
