//! Auth configuration types
//!
//! Credentials are carried in [`Secret`] so they never end up in logs
//! through a stray `{:?}`.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;

/// A credential string whose `Debug` output is redacted
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

/// Bearer credential presented to the upstream API
pub type AccessToken = Secret;

impl Secret {
    /// Wrap a credential
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the raw credential
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Check if the credential is empty or whitespace
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Authentication attached to upstream requests
#[derive(Debug, Clone, Default)]
pub enum AuthConfig {
    /// No authentication
    #[default]
    None,

    /// OAuth access token sent as `Authorization: Bearer`
    Bearer {
        /// The bearer token
        token: AccessToken,
    },
}

impl AuthConfig {
    /// Bearer auth from a raw token
    pub fn bearer(token: impl Into<AccessToken>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }
}

/// Tokens returned by an authorization-code exchange
#[derive(Debug, Clone)]
pub struct TokenSet {
    /// The access token
    pub access_token: AccessToken,
    /// Refresh token, present when offline access was granted
    pub refresh_token: Option<Secret>,
    /// Lifetime reported by the token endpoint, in seconds
    pub expires_in: Option<i64>,
    /// When the access token expires
    pub expires_at: Option<DateTime<Utc>>,
    /// Granted scopes (space separated)
    pub scope: Option<String>,
    /// Token type, normally "Bearer"
    pub token_type: Option<String>,
}
