//! Authentication module
//!
//! Supports: Bearer (OAuth access token) and the Google
//! authorization-code exchange that produces the bearer token.
//!
//! Credentials are always per client; nothing here is process-wide.

mod authenticator;
mod oauth;
mod types;

pub use authenticator::Authenticator;
pub use oauth::{
    GoogleOAuth, OAuthClientConfig, DEFAULT_TOKEN_TIMEOUT, GOOGLE_AUTH_URL, GOOGLE_TOKEN_URL,
    YOUTUBE_FORCE_SSL_SCOPE,
};
pub use types::{AccessToken, AuthConfig, Secret, TokenSet};
