//! Pluggable OAuth provider capability.
//!
//! The routes only depend on [`AuthProvider`], so alternate providers can be
//! substituted without touching the rest of the service.

mod google;

use futures::future::BoxFuture;
use serde::Deserialize;
use thiserror::Error;

pub use google::GoogleProvider;

/// Result alias for provider operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Failures raised while talking to the OAuth provider.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token request could not be sent.
    #[error("failed to reach the OAuth provider")]
    RequestSend(#[source] reqwest::Error),
    /// The provider answered with a non-success status.
    #[error("OAuth provider answered {status}")]
    Status {
        /// HTTP status returned by the token endpoint.
        status: reqwest::StatusCode,
    },
    /// The token response could not be decoded.
    #[error("failed to decode OAuth token response")]
    Decode(#[source] reqwest::Error),
}

/// Tokens issued by the provider after a code exchange or refresh.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenSet {
    /// Short-lived access token for the platform API.
    pub access_token: String,
    /// Long-lived refresh token; absent on refresh responses.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Seconds until the access token expires.
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Token type, typically `Bearer`.
    #[serde(default)]
    pub token_type: Option<String>,
    /// Space-separated scopes granted.
    #[serde(default)]
    pub scope: Option<String>,
}

/// OAuth flow as seen by the HTTP layer: start a login, finish it with the
/// provider's code, refresh an expired token.
pub trait AuthProvider: Send + Sync {
    /// Authorize URL the client is redirected to, carrying `state` so the
    /// callback can be tied back to this login attempt.
    fn begin_login(&self, state: &str) -> String;

    /// Exchange the authorization code for a token set.
    fn handle_callback<'a>(&'a self, code: &'a str) -> BoxFuture<'a, AuthResult<TokenSet>>;

    /// Obtain a fresh access token from a refresh token.
    fn refresh_token<'a>(&'a self, refresh_token: &'a str) -> BoxFuture<'a, AuthResult<TokenSet>>;
}
