use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::TokenSet;

/// Query parameters the OAuth provider appends to the callback redirect.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code to exchange for tokens.
    pub code: Option<String>,
    /// State nonce issued by `/auth/login`.
    pub state: Option<String>,
}

/// Body of the token refresh endpoint.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RefreshTokenRequest {
    /// Refresh token previously issued by the provider.
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

/// Tokens returned to the client after a refresh.
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// Fresh access token.
    #[serde(rename = "accessToken")]
    pub access_token: String,
    /// Replacement refresh token, when the provider rotated it.
    #[serde(rename = "refreshToken", skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Seconds until the access token expires.
    #[serde(rename = "expiresIn", skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
}

impl From<TokenSet> for TokenResponse {
    fn from(tokens: TokenSet) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
        }
    }
}
