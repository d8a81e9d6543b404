//! Google OAuth2 implementation of [`AuthProvider`].

use futures::future::BoxFuture;
use reqwest::{Client, Url};

use crate::config::OauthConfig;

use super::{AuthError, AuthProvider, AuthResult, TokenSet};

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const SCOPES: &str = "openid email profile https://www.googleapis.com/auth/youtube.force-ssl";

/// [`AuthProvider`] backed by Google's OAuth2 endpoints.
#[derive(Debug, Clone)]
pub struct GoogleProvider {
    http: Client,
    config: OauthConfig,
}

impl GoogleProvider {
    /// Build a provider from the configured OAuth client settings.
    pub fn new(http: Client, config: OauthConfig) -> Self {
        Self { http, config }
    }

    async fn exchange(&self, params: &[(&str, &str)]) -> AuthResult<TokenSet> {
        let response = self
            .http
            .post(TOKEN_URL)
            .form(params)
            .send()
            .await
            .map_err(AuthError::RequestSend)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Status { status });
        }

        response.json::<TokenSet>().await.map_err(AuthError::Decode)
    }
}

impl AuthProvider for GoogleProvider {
    fn begin_login(&self, state: &str) -> String {
        // parse_with_params only fails on a malformed base URL, which is a
        // compile-time constant here.
        Url::parse_with_params(
            AUTHORIZE_URL,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", SCOPES),
                ("access_type", "offline"),
                ("state", state),
            ],
        )
        .map(String::from)
        .unwrap_or_else(|_| AUTHORIZE_URL.to_string())
    }

    fn handle_callback<'a>(&'a self, code: &'a str) -> BoxFuture<'a, AuthResult<TokenSet>> {
        Box::pin(async move {
            self.exchange(&[
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .await
        })
    }

    fn refresh_token<'a>(&'a self, refresh_token: &'a str) -> BoxFuture<'a, AuthResult<TokenSet>> {
        Box::pin(async move {
            self.exchange(&[
                ("refresh_token", refresh_token),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> GoogleProvider {
        GoogleProvider::new(
            Client::new(),
            OauthConfig {
                client_id: "client-123".to_string(),
                client_secret: "secret".to_string(),
                redirect_uri: "http://localhost:5000/auth/callback".to_string(),
            },
        )
    }

    #[test]
    fn authorize_url_carries_client_and_state() {
        let url = provider().begin_login("nonce-42");
        assert!(url.starts_with(AUTHORIZE_URL));
        assert!(url.contains("client_id=client-123"));
        assert!(url.contains("state=nonce-42"));
        assert!(url.contains("response_type=code"));
        // The redirect URI must be percent-encoded.
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A5000%2Fauth%2Fcallback"));
    }
}
