//! Orchestration of the OAuth login flow against the configured provider.

use std::time::{Duration, Instant};

use rand::{Rng, distr::Alphanumeric};
use uuid::Uuid;

use crate::{
    auth::{AuthError, TokenSet},
    dao::session::{SESSION_TTL, SessionRecord},
    error::ServiceError,
    services::session_service,
    state::SharedState,
};

/// How long a login attempt may sit between redirect and callback.
const LOGIN_STATE_TTL: Duration = Duration::from_secs(10 * 60);
/// Length of the state nonce tying a callback to a login attempt.
const LOGIN_STATE_LEN: usize = 32;

/// Start a login: mint a state nonce and return the provider's authorize
/// URL to redirect to.
pub fn begin_login(state: &SharedState) -> Result<String, ServiceError> {
    let provider = state.auth_provider().ok_or_else(unconfigured)?;

    // Drop stale attempts so abandoned logins do not accumulate.
    let now = Instant::now();
    state
        .login_states()
        .retain(|_, issued| now.duration_since(*issued) < LOGIN_STATE_TTL);

    let nonce: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(LOGIN_STATE_LEN)
        .map(char::from)
        .collect();
    state.login_states().insert(nonce.clone(), now);

    Ok(provider.begin_login(&nonce))
}

/// Finish a login: consume the state nonce, exchange the code, persist the
/// session, and return the `Set-Cookie` value for it.
pub async fn handle_callback(
    state: &SharedState,
    code: &str,
    nonce: &str,
) -> Result<String, ServiceError> {
    let provider = state.auth_provider().ok_or_else(unconfigured)?;

    let issued = state
        .login_states()
        .remove(nonce)
        .map(|(_, issued)| issued)
        .ok_or_else(|| ServiceError::InvalidInput("Unknown login state".into()))?;
    if issued.elapsed() >= LOGIN_STATE_TTL {
        return Err(ServiceError::InvalidInput("Login state expired".into()));
    }

    let tokens = provider
        .handle_callback(code)
        .await
        .map_err(map_auth_error)?;

    let session_id = Uuid::new_v4().to_string();
    let record = SessionRecord::new(
        session_id.clone(),
        tokens.access_token,
        tokens.refresh_token,
    );

    let store = state.require_session_store().await?;
    store.put(record, SESSION_TTL).await?;

    Ok(session_service::set_cookie_header(
        &state.config().session_secret,
        &session_id,
    ))
}

/// Exchange a refresh token for a fresh token set.
pub async fn refresh(state: &SharedState, refresh_token: &str) -> Result<TokenSet, ServiceError> {
    let provider = state.auth_provider().ok_or_else(unconfigured)?;
    provider
        .refresh_token(refresh_token)
        .await
        .map_err(map_auth_error)
}

fn unconfigured() -> ServiceError {
    ServiceError::Unconfigured("OAuth provider not configured".into())
}

fn map_auth_error(err: AuthError) -> ServiceError {
    match err {
        AuthError::Status { status } if status.is_client_error() => {
            ServiceError::Unauthorized("Provider rejected the token request".into())
        }
        other => ServiceError::Upstream(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use futures::future::BoxFuture;

    use super::*;
    use crate::{
        auth::AuthProvider,
        config::AppConfig,
        dao::session_store::memory::MemorySessionStore,
        services::session_service,
        state::AppState,
    };

    struct StubProvider;

    impl AuthProvider for StubProvider {
        fn begin_login(&self, state: &str) -> String {
            format!("https://provider.test/authorize?state={state}")
        }

        fn handle_callback<'a>(
            &'a self,
            code: &'a str,
        ) -> BoxFuture<'a, crate::auth::AuthResult<TokenSet>> {
            let code = code.to_string();
            Box::pin(async move {
                if code == "good-code" {
                    Ok(token_set("access-1", Some("refresh-1")))
                } else {
                    Err(AuthError::Status {
                        status: reqwest::StatusCode::BAD_REQUEST,
                    })
                }
            })
        }

        fn refresh_token<'a>(
            &'a self,
            _refresh_token: &'a str,
        ) -> BoxFuture<'a, crate::auth::AuthResult<TokenSet>> {
            Box::pin(async { Ok(token_set("access-2", None)) })
        }
    }

    fn token_set(access: &str, refresh: Option<&str>) -> TokenSet {
        TokenSet {
            access_token: access.to_string(),
            refresh_token: refresh.map(str::to_string),
            expires_in: Some(3600),
            token_type: Some("Bearer".to_string()),
            scope: None,
        }
    }

    fn test_config() -> AppConfig {
        AppConfig {
            port: 0,
            session_secret: "test-secret".to_string(),
            cors_origin: "http://localhost:5173".to_string(),
            cache_endpoint: None,
            cache_credentials: None,
            video_api_base: "http://platform.test".to_string(),
            oauth: None,
            fetch_timeout: Duration::from_secs(1),
        }
    }

    async fn test_state() -> SharedState {
        let state = AppState::with_auth_provider(test_config(), Arc::new(StubProvider));
        state
            .install_session_store(Arc::new(MemorySessionStore::new()))
            .await;
        state
    }

    fn nonce_from_url(url: &str) -> String {
        url.rsplit_once("state=").unwrap().1.to_string()
    }

    #[tokio::test]
    async fn login_then_callback_creates_a_session() {
        let state = test_state().await;

        let url = begin_login(&state).unwrap();
        let nonce = nonce_from_url(&url);

        let set_cookie = handle_callback(&state, "good-code", &nonce).await.unwrap();
        assert!(set_cookie.starts_with("vg_session="));

        let value = set_cookie
            .split(';')
            .next()
            .unwrap()
            .split_once('=')
            .unwrap()
            .1;
        let session_id = session_service::verify_cookie_value("test-secret", value).unwrap();

        let store = state.session_store().await.unwrap();
        let record = store.get(session_id).await.unwrap().unwrap();
        assert_eq!(record.access_token, "access-1");
        assert_eq!(record.refresh_token.as_deref(), Some("refresh-1"));
    }

    #[tokio::test]
    async fn callback_rejects_an_unknown_nonce() {
        let state = test_state().await;
        let err = handle_callback(&state, "good-code", "never-issued")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn nonce_is_single_use() {
        let state = test_state().await;
        let nonce = nonce_from_url(&begin_login(&state).unwrap());

        handle_callback(&state, "good-code", &nonce).await.unwrap();
        let err = handle_callback(&state, "good-code", &nonce)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn rejected_exchange_maps_to_unauthorized() {
        let state = test_state().await;
        let nonce = nonce_from_url(&begin_login(&state).unwrap());

        let err = handle_callback(&state, "bad-code", &nonce).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn refresh_returns_the_provider_tokens() {
        let state = test_state().await;
        let tokens = refresh(&state, "refresh-1").await.unwrap();
        assert_eq!(tokens.access_token, "access-2");
    }
}
