//! Application-level configuration, resolved once at startup from the
//! environment instead of module-level globals.

use std::{env, time::Duration};

use tracing::{info, warn};

/// Default port the HTTP server binds to.
const DEFAULT_PORT: u16 = 5000;
/// Default frontend origin allowed by CORS.
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
/// Default base URL of the external video-platform API.
const DEFAULT_VIDEO_API_BASE: &str = "https://www.googleapis.com/youtube/v3";
/// Default bound on the thumbnail fetch.
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Immutable runtime configuration shared across the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port the server listens on.
    pub port: u16,
    /// Secret used to sign session cookies.
    pub session_secret: String,
    /// Frontend origin allowed by CORS and targeted by the OAuth callback
    /// redirect.
    pub cors_origin: String,
    /// Cache store endpoint (e.g. `redis://host:6379`). Sessions fall back
    /// to the in-memory store when unset.
    pub cache_endpoint: Option<String>,
    /// Optional credentials for the cache store.
    pub cache_credentials: Option<CacheCredentials>,
    /// Base URL requests to the video platform are forwarded to.
    pub video_api_base: String,
    /// OAuth client settings; auth routes answer 503 when unset.
    pub oauth: Option<OauthConfig>,
    /// Upper bound on the remote image fetch.
    pub fetch_timeout: Duration,
}

/// Username/password pair for the cache store.
#[derive(Debug, Clone)]
pub struct CacheCredentials {
    /// Account name; empty when the store only checks passwords.
    pub username: String,
    /// Account password.
    pub password: String,
}

/// Settings for the external OAuth provider.
#[derive(Debug, Clone)]
pub struct OauthConfig {
    /// OAuth client identifier.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: String,
    /// Redirect URI registered with the provider, pointing at `/auth/callback`.
    pub redirect_uri: String,
}

impl AppConfig {
    /// Resolve the configuration from environment variables, falling back to
    /// development defaults with a warning where a value is security
    /// sensitive.
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let session_secret = match env::var("SESSION_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                warn!("SESSION_SECRET not set; using a random per-process secret");
                random_secret()
            }
        };

        let cors_origin =
            env::var("CORS_ORIGIN").unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.to_string());

        let cache_endpoint = env::var("CACHE_ENDPOINT")
            .or_else(|_| env::var("REDIS_URL"))
            .ok()
            .filter(|value| !value.is_empty());
        let cache_credentials = env::var("CACHE_PASSWORD")
            .ok()
            .map(|password| CacheCredentials {
                username: env::var("CACHE_USERNAME").unwrap_or_default(),
                password,
            });

        let video_api_base = env::var("VIDEO_API_BASE")
            .unwrap_or_else(|_| DEFAULT_VIDEO_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let oauth = OauthConfig::from_env();
        if oauth.is_none() {
            warn!("OAuth client not configured; auth routes will answer 503");
        }

        let fetch_timeout = env::var("FETCH_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS));

        let config = Self {
            port,
            session_secret,
            cors_origin,
            cache_endpoint,
            cache_credentials,
            video_api_base,
            oauth,
            fetch_timeout,
        };
        info!(
            port = config.port,
            cors_origin = %config.cors_origin,
            cache = config.cache_endpoint.is_some(),
            oauth = config.oauth.is_some(),
            "configuration resolved"
        );
        config
    }
}

impl OauthConfig {
    /// Read the OAuth client settings, returning `None` unless all three are
    /// present.
    fn from_env() -> Option<Self> {
        let client_id = env::var("OAUTH_CLIENT_ID").ok()?;
        let client_secret = env::var("OAUTH_CLIENT_SECRET").ok()?;
        let redirect_uri = env::var("OAUTH_REDIRECT_URI").ok()?;
        Some(Self {
            client_id,
            client_secret,
            redirect_uri,
        })
    }
}

/// Generate a throwaway secret for development runs.
fn random_secret() -> String {
    use rand::{Rng, distr::Alphanumeric};

    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(48)
        .map(char::from)
        .collect()
}
