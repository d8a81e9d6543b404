//! Central application state shared by every request handler.

use std::{sync::Arc, time::Instant};

use anyhow::Context;
use dashmap::DashMap;
use reqwest::Client;
use tokio::sync::RwLock;

use crate::{
    auth::{AuthProvider, GoogleProvider},
    color::{PaletteExtractor, VibrantExtractor},
    config::AppConfig,
    dao::session::SessionStore,
    error::ServiceError,
    services::video_service::PlatformClient,
};

/// Cheaply clonable handle to the application state.
pub type SharedState = Arc<AppState>;

/// Configuration, external clients, and the session store handle.
///
/// The session store slot starts empty; the application runs in degraded
/// mode until the cache supervisor installs a backend.
pub struct AppState {
    config: AppConfig,
    http: Client,
    session_store: RwLock<Option<Arc<dyn SessionStore>>>,
    extractor: Arc<dyn PaletteExtractor>,
    auth_provider: Option<Arc<dyn AuthProvider>>,
    platform: PlatformClient,
    login_states: DashMap<String, Instant>,
}

impl AppState {
    /// Construct the state wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(config: AppConfig) -> anyhow::Result<SharedState> {
        let http = Client::builder().build().context("building HTTP client")?;

        let auth_provider = config.oauth.clone().map(|oauth| {
            Arc::new(GoogleProvider::new(http.clone(), oauth)) as Arc<dyn AuthProvider>
        });
        let platform = PlatformClient::new(http.clone(), &config.video_api_base);

        Ok(Arc::new(Self {
            config,
            http,
            session_store: RwLock::new(None),
            extractor: Arc::new(VibrantExtractor),
            auth_provider,
            platform,
            login_states: DashMap::new(),
        }))
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Shared HTTP client used for outbound requests.
    pub fn http(&self) -> &Client {
        &self.http
    }

    /// Palette extractor used by the thumbnail pipeline.
    pub fn extractor(&self) -> &dyn PaletteExtractor {
        self.extractor.as_ref()
    }

    /// Configured OAuth provider, if any.
    pub fn auth_provider(&self) -> Option<Arc<dyn AuthProvider>> {
        self.auth_provider.clone()
    }

    /// Client for the external video-platform API.
    pub fn platform(&self) -> &PlatformClient {
        &self.platform
    }

    /// Pending login attempts keyed by their state nonce.
    pub fn login_states(&self) -> &DashMap<String, Instant> {
        &self.login_states
    }

    /// Obtain a handle to the current session store, if one is installed.
    pub async fn session_store(&self) -> Option<Arc<dyn SessionStore>> {
        let guard = self.session_store.read().await;
        guard.as_ref().cloned()
    }

    /// Session store handle, or a degraded-mode error when none is
    /// installed.
    pub async fn require_session_store(&self) -> Result<Arc<dyn SessionStore>, ServiceError> {
        self.session_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a session store implementation and leave degraded mode.
    pub async fn install_session_store(&self, store: Arc<dyn SessionStore>) {
        let mut guard = self.session_store.write().await;
        *guard = Some(store);
    }

    /// Remove the current session store and enter degraded mode.
    pub async fn clear_session_store(&self) {
        let mut guard = self.session_store.write().await;
        guard.take();
    }

    /// Variant of [`AppState::new`] taking an explicit provider, for tests
    /// that stub the OAuth exchange.
    #[cfg(test)]
    pub(crate) fn with_auth_provider(
        config: AppConfig,
        auth_provider: Arc<dyn AuthProvider>,
    ) -> SharedState {
        let http = Client::new();
        let platform = PlatformClient::new(http.clone(), &config.video_api_base);
        Arc::new(Self {
            config,
            http,
            session_store: RwLock::new(None),
            extractor: Arc::new(VibrantExtractor),
            auth_provider: Some(auth_provider),
            platform,
            login_states: DashMap::new(),
        })
    }
}
