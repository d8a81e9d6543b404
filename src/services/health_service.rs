use tracing::warn;

use crate::{
    dto::health::{CacheHealth, HealthResponse},
    state::SharedState,
};

/// Ping the session cache and fold the result into the health payload.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let cache = match state.session_store().await {
        Some(store) => match store.health_check().await {
            Ok(()) => CacheHealth::Reachable,
            Err(err) => {
                warn!(error = %err, "session store ping failed");
                CacheHealth::Unreachable
            }
        },
        None => {
            warn!("no session store installed (degraded mode)");
            CacheHealth::Uninstalled
        }
    };

    HealthResponse::new(cache)
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use super::*;
    use crate::{
        config::AppConfig, dao::session_store::memory::MemorySessionStore, state::AppState,
    };

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

    #[tokio::test]
    async fn degraded_until_a_store_is_installed() {
        let state = AppState::new(test_config()).unwrap();

        let health = health_status(&state).await;
        assert_eq!(health.status, "degraded");
        assert!(matches!(health.cache, CacheHealth::Uninstalled));

        state
            .install_session_store(Arc::new(MemorySessionStore::new()))
            .await;

        let health = health_status(&state).await;
        assert_eq!(health.status, "ok");
        assert!(matches!(health.cache, CacheHealth::Reachable));
    }
}
