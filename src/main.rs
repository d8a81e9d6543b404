//! Vidgate Back binary entrypoint wiring the HTTP API, OAuth flow, and
//! cache-backed session layer.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
};
use tokio::net::TcpListener;
use tokio::time::sleep;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod auth;
mod color;
mod config;
mod dao;
mod dto;
mod error;
mod routes;
mod services;
mod state;

use config::AppConfig;
use dao::session_store::memory::MemorySessionStore;
use state::{AppState, SharedState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::from_env();
    let port = config.port;

    let app_state = AppState::new(config)?;

    // The router only needs the shared handle; the supervisor fills in the
    // session store slot behind it.
    tokio::spawn(run_cache_supervisor(app_state.clone()));
    let app = build_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Pick and supervise the session store backend.
///
/// With a cache endpoint configured (and the `redis-store` feature on) this
/// keeps retrying Redis in the background and toggles degraded mode when
/// connectivity changes; otherwise the in-memory store is installed once.
async fn run_cache_supervisor(state: SharedState) {
    #[cfg(feature = "redis-store")]
    if let Some(redis_config) =
        dao::session_store::redis::RedisConfig::from_app_config(state.config())
    {
        run_redis_supervisor(state, redis_config).await;
        return;
    }

    #[cfg(not(feature = "redis-store"))]
    if state.config().cache_endpoint.is_some() {
        warn!("cache endpoint configured but the redis-store feature is off; using memory store");
    }

    info!("using the in-memory session store");
    state
        .install_session_store(Arc::new(MemorySessionStore::new()))
        .await;
}

#[cfg(feature = "redis-store")]
/// Keep a Redis session store installed: probe it while it is up, uninstall
/// it the moment a ping fails, and reconnect with capped exponential backoff.
async fn run_redis_supervisor(state: SharedState, config: dao::session_store::redis::RedisConfig) {
    use dao::session_store::redis::RedisSessionStore;

    let initial_delay_ms = 1000;
    let mut delay = Duration::from_millis(initial_delay_ms);
    let max_delay = Duration::from_secs(10);

    loop {
        if let Some(store) = state.session_store().await {
            match store.health_check().await {
                Ok(_) => {
                    // Ping answered; idle until the next probe and start
                    // future backoff from the smallest interval again.
                    delay = Duration::from_millis(initial_delay_ms);
                    sleep(Duration::from_secs(5)).await;
                }
                Err(err) => {
                    // Uninstall the broken store so requests fail fast in
                    // degraded mode instead of timing out against Redis.
                    warn!(error = %err, "session store ping failed; entering degraded mode");
                    state.clear_session_store().await;
                    sleep(delay).await;
                    delay = (delay * 2).min(max_delay);
                }
            }
            continue;
        }

        match RedisSessionStore::connect(config.clone()).await {
            Ok(store) => {
                // connect() already pinged, so the store is known good here.
                info!("connected to Redis; leaving degraded mode");
                state.install_session_store(Arc::new(store)).await;
                delay = Duration::from_millis(initial_delay_ms);
            }
            Err(err) => {
                // Still unreachable; widen the retry interval up to the cap.
                warn!(error = %err, "Redis connection attempt failed");
                sleep(delay).await;
                delay = (delay * 2).min(max_delay);
            }
        }
    }
}

/// Assemble the full router with CORS and request tracing layered on top.
fn build_router(state: SharedState) -> Router<()> {
    let cors = cors_layer(&state.config().cors_origin);
    routes::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// CORS restricted to the configured frontend origin, GET/POST with
/// credentials.
fn cors_layer(origin: &str) -> CorsLayer {
    match origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(true),
        Err(_) => {
            warn!(%origin, "invalid CORS origin; falling back to a permissive layer");
            CorsLayer::permissive()
        }
    }
}

/// Install the fmt subscriber behind an env-driven filter.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Resolve once Ctrl+C or SIGTERM arrives, letting axum drain in-flight
/// requests.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
