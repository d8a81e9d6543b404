use serde::Serialize;
use utoipa::ToSchema;

/// Reachability of the session cache backend.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CacheHealth {
    /// A backend is installed and answered the last ping.
    Reachable,
    /// A backend is installed but the last ping failed.
    Unreachable,
    /// No backend installed yet; the service runs degraded.
    Uninstalled,
}

/// Payload returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Overall status: "ok", or "degraded" while no session store is
    /// installed.
    pub status: String,
    /// Where the session cache stands.
    pub cache: CacheHealth,
}

impl HealthResponse {
    /// Derive the overall status from the cache detail: only a missing
    /// backend degrades the service, a failed ping alone does not.
    pub fn new(cache: CacheHealth) -> Self {
        let status = match cache {
            CacheHealth::Uninstalled => "degraded",
            CacheHealth::Reachable | CacheHealth::Unreachable => "ok",
        };
        Self {
            status: status.to_string(),
            cache,
        }
    }
}
