/// In-memory session store used when no cache endpoint is configured.
pub mod memory;
#[cfg(feature = "redis-store")]
/// Redis-backed session store.
pub mod redis;
