//! In-memory session store backed by a concurrent map.
//!
//! Entries expire lazily: an expired record is dropped on the next `get`.
//! Suitable for development and single-instance deployments; a shared cache
//! backend is required for anything that scales horizontally.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use futures::future::BoxFuture;
use std::sync::Arc;

use crate::dao::session::{SessionRecord, SessionStore, StorageResult};

#[derive(Debug, Clone, Default)]
/// Process-local [`SessionStore`] implementation.
pub struct MemorySessionStore {
    entries: Arc<DashMap<String, (SessionRecord, Instant)>>,
}

impl MemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn put(&self, record: SessionRecord, ttl: Duration) -> BoxFuture<'static, StorageResult<()>> {
        let entries = Arc::clone(&self.entries);
        Box::pin(async move {
            let deadline = Instant::now() + ttl;
            entries.insert(record.id.clone(), (record, deadline));
            Ok(())
        })
    }

    fn get(&self, id: &str) -> BoxFuture<'static, StorageResult<Option<SessionRecord>>> {
        let entries = Arc::clone(&self.entries);
        let id = id.to_string();
        Box::pin(async move {
            let expired = match entries.get(&id) {
                Some(entry) if entry.1 > Instant::now() => return Ok(Some(entry.0.clone())),
                Some(_) => true,
                None => false,
            };
            if expired {
                entries.remove(&id);
            }
            Ok(None)
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'static, StorageResult<()>> {
        let entries = Arc::clone(&self.entries);
        let id = id.to_string();
        Box::pin(async move {
            entries.remove(&id);
            Ok(())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> SessionRecord {
        SessionRecord::new(id.to_string(), "token".to_string(), None)
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let store = MemorySessionStore::new();
        store
            .put(record("abc"), Duration::from_secs(60))
            .await
            .unwrap();

        let found = store.get("abc").await.unwrap().unwrap();
        assert_eq!(found.access_token, "token");
    }

    #[tokio::test]
    async fn expired_sessions_read_as_absent() {
        let store = MemorySessionStore::new();
        store.put(record("abc"), Duration::ZERO).await.unwrap();

        assert!(store.get("abc").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = MemorySessionStore::new();
        store
            .put(record("abc"), Duration::from_secs(60))
            .await
            .unwrap();

        store.delete("abc").await.unwrap();
        store.delete("abc").await.unwrap();
        assert!(store.get("abc").await.unwrap().is_none());
    }
}
