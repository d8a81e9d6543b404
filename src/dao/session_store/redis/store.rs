use std::time::Duration;

use futures::future::BoxFuture;
use redis::{AsyncCommands, Client, aio::ConnectionManager};

use crate::dao::session::{SessionRecord, SessionStore, StorageError, StorageResult};

use super::{
    config::RedisConfig,
    error::{RedisDaoError, RedisResult},
};

/// Namespace prefix for session keys.
const KEY_PREFIX: &str = "session:";

#[derive(Clone)]
/// [`SessionStore`] implementation backed by a managed Redis connection.
///
/// The connection manager reconnects on its own; commands issued while the
/// link is down fail fast and surface as storage errors.
pub struct RedisSessionStore {
    manager: ConnectionManager,
}

impl RedisSessionStore {
    /// Establish a managed connection to Redis and verify it with a ping.
    pub async fn connect(config: RedisConfig) -> RedisResult<Self> {
        let client = Client::open(config.connection_url())
            .map_err(|source| RedisDaoError::InvalidEndpoint { source })?;
        let manager = ConnectionManager::new(client)
            .await
            .map_err(|source| RedisDaoError::Connect { source })?;

        let store = Self { manager };
        store.ping().await?;
        Ok(store)
    }

    async fn ping(&self) -> RedisResult<()> {
        let mut conn = self.manager.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|source| RedisDaoError::Command {
                operation: "PING",
                source,
            })?;
        Ok(())
    }

    fn key(id: &str) -> String {
        format!("{KEY_PREFIX}{id}")
    }

    async fn put_inner(
        mut conn: ConnectionManager,
        record: SessionRecord,
        ttl: Duration,
    ) -> RedisResult<()> {
        let payload =
            serde_json::to_string(&record).map_err(|source| RedisDaoError::Serialize {
                id: record.id.clone(),
                source,
            })?;
        let _: () = conn
            .set_ex(Self::key(&record.id), payload, ttl.as_secs().max(1))
            .await
            .map_err(|source| RedisDaoError::Command {
                operation: "SETEX",
                source,
            })?;
        Ok(())
    }

    async fn get_inner(
        mut conn: ConnectionManager,
        id: String,
    ) -> RedisResult<Option<SessionRecord>> {
        let payload: Option<String> =
            conn.get(Self::key(&id))
                .await
                .map_err(|source| RedisDaoError::Command {
                    operation: "GET",
                    source,
                })?;

        payload
            .map(|value| {
                serde_json::from_str(&value).map_err(|source| RedisDaoError::Deserialize {
                    id: id.clone(),
                    source,
                })
            })
            .transpose()
    }

    async fn delete_inner(mut conn: ConnectionManager, id: String) -> RedisResult<()> {
        let _: () = conn
            .del(Self::key(&id))
            .await
            .map_err(|source| RedisDaoError::Command {
                operation: "DEL",
                source,
            })?;
        Ok(())
    }
}

fn storage_error(err: RedisDaoError) -> StorageError {
    StorageError::unavailable(err.to_string(), err)
}

impl SessionStore for RedisSessionStore {
    fn put(&self, record: SessionRecord, ttl: Duration) -> BoxFuture<'static, StorageResult<()>> {
        let conn = self.manager.clone();
        Box::pin(async move {
            Self::put_inner(conn, record, ttl)
                .await
                .map_err(storage_error)
        })
    }

    fn get(&self, id: &str) -> BoxFuture<'static, StorageResult<Option<SessionRecord>>> {
        let conn = self.manager.clone();
        let id = id.to_string();
        Box::pin(async move { Self::get_inner(conn, id).await.map_err(storage_error) })
    }

    fn delete(&self, id: &str) -> BoxFuture<'static, StorageResult<()>> {
        let conn = self.manager.clone();
        let id = id.to_string();
        Box::pin(async move { Self::delete_inner(conn, id).await.map_err(storage_error) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ping().await.map_err(storage_error) })
    }
}
