//! Session entity and the storage abstraction the cache backends implement.

use std::{error::Error, time::Duration};

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// How long a session lives in the store before it expires.
pub const SESSION_TTL: Duration = Duration::from_secs(60 * 60 * 24);

/// Result alias for session storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by session stores regardless of the underlying backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("session store unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }
}

/// One authenticated session, keyed by its random identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionRecord {
    /// Random session identifier carried (signed) by the cookie.
    pub id: String,
    /// Access token obtained from the OAuth provider.
    pub access_token: String,
    /// Refresh token, when the provider issued one.
    pub refresh_token: Option<String>,
    /// RFC3339 creation timestamp.
    pub created_at: String,
}

impl SessionRecord {
    /// Build a record stamped with the current time.
    pub fn new(id: String, access_token: String, refresh_token: Option<String>) -> Self {
        let created_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_else(|_| "invalid-timestamp".into());
        Self {
            id,
            access_token,
            refresh_token,
            created_at,
        }
    }
}

/// Abstraction over the cache layer holding session state.
pub trait SessionStore: Send + Sync {
    /// Store a session for `ttl`, replacing any record under the same id.
    fn put(&self, record: SessionRecord, ttl: Duration) -> BoxFuture<'static, StorageResult<()>>;
    /// Fetch a session by id; expired sessions read as absent.
    fn get(&self, id: &str) -> BoxFuture<'static, StorageResult<Option<SessionRecord>>>;
    /// Drop a session by id. Deleting an absent session is not an error.
    fn delete(&self, id: &str) -> BoxFuture<'static, StorageResult<()>>;
    /// Verify the backend is reachable.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}
