//! Error types for the Redis storage implementation.

use thiserror::Error;

/// Convenient result alias returning [`RedisDaoError`] failures.
pub type RedisResult<T> = Result<T, RedisDaoError>;

/// Failures that can occur while interacting with Redis.
#[derive(Debug, Error)]
pub enum RedisDaoError {
    /// The configured endpoint is not a valid Redis URL.
    #[error("invalid Redis endpoint")]
    InvalidEndpoint {
        #[source]
        source: redis::RedisError,
    },
    /// Establishing the managed connection failed.
    #[error("failed to connect to Redis")]
    Connect {
        #[source]
        source: redis::RedisError,
    },
    /// A command against the store failed.
    #[error("Redis `{operation}` failed")]
    Command {
        operation: &'static str,
        #[source]
        source: redis::RedisError,
    },
    /// A session record could not be serialized for storage.
    #[error("failed to serialize session `{id}`")]
    Serialize {
        id: String,
        #[source]
        source: serde_json::Error,
    },
    /// A stored value could not be decoded into a session record.
    #[error("failed to deserialize session `{id}`")]
    Deserialize {
        id: String,
        #[source]
        source: serde_json::Error,
    },
}
