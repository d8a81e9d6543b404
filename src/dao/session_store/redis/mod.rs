//! Redis-backed session store, the shared-cache backend used in production.

mod config;
mod error;
mod store;

pub use config::RedisConfig;
pub use error::{RedisDaoError, RedisResult};
pub use store::RedisSessionStore;
