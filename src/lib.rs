//! Redis Sessions - cookie-addressed HTTP sessions stored in a Redis-compatible cache
//!
//! A signed (optionally encrypted) cookie carries the session ID; the
//! session values live in the cache under a prefixed key with a TTL.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheClient, MemoryCache, RedisClient};
pub use config::Config;
pub use error::{CodecError, Result, SessionError};
pub use session::middleware::{session_middleware, Sessions};
pub use session::{Loaded, Registry, Session, SessionOptions, SessionStore};
pub use tasks::spawn_cleanup_task;
