//! Cache Module
//!
//! The key-value cache contract the session store persists through, plus
//! a pooled Redis client and an in-process implementation.

mod entry;
mod memory;
mod redis_client;
mod store;

#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;

use crate::error::Result;

// Re-export public types
pub use entry::CacheEntry;
pub use memory::MemoryCache;
pub use redis_client::RedisClient;
pub use store::MemoryStore;

// == Public Constants ==
/// Maximum allowed value size in bytes (matches Redis' 512 MB string limit)
pub const MAX_VALUE_SIZE: usize = 512 * 1024 * 1024;

/// Reply expected from a healthy cache on PING
pub const PONG: &str = "PONG";

// == Cache Client Trait ==
/// Commands the session store needs from a remote key-value cache.
///
/// Every call is a single round trip. Implementations backed by a pool
/// check a connection out for the duration of the call only.
#[async_trait]
pub trait CacheClient: Send + Sync {
    /// PING. A healthy server answers `"PONG"`.
    async fn ping(&self) -> Result<String>;

    /// Cheap connection liveness check issued before reads and writes.
    async fn client_name(&self) -> Result<Option<String>>;

    /// GET. `None` when the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// SETEX: store `value` under `key`, expiring after `ttl_secs`.
    async fn set_ex(&self, key: &str, ttl_secs: u64, value: &[u8]) -> Result<()>;

    /// DEL. Returns the number of keys removed; a missing key is not an error.
    async fn del(&self, key: &str) -> Result<u64>;

    /// Releases pooled connections.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
