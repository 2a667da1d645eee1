//! In-process cache client.
//!
//! Speaks the same command set as [`RedisClient`](crate::cache::RedisClient)
//! against a [`MemoryStore`] shared behind a `RwLock`. Used for tests and
//! for running the demo server without a Redis instance.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::{CacheClient, MemoryStore, PONG};
use crate::error::{Result, SessionError};

/// Shared, cloneable in-memory cache.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    store: Arc<RwLock<MemoryStore>>,
    closed: Arc<AtomicBool>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the underlying key space.
    pub fn store(&self) -> Arc<RwLock<MemoryStore>> {
        Arc::clone(&self.store)
    }

    /// Removes expired keys, returning how many were dropped.
    pub async fn cleanup_expired(&self) -> usize {
        self.store.write().await.cleanup_expired()
    }

    /// Remaining TTL in seconds for a live key.
    pub async fn ttl(&self, key: &str) -> Option<u64> {
        self.store.read().await.ttl(key)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(SessionError::Cache("cache client is closed".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheClient for MemoryCache {
    async fn ping(&self) -> Result<String> {
        self.ensure_open()?;
        Ok(PONG.to_string())
    }

    async fn client_name(&self) -> Result<Option<String>> {
        self.ensure_open()?;
        Ok(None)
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.ensure_open()?;
        // Write lock: reads drop expired keys.
        Ok(self.store.write().await.get(key))
    }

    async fn set_ex(&self, key: &str, ttl_secs: u64, value: &[u8]) -> Result<()> {
        self.ensure_open()?;
        self.store.write().await.set_ex(key, ttl_secs, value)
    }

    async fn del(&self, key: &str) -> Result<u64> {
        self.ensure_open()?;
        Ok(self.store.write().await.del(key))
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}
