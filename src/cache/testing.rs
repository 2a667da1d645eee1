//! Cache doubles shared by unit tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::cache::{CacheClient, MemoryCache};
use crate::error::{Result, SessionError};

/// `MemoryCache` whose GET can be switched to fail while every other
/// command keeps working.
#[derive(Debug, Clone, Default)]
pub(crate) struct FlakyCache {
    pub inner: MemoryCache,
    failing_reads: Arc<AtomicBool>,
}

impl FlakyCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, failing: bool) {
        self.failing_reads.store(failing, Ordering::Release);
    }
}

#[async_trait]
impl CacheClient for FlakyCache {
    async fn ping(&self) -> Result<String> {
        self.inner.ping().await
    }

    async fn client_name(&self) -> Result<Option<String>> {
        self.inner.client_name().await
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        if self.failing_reads.load(Ordering::Acquire) {
            return Err(SessionError::Cache("read timed out".to_string()));
        }
        self.inner.get(key).await
    }

    async fn set_ex(&self, key: &str, ttl_secs: u64, value: &[u8]) -> Result<()> {
        self.inner.set_ex(key, ttl_secs, value).await
    }

    async fn del(&self, key: &str) -> Result<u64> {
        self.inner.del(key).await
    }
}
