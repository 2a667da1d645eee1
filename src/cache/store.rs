//! Memory Store Module
//!
//! HashMap-backed key space with per-key expiry and Redis command semantics.

use std::collections::HashMap;

use crate::cache::{CacheEntry, MAX_VALUE_SIZE};
use crate::error::{Result, SessionError};

// == Memory Store ==
/// Key space behind [`MemoryCache`](crate::cache::MemoryCache).
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Set With Expiry ==
    /// Stores `value` under `key` for `ttl` seconds, replacing any existing entry.
    ///
    /// A zero TTL is rejected the way Redis rejects `SETEX key 0 value`.
    pub fn set_ex(&mut self, key: &str, ttl: u64, value: &[u8]) -> Result<()> {
        if ttl == 0 {
            return Err(SessionError::Cache(
                "invalid expire time in 'setex' command".to_string(),
            ));
        }

        if value.len() > MAX_VALUE_SIZE {
            return Err(SessionError::Cache(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            )));
        }

        self.entries
            .insert(key.to_string(), CacheEntry::new(value.to_vec(), ttl));
        Ok(())
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Expired entries are removed and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<Vec<u8>> {
        match self.entries.get(key) {
            Some(entry) if entry.is_expired() => {
                self.entries.remove(key);
                None
            }
            Some(entry) => Some(entry.value.clone()),
            None => None,
        }
    }

    // == Delete ==
    /// Removes an entry by key, returning how many entries were removed.
    pub fn del(&mut self, key: &str) -> u64 {
        match self.entries.remove(key) {
            Some(entry) if !entry.is_expired() => 1,
            _ => 0,
        }
    }

    // == TTL ==
    /// Remaining TTL in seconds for a live key.
    pub fn ttl(&self, key: &str) -> Option<u64> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(CacheEntry::ttl_remaining)
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        before - self.entries.len()
    }

    // == Length ==
    /// Returns the current number of entries, expired ones included until swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
