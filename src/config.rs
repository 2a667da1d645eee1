//! Configuration Module
//!
//! Loads demo server configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::error::SessionError;

/// Signing key used when `SESSION_KEYS` is unset. Development only.
pub const DEV_SESSION_KEY: &str = "redis-sessions-development-signing-key";

/// Which cache the session store talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Redis,
    Memory,
}

impl FromStr for CacheBackend {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "redis" => Ok(CacheBackend::Redis),
            "memory" => Ok(CacheBackend::Memory),
            other => Err(SessionError::Config(format!(
                "unknown cache backend: {}",
                other
            ))),
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// `tcp` or `unix`
    pub redis_network: String,
    pub redis_address: String,
    pub redis_password: String,
    pub redis_db: i64,
    pub redis_pool_size: usize,
    /// Hash/block key pairs, newest first
    pub session_keys: Vec<Vec<u8>>,
    /// Cookie name of the demo session
    pub session_name: String,
    pub server_port: u16,
    pub cache_backend: CacheBackend,
    /// Expiry sweep interval in seconds (memory backend only)
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `REDIS_NETWORK` - `tcp` or `unix` (default: tcp)
    /// - `REDIS_ADDRESS` - host:port or socket path (default: 127.0.0.1:6379)
    /// - `REDIS_PASSWORD` - AUTH password (default: empty)
    /// - `REDIS_DB` - logical database (default: 0)
    /// - `REDIS_POOL_SIZE` - maximum pooled connections (default: 10)
    /// - `SESSION_KEYS` - comma-separated hash/block keys (default: a dev key)
    /// - `SESSION_NAME` - session cookie name (default: session)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_BACKEND` - `redis` or `memory` (default: redis)
    /// - `CLEANUP_INTERVAL` - expiry sweep frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            redis_network: env::var("REDIS_NETWORK").unwrap_or(defaults.redis_network),
            redis_address: env::var("REDIS_ADDRESS").unwrap_or(defaults.redis_address),
            redis_password: env::var("REDIS_PASSWORD").unwrap_or(defaults.redis_password),
            redis_db: parse_var("REDIS_DB").unwrap_or(defaults.redis_db),
            redis_pool_size: parse_var("REDIS_POOL_SIZE").unwrap_or(defaults.redis_pool_size),
            session_keys: env::var("SESSION_KEYS")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(|v| parse_keys(&v))
                .unwrap_or(defaults.session_keys),
            session_name: env::var("SESSION_NAME").unwrap_or(defaults.session_name),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cache_backend: parse_var("CACHE_BACKEND").unwrap_or(defaults.cache_backend),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
        }
    }

    /// True when no keys were configured and the development key is in use.
    pub fn uses_dev_key(&self) -> bool {
        self.session_keys == [DEV_SESSION_KEY.as_bytes()]
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_network: "tcp".to_string(),
            redis_address: "127.0.0.1:6379".to_string(),
            redis_password: String::new(),
            redis_db: 0,
            redis_pool_size: 10,
            session_keys: vec![DEV_SESSION_KEY.as_bytes().to_vec()],
            session_name: "session".to_string(),
            server_port: 3000,
            cache_backend: CacheBackend::Redis,
            cleanup_interval: 1,
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Splits a comma-separated key list. Empty entries stay in place so a
/// hash key can be paired with "no block key".
fn parse_keys(raw: &str) -> Vec<Vec<u8>> {
    raw.split(',')
        .map(|k| k.trim().as_bytes().to_vec())
        .collect()
}
