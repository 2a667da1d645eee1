//! Redis cache client with connection pooling.
//!
//! Each command checks a connection out of a `deadpool-redis` pool and
//! hands it back when the call returns, on success and on error alike.

use async_trait::async_trait;
use deadpool_redis::{
    Config as PoolConfig, Connection, ConnectionAddr, ConnectionInfo, Pool,
    PoolConfig as PoolSize, RedisConnectionInfo, Runtime,
};
use redis::AsyncCommands;
use tracing::{debug, info};

use crate::cache::CacheClient;
use crate::error::{Result, SessionError};

/// Network used to reach the Redis server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Tcp,
    Unix,
}

impl std::str::FromStr for Network {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "" | "tcp" => Ok(Network::Tcp),
            "unix" => Ok(Network::Unix),
            other => Err(SessionError::Config(format!(
                "unsupported network '{}', expected tcp or unix",
                other
            ))),
        }
    }
}

/// Pooled Redis client.
#[derive(Clone)]
pub struct RedisClient {
    pool: Pool,
}

impl RedisClient {
    /// Builds a pool of at most `pool_size` connections.
    ///
    /// # Arguments
    /// * `network` - `"tcp"` or `"unix"`
    /// * `address` - `host:port` for tcp, a socket path for unix
    /// * `password` - empty for no AUTH
    /// * `db` - logical database selected on every connection
    pub fn connect(
        pool_size: usize,
        network: &str,
        address: &str,
        password: &str,
        db: i64,
    ) -> Result<Self> {
        let network: Network = network.parse()?;
        let info = connection_info(network, address, password, db)?;

        let mut cfg = PoolConfig::from_connection_info(info);
        cfg.pool = Some(PoolSize::new(pool_size.max(1)));

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| SessionError::Config(format!("Failed to create Redis pool: {}", e)))?;

        info!(
            network = ?network,
            address = %address,
            db = db,
            pool_size = pool_size,
            "Redis connection pool created"
        );

        Ok(Self { pool })
    }

    /// Wraps an already configured pool.
    pub fn from_pool(pool: Pool) -> Self {
        Self { pool }
    }

    /// Get the connection pool
    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    async fn conn(&self) -> Result<Connection> {
        Ok(self.pool.get().await?)
    }
}

#[async_trait]
impl CacheClient for RedisClient {
    async fn ping(&self) -> Result<String> {
        let mut conn = self.conn().await?;
        let reply: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(reply)
    }

    async fn client_name(&self) -> Result<Option<String>> {
        let mut conn = self.conn().await?;
        let name: Option<String> = redis::cmd("CLIENT")
            .arg("GETNAME")
            .query_async(&mut conn)
            .await?;
        Ok(name)
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn().await?;
        let value: Option<Vec<u8>> = conn.get(key).await?;
        Ok(value)
    }

    async fn set_ex(&self, key: &str, ttl_secs: u64, value: &[u8]) -> Result<()> {
        let mut conn = self.conn().await?;
        let _: () = conn.set_ex(key, value, ttl_secs).await?;
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<u64> {
        let mut conn = self.conn().await?;
        let removed: u64 = conn.del(key).await?;
        Ok(removed)
    }

    async fn close(&self) -> Result<()> {
        debug!("Closing Redis connection pool");
        self.pool.close();
        Ok(())
    }
}

/// Default Redis port when `address` names only a host.
const DEFAULT_PORT: u16 = 6379;

/// Builds structured connection parameters. The password and socket path
/// are passed through as-is, so they need no URL escaping.
fn connection_info(
    network: Network,
    address: &str,
    password: &str,
    db: i64,
) -> Result<ConnectionInfo> {
    let addr = match network {
        Network::Tcp => {
            let (host, port) = split_host_port(address)?;
            ConnectionAddr::Tcp(host, port)
        }
        Network::Unix => ConnectionAddr::Unix(address.into()),
    };

    Ok(ConnectionInfo {
        addr,
        redis: RedisConnectionInfo {
            db,
            password: (!password.is_empty()).then(|| password.to_string()),
            ..Default::default()
        },
    })
}

/// Splits `host:port`, accepting bracketed IPv6 hosts and a bare host.
fn split_host_port(address: &str) -> Result<(String, u16)> {
    let (host, port) = match address.rsplit_once(':') {
        Some((host, port)) if !host.ends_with(':') && !port.contains(']') => {
            let port = port.parse().map_err(|_| {
                SessionError::Config(format!("invalid port in address '{}'", address))
            })?;
            (host, port)
        }
        _ => (address, DEFAULT_PORT),
    };

    let host = host.trim_start_matches('[').trim_end_matches(']');
    if host.is_empty() {
        return Err(SessionError::Config(format!(
            "missing host in address '{}'",
            address
        )));
    }
    Ok((host.to_string(), port))
}
