//! Session Store
//!
//! Moves sessions between signed cookies and the cache. A cookie carries
//! only the codec-encoded session ID; the values live in the cache under
//! `key_prefix + id` with a TTL.

use std::sync::Arc;

use axum::http::{header, HeaderMap};
use data_encoding::BASE32_NOPAD;
use tracing::warn;

use crate::cache::{CacheClient, RedisClient, PONG};
use crate::error::{Result, SessionError};
use crate::session::codec::{
    codecs_from_pairs, decode_multi, encode_multi, generate_random_key, CookieCodec,
};
use crate::session::serializer::{MsgpackSerializer, SessionSerializer};
use crate::session::{cookie, Loaded, Registry, Session, SessionOptions};

// == Defaults ==
/// Prefix applied to every cache key.
pub const DEFAULT_KEY_PREFIX: &str = "session_";

/// Largest serialized session accepted by `save`, in bytes.
pub const DEFAULT_MAX_LENGTH: usize = 4096;

/// Cache TTL in seconds for sessions whose max-age is 0.
pub const DEFAULT_MAX_AGE: u64 = 60 * 20;

/// Length in bytes of the random material behind a session ID.
const SESSION_ID_BYTES: usize = 32;

// == Store Settings ==
/// Process-wide store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub key_prefix: String,
    /// 0 disables the size check.
    pub max_length: usize,
    pub default_max_age: u64,
    /// Copied into every new session.
    pub options: SessionOptions,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            max_length: DEFAULT_MAX_LENGTH,
            default_max_age: DEFAULT_MAX_AGE,
            options: SessionOptions::default(),
        }
    }
}

// == Session Store ==
/// Cache-backed session store.
///
/// No locking is done around a session ID: concurrent saves of the same
/// session are last-writer-wins in the cache.
pub struct SessionStore {
    client: Arc<dyn CacheClient>,
    codecs: Vec<Box<dyn CookieCodec>>,
    serializer: Box<dyn SessionSerializer>,
    settings: StoreSettings,
}

impl SessionStore {
    /// Connects to Redis on the default database.
    ///
    /// # Arguments
    /// * `pool_size` - maximum pooled connections
    /// * `network` - `"tcp"` or `"unix"`
    /// * `address` - `host:port` or socket path
    /// * `password` - empty for no AUTH
    /// * `keys` - hash/block key pairs, newest first
    pub async fn connect<K: AsRef<[u8]>>(
        pool_size: usize,
        network: &str,
        address: &str,
        password: &str,
        keys: &[K],
    ) -> Result<Self> {
        Self::connect_with_db(pool_size, network, address, password, 0, keys).await
    }

    /// Connects to Redis and selects logical database `db`.
    pub async fn connect_with_db<K: AsRef<[u8]>>(
        pool_size: usize,
        network: &str,
        address: &str,
        password: &str,
        db: i64,
        keys: &[K],
    ) -> Result<Self> {
        let client = RedisClient::connect(pool_size, network, address, password, db)?;
        Self::with_client(Arc::new(client), keys).await
    }

    /// Wraps an existing cache client. Fails if the cache does not answer PING.
    pub async fn with_client<K: AsRef<[u8]>>(
        client: Arc<dyn CacheClient>,
        keys: &[K],
    ) -> Result<Self> {
        let codecs = codecs_from_pairs(keys)?;
        let store = Self {
            client,
            codecs,
            serializer: Box::new(MsgpackSerializer),
            settings: StoreSettings::default(),
        };

        match store.ping().await {
            Ok(true) => Ok(store),
            Ok(false) => Err(SessionError::Unreachable(
                "unexpected reply to PING".to_string(),
            )),
            Err(e) => Err(SessionError::Unreachable(e.to_string())),
        }
    }

    // == Setters ==
    /// Sets the maximum serialized size. 0 disables the check.
    pub fn set_max_length(&mut self, max_length: usize) {
        self.settings.max_length = max_length;
    }

    pub fn set_key_prefix(&mut self, prefix: impl Into<String>) {
        self.settings.key_prefix = prefix.into();
    }

    pub fn set_serializer(&mut self, serializer: impl SessionSerializer + 'static) {
        self.serializer = Box::new(serializer);
    }

    /// Sets the default cookie max-age and bounds signature validity on
    /// every codec that supports it.
    pub fn set_max_age(&mut self, max_age: i64) {
        self.settings.options.max_age = max_age;
        for (index, codec) in self.codecs.iter_mut().enumerate() {
            if !codec.set_max_age(max_age) {
                warn!(codec = index, "Codec does not support changing max-age");
            }
        }
    }

    /// Sets the cache TTL used for sessions whose max-age is 0.
    pub fn set_default_max_age(&mut self, seconds: u64) {
        self.settings.default_max_age = seconds;
    }

    /// Replaces the cookie options copied into new sessions.
    pub fn set_options(&mut self, options: SessionOptions) {
        self.settings.options = options;
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    // == Session Lifecycle ==
    /// Resolves session `name` from the request cookies.
    ///
    /// A missing cookie or a cache miss yields a fresh session with no
    /// error. A cookie that fails to decode, or a record that fails to
    /// load, yields a fresh session together with the error.
    pub async fn new_session(&self, headers: &HeaderMap, name: &str) -> Loaded {
        let mut session = Session::new(name, self.settings.options.clone());

        let Some(value) = cookie::read(headers, name) else {
            return Loaded {
                session,
                error: None,
            };
        };

        let id = match decode_multi(name, &value, &self.codecs) {
            Ok(id) => id,
            Err(e) => {
                return Loaded {
                    session,
                    error: Some(e.into()),
                }
            }
        };

        session.id = id;
        match self.load(&mut session).await {
            Ok(found) => {
                session.is_new = !found;
                Loaded {
                    session,
                    error: None,
                }
            }
            Err(e) => Loaded {
                session,
                error: Some(e),
            },
        }
    }

    /// Returns session `name` for this request, creating it on first use.
    pub async fn get<'r>(&self, registry: &'r mut Registry, name: &str) -> &'r mut Loaded {
        registry.get(self, name).await
    }

    /// Persists `session` and writes its cookie to `response`.
    ///
    /// A max-age of 0 or less deletes the record and expires the cookie.
    /// The cookie is rendered before the cache is touched, and on any
    /// failure no cookie is written.
    pub async fn save(&self, session: &mut Session, response: &mut HeaderMap) -> Result<()> {
        if session.options.max_age <= 0 {
            let expired =
                cookie::header_value(&cookie::expired(session.name(), &session.options))?;
            self.remove(session).await?;
            response.append(header::SET_COOKIE, expired);
            return Ok(());
        }

        if session.id.is_empty() {
            session.id = BASE32_NOPAD.encode(&generate_random_key(SESSION_ID_BYTES));
        }

        let encoded = encode_multi(session.name(), &session.id, &self.codecs)?;
        let set_cookie =
            cookie::header_value(&cookie::build(session.name(), &encoded, &session.options)?)?;

        self.persist(session).await?;
        response.append(header::SET_COOKIE, set_cookie);
        Ok(())
    }

    /// Removes the record, empties `session.values` and expires the cookie.
    pub async fn delete(&self, session: &mut Session, response: &mut HeaderMap) -> Result<()> {
        self.remove(session).await?;
        session.clear();
        cookie::set(response, &cookie::expired(session.name(), &session.options))
    }

    /// Whether the cache answers PING with PONG.
    pub async fn ping(&self) -> Result<bool> {
        let reply = self.client.ping().await?;
        Ok(reply == PONG)
    }

    /// Releases the cache client's connections.
    pub async fn close(&self) -> Result<()> {
        self.client.close().await
    }

    // == Cache Helpers ==
    fn cache_key(&self, session: &Session) -> String {
        format!("{}{}", self.settings.key_prefix, session.id)
    }

    /// Reads the stored record into `session`. A miss is `Ok(false)`.
    async fn load(&self, session: &mut Session) -> Result<bool> {
        self.client.client_name().await?;
        let data = match self.client.get(&self.cache_key(session)).await? {
            Some(data) if !data.is_empty() => data,
            _ => return Ok(false),
        };
        self.serializer.deserialize(&data, session)?;
        Ok(true)
    }

    /// Serializes and size-checks `session` before issuing SETEX.
    async fn persist(&self, session: &Session) -> Result<()> {
        let data = self.serializer.serialize(session)?;
        let max = self.settings.max_length;
        if max != 0 && data.len() > max {
            return Err(SessionError::PayloadTooLarge {
                size: data.len(),
                max,
            });
        }

        let ttl = match session.options.max_age {
            0 => self.settings.default_max_age,
            age => age.unsigned_abs(),
        };

        self.client.client_name().await?;
        self.client
            .set_ex(&self.cache_key(session), ttl, &data)
            .await
    }

    async fn remove(&self, session: &Session) -> Result<()> {
        self.client.del(&self.cache_key(session)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::error::CodecError;
    use crate::session::codec::SecureCookie;
    use crate::session::serializer::JsonSerializer;
    use async_trait::async_trait;
    use axum::http::HeaderValue;
    use serde_json::json;
    use std::sync::Mutex;

    const HASH_KEY: &[u8] = b"hash-key-for-session-store-tests";
    const OLD_HASH_KEY: &[u8] = b"retired-hash-key-for-store-tests";

    /// Cache double that records every command it receives.
    #[derive(Default)]
    struct RecordingCache {
        inner: MemoryCache,
        commands: Mutex<Vec<String>>,
        ping_reply: Option<String>,
    }

    impl RecordingCache {
        fn log(&self, command: String) {
            self.commands.lock().unwrap().push(command);
        }

        fn commands(&self) -> Vec<String> {
            self.commands.lock().unwrap().clone()
        }

        fn clear(&self) {
            self.commands.lock().unwrap().clear();
        }
    }

    #[async_trait]
    impl CacheClient for RecordingCache {
        async fn ping(&self) -> Result<String> {
            self.log("PING".to_string());
            match &self.ping_reply {
                Some(reply) => Ok(reply.clone()),
                None => self.inner.ping().await,
            }
        }

        async fn client_name(&self) -> Result<Option<String>> {
            self.log("CLIENT GETNAME".to_string());
            self.inner.client_name().await
        }

        async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
            self.log(format!("GET {}", key));
            self.inner.get(key).await
        }

        async fn set_ex(&self, key: &str, ttl_secs: u64, value: &[u8]) -> Result<()> {
            self.log(format!("SETEX {} {}", key, ttl_secs));
            self.inner.set_ex(key, ttl_secs, value).await
        }

        async fn del(&self, key: &str) -> Result<u64> {
            self.log(format!("DEL {}", key));
            self.inner.del(key).await
        }
    }

    async fn store_with(cache: Arc<RecordingCache>) -> SessionStore {
        SessionStore::with_client(cache, &[HASH_KEY]).await.unwrap()
    }

    fn request_with(response: &HeaderMap) -> HeaderMap {
        let set_cookie = response.get(header::SET_COOKIE).unwrap().to_str().unwrap();
        let pair = set_cookie.split(';').next().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(pair).unwrap());
        headers
    }

    #[tokio::test]
    async fn test_construction_pings() {
        let cache = Arc::new(RecordingCache::default());
        let store = store_with(cache.clone()).await;

        assert_eq!(cache.commands(), vec!["PING"]);
        assert_eq!(store.settings(), &StoreSettings::default());
    }

    #[tokio::test]
    async fn test_construction_fails_on_bad_ping() {
        let cache = Arc::new(RecordingCache {
            ping_reply: Some("LOADING".to_string()),
            ..Default::default()
        });

        let result = SessionStore::with_client(cache, &[HASH_KEY]).await;
        assert!(matches!(result, Err(SessionError::Unreachable(_))));
    }

    #[tokio::test]
    async fn test_construction_fails_on_closed_cache() {
        let cache = MemoryCache::new();
        cache.close().await.unwrap();

        let result = SessionStore::with_client(Arc::new(cache), &[HASH_KEY]).await;
        assert!(matches!(result, Err(SessionError::Unreachable(_))));
    }

    #[tokio::test]
    async fn test_construction_rejects_bad_block_key() {
        let keys: [&[u8]; 2] = [HASH_KEY, b"short"];
        let result = SessionStore::with_client(Arc::new(MemoryCache::new()), &keys).await;
        assert!(matches!(
            result,
            Err(SessionError::Codec(CodecError::InvalidKey(_)))
        ));
    }

    #[tokio::test]
    async fn test_new_without_cookie() {
        let cache = Arc::new(RecordingCache::default());
        let store = store_with(cache.clone()).await;
        cache.clear();

        let loaded = store.new_session(&HeaderMap::new(), "sid").await;

        assert!(loaded.is_ok());
        assert!(loaded.session.is_new);
        assert!(loaded.session.id.is_empty());
        assert_eq!(loaded.session.options, store.settings().options);
        assert!(cache.commands().is_empty());
    }

    #[tokio::test]
    async fn test_new_with_invalid_cookie() {
        let store = store_with(Arc::new(RecordingCache::default())).await;
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("sid=forged"));

        let loaded = store.new_session(&headers, "sid").await;

        assert!(loaded.session.is_new);
        assert!(loaded.session.id.is_empty());
        assert!(matches!(loaded.error, Some(SessionError::Codec(_))));
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let cache = Arc::new(RecordingCache::default());
        let store = store_with(cache.clone()).await;

        let mut session = store.new_session(&HeaderMap::new(), "sid").await.session;
        session.insert("user", "alice");
        session.insert(9i64, json!({"n": 1}));

        let mut response = HeaderMap::new();
        store.save(&mut session, &mut response).await.unwrap();

        assert!(!session.id.is_empty());
        let raw = BASE32_NOPAD.decode(session.id.as_bytes()).unwrap();
        assert_eq!(raw.len(), SESSION_ID_BYTES);

        cache.clear();
        let loaded = store.new_session(&request_with(&response), "sid").await;

        assert!(loaded.is_ok());
        assert!(!loaded.session.is_new);
        assert_eq!(loaded.session.id, session.id);
        assert_eq!(loaded.session.values, session.values);
        assert_eq!(
            cache.commands(),
            vec![
                "CLIENT GETNAME".to_string(),
                format!("GET session_{}", session.id),
            ]
        );
    }

    #[tokio::test]
    async fn test_save_keeps_existing_id() {
        let store = store_with(Arc::new(RecordingCache::default())).await;
        let mut session = store.new_session(&HeaderMap::new(), "sid").await.session;

        store.save(&mut session, &mut HeaderMap::new()).await.unwrap();
        let id = session.id.clone();
        store.save(&mut session, &mut HeaderMap::new()).await.unwrap();

        assert_eq!(session.id, id);
    }

    #[tokio::test]
    async fn test_cache_miss_is_new_without_error() {
        let cache = Arc::new(RecordingCache::default());
        let store = store_with(cache.clone()).await;

        let mut session = store.new_session(&HeaderMap::new(), "sid").await.session;
        let mut response = HeaderMap::new();
        store.save(&mut session, &mut response).await.unwrap();
        cache.inner.del(&format!("session_{}", session.id)).await.unwrap();

        let loaded = store.new_session(&request_with(&response), "sid").await;

        assert!(loaded.is_ok());
        assert!(loaded.session.is_new);
        assert_eq!(loaded.session.id, session.id);
    }

    #[tokio::test]
    async fn test_ttl_uses_default_when_max_age_zero() {
        let cache = Arc::new(RecordingCache::default());
        let store = store_with(cache.clone()).await;
        let mut session = store.new_session(&HeaderMap::new(), "sid").await.session;
        session.id = "ZERO".to_string();
        session.options.max_age = 0;

        cache.clear();
        store.persist(&session).await.unwrap();

        assert_eq!(
            cache.commands(),
            vec![
                "CLIENT GETNAME".to_string(),
                format!("SETEX session_{} {}", session.id, DEFAULT_MAX_AGE),
            ]
        );
    }

    #[tokio::test]
    async fn test_ttl_uses_session_max_age() {
        let cache = Arc::new(RecordingCache::default());
        let store = store_with(cache.clone()).await;
        let mut session = store.new_session(&HeaderMap::new(), "sid").await.session;
        session.options.max_age = 77;

        store.save(&mut session, &mut HeaderMap::new()).await.unwrap();

        let key = format!("session_{}", session.id);
        assert!(cache.commands().contains(&format!("SETEX {} 77", key)));
        assert!(cache.inner.ttl(&key).await.unwrap() <= 77);
    }

    #[tokio::test]
    async fn test_save_negative_max_age_deletes() {
        let cache = Arc::new(RecordingCache::default());
        let store = store_with(cache.clone()).await;
        let mut session = store.new_session(&HeaderMap::new(), "sid").await.session;
        store.save(&mut session, &mut HeaderMap::new()).await.unwrap();

        cache.clear();
        session.invalidate();
        let mut response = HeaderMap::new();
        store.save(&mut session, &mut response).await.unwrap();

        let commands = cache.commands();
        assert_eq!(commands, vec![format!("DEL session_{}", session.id)]);
        assert!(!commands.iter().any(|c| c.starts_with("SETEX")));

        let set_cookie = response.get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert!(set_cookie.starts_with("sid=;"));
        assert!(set_cookie.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn test_save_zero_max_age_deletes() {
        let cache = Arc::new(RecordingCache::default());
        let store = store_with(cache.clone()).await;
        let mut session = store.new_session(&HeaderMap::new(), "sid").await.session;
        session.insert("user", "alice");
        store.save(&mut session, &mut HeaderMap::new()).await.unwrap();

        cache.clear();
        session.options.max_age = 0;
        let mut response = HeaderMap::new();
        store.save(&mut session, &mut response).await.unwrap();

        assert_eq!(cache.commands(), vec![format!("DEL session_{}", session.id)]);
        assert!(cache.inner.store().read().await.is_empty());

        let set_cookie = response.get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert!(set_cookie.starts_with("sid=;"));
        assert!(set_cookie.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn test_out_of_range_max_age_writes_nothing() {
        let cache = Arc::new(RecordingCache::default());
        let store = store_with(cache.clone()).await;
        let mut session = store.new_session(&HeaderMap::new(), "sid").await.session;
        session.insert("user", "alice");
        session.options.max_age = i64::MAX;

        cache.clear();
        let mut response = HeaderMap::new();
        let result = store.save(&mut session, &mut response).await;

        assert!(matches!(result, Err(SessionError::Header(_))));
        assert!(cache.commands().is_empty());
        assert!(response.is_empty());
        assert!(cache.inner.store().read().await.is_empty());
    }

    #[tokio::test]
    async fn test_payload_too_large_writes_nothing() {
        let cache = Arc::new(RecordingCache::default());
        let mut store = store_with(cache.clone()).await;
        store.set_max_length(10);
        store.set_serializer(JsonSerializer);

        let mut session = store.new_session(&HeaderMap::new(), "sid").await.session;
        // {"k":"123"} is 11 bytes
        session.insert("k", "123");

        cache.clear();
        let mut response = HeaderMap::new();
        let result = store.save(&mut session, &mut response).await;

        assert!(matches!(
            result,
            Err(SessionError::PayloadTooLarge { size: 11, max: 10 })
        ));
        assert!(cache.commands().is_empty());
        assert!(response.get(header::SET_COOKIE).is_none());
        assert!(cache.inner.store().read().await.is_empty());
    }

    #[tokio::test]
    async fn test_max_length_zero_is_unlimited() {
        let mut store = store_with(Arc::new(RecordingCache::default())).await;
        store.set_max_length(0);

        let mut session = store.new_session(&HeaderMap::new(), "sid").await.session;
        session.insert("blob", "x".repeat(DEFAULT_MAX_LENGTH * 2));

        assert!(store.save(&mut session, &mut HeaderMap::new()).await.is_ok());
    }

    #[tokio::test]
    async fn test_json_serializer_non_string_key_aborts_save() {
        let cache = Arc::new(RecordingCache::default());
        let mut store = store_with(cache.clone()).await;
        store.set_serializer(JsonSerializer);

        let mut session = store.new_session(&HeaderMap::new(), "sid").await.session;
        session.insert(1i64, "one");

        cache.clear();
        let mut response = HeaderMap::new();
        let result = store.save(&mut session, &mut response).await;

        assert!(matches!(result, Err(SessionError::NonStringKey(_))));
        assert!(cache.commands().is_empty());
        assert!(response.is_empty());
    }

    #[tokio::test]
    async fn test_cache_failure_sets_no_cookie() {
        let cache = MemoryCache::new();
        let store = SessionStore::with_client(Arc::new(cache.clone()), &[HASH_KEY])
            .await
            .unwrap();
        cache.close().await.unwrap();

        let mut session = store.new_session(&HeaderMap::new(), "sid").await.session;
        let mut response = HeaderMap::new();
        let result = store.save(&mut session, &mut response).await;

        assert!(matches!(result, Err(SessionError::Cache(_))));
        assert!(response.is_empty());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent_and_clears_values() {
        let cache = Arc::new(RecordingCache::default());
        let store = store_with(cache.clone()).await;
        let mut session = store.new_session(&HeaderMap::new(), "sid").await.session;
        session.insert("user", "alice");
        store.save(&mut session, &mut HeaderMap::new()).await.unwrap();

        let mut response = HeaderMap::new();
        store.delete(&mut session, &mut response).await.unwrap();
        store.delete(&mut session, &mut response).await.unwrap();

        assert!(session.values.is_empty());
        assert_eq!(response.get_all(header::SET_COOKIE).iter().count(), 2);
        assert!(cache.inner.store().read().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_clears_values_when_cookie_is_rejected() {
        let cache = Arc::new(RecordingCache::default());
        let store = store_with(cache.clone()).await;
        let mut session = Session::new("bad\nname", SessionOptions::default());
        session.id = "STALE".to_string();
        session.insert("user", "alice");
        cache.inner.set_ex("session_STALE", 60, b"stale").await.unwrap();

        let mut response = HeaderMap::new();
        let result = store.delete(&mut session, &mut response).await;

        assert!(matches!(result, Err(SessionError::Header(_))));
        assert!(session.values.is_empty());
        assert!(response.is_empty());
        assert!(cache.inner.store().read().await.is_empty());
    }

    #[tokio::test]
    async fn test_key_prefix() {
        let cache = Arc::new(RecordingCache::default());
        let mut store = store_with(cache.clone()).await;
        store.set_key_prefix("app:");

        let mut session = store.new_session(&HeaderMap::new(), "sid").await.session;
        store.save(&mut session, &mut HeaderMap::new()).await.unwrap();

        let key = format!("app:{}", session.id);
        assert!(cache.inner.get(&key).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_set_max_age_updates_default_options() {
        let cache = Arc::new(RecordingCache::default());
        let mut store = store_with(cache.clone()).await;
        store.set_max_age(60);

        assert_eq!(store.settings().options.max_age, 60);
        let session = store.new_session(&HeaderMap::new(), "sid").await.session;
        assert_eq!(session.options.max_age, 60);
    }

    #[tokio::test]
    async fn test_key_rotation() {
        let cache = Arc::new(RecordingCache::default());
        let old_store = SessionStore::with_client(cache.clone(), &[OLD_HASH_KEY])
            .await
            .unwrap();

        let mut session = old_store.new_session(&HeaderMap::new(), "sid").await.session;
        session.insert("user", "carol");
        let mut response = HeaderMap::new();
        old_store.save(&mut session, &mut response).await.unwrap();

        // Signing-only codecs: an odd key count pairs each key with no block key.
        let keys: [&[u8]; 3] = [HASH_KEY, b"", OLD_HASH_KEY];
        let rotated = SessionStore::with_client(cache.clone(), &keys).await.unwrap();
        let loaded = rotated.new_session(&request_with(&response), "sid").await;

        assert!(loaded.is_ok());
        assert_eq!(loaded.session.get("user"), Some(&json!("carol")));

        let mut reissued = HeaderMap::new();
        let mut session = loaded.session;
        rotated.save(&mut session, &mut reissued).await.unwrap();

        let value = cookie::read(&request_with(&reissued), "sid").unwrap();
        let primary = SecureCookie::new(HASH_KEY, None).unwrap();
        assert_eq!(primary.decode("sid", &value).unwrap(), session.id);
    }

    #[tokio::test]
    async fn test_ping() {
        let store = store_with(Arc::new(RecordingCache::default())).await;
        assert!(store.ping().await.unwrap());
    }
}
