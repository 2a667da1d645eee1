//! Session Module
//!
//! Session records, their serialization, cookie codecs and the store that
//! moves them between HTTP cookies and the cache.

pub mod codec;
pub mod cookie;
pub mod middleware;
mod registry;
pub mod serializer;
mod store;

#[cfg(test)]
mod property_tests;

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SessionError};

pub use ::cookie::SameSite;
pub use registry::Registry;
pub use store::{
    SessionStore, StoreSettings, DEFAULT_KEY_PREFIX, DEFAULT_MAX_AGE, DEFAULT_MAX_LENGTH,
};

/// Browser-side lifetime applied to new stores: 30 days.
pub const SESSION_EXPIRE: i64 = 86400 * 30;

// == Session Key ==
/// Key of a session value.
///
/// The binary serializer keeps both variants; the JSON serializer only
/// accepts string keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SessionKey {
    Str(String),
    Int(i64),
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionKey::Str(s) => f.write_str(s),
            SessionKey::Int(i) => write!(f, "{}", i),
        }
    }
}

impl From<&str> for SessionKey {
    fn from(s: &str) -> Self {
        SessionKey::Str(s.to_string())
    }
}

impl From<String> for SessionKey {
    fn from(s: String) -> Self {
        SessionKey::Str(s)
    }
}

impl From<i64> for SessionKey {
    fn from(i: i64) -> Self {
        SessionKey::Int(i)
    }
}

/// Values held by a session.
pub type Values = HashMap<SessionKey, serde_json::Value>;

// == Session Options ==
/// Cookie attributes carried by a session; also controls cache expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub path: String,
    pub domain: Option<String>,
    /// Seconds. `save` deletes sessions whose max-age is 0 or negative.
    pub max_age: i64,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: Option<SameSite>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            domain: None,
            max_age: SESSION_EXPIRE,
            secure: false,
            http_only: false,
            same_site: None,
        }
    }
}

// == Session ==
/// A session record handed to application code for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Cache identifier; empty until first saved.
    pub id: String,
    pub values: Values,
    pub options: SessionOptions,
    /// True when no stored record backed this session.
    pub is_new: bool,
    name: String,
}

impl Session {
    /// Creates an empty, new session registered under `name`.
    pub fn new(name: impl Into<String>, options: SessionOptions) -> Self {
        Self {
            id: String::new(),
            values: Values::new(),
            options,
            is_new: true,
            name: name.into(),
        }
    }

    /// Cookie name this session travels under.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, key: impl Into<SessionKey>) -> Option<&serde_json::Value> {
        self.values.get(&key.into())
    }

    pub fn insert(
        &mut self,
        key: impl Into<SessionKey>,
        value: impl Into<serde_json::Value>,
    ) -> Option<serde_json::Value> {
        self.values.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: impl Into<SessionKey>) -> Option<serde_json::Value> {
        self.values.remove(&key.into())
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Marks the session for deletion on the next save.
    pub fn invalidate(&mut self) {
        self.options.max_age = -1;
    }
}

// == Loaded ==
/// Outcome of resolving a session from a request.
///
/// The session is always usable. `error` carries a cookie decode or cache
/// load failure; callers decide whether that is fatal or whether to carry
/// on with the fresh session.
#[derive(Debug)]
pub struct Loaded {
    pub session: Session,
    pub error: Option<SessionError>,
}

impl Loaded {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// True when the cookie decoded but the stored record could not be
    /// read. Saving such a session would overwrite that record.
    pub fn load_failed(&self) -> bool {
        matches!(&self.error, Some(e) if !matches!(e, SessionError::Codec(_)))
    }

    pub fn into_parts(self) -> (Session, Option<SessionError>) {
        (self.session, self.error)
    }

    /// Treats any decode or load failure as fatal.
    pub fn into_result(self) -> Result<Session> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.session),
        }
    }
}
