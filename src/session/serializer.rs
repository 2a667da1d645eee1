//! Session value serializers.
//!
//! Two interchangeable strategies turn a session's value map into the bytes
//! stored in the cache:
//! - [`JsonSerializer`] writes a JSON object and only accepts string keys.
//! - [`MsgpackSerializer`] writes self-describing MessagePack and keeps
//!   integer keys intact. It is the store default.
//!
//! Deserializing merges the decoded values into the session's existing map.

use serde_json::{Map, Value};

use crate::error::{Result, SessionError};
use crate::session::{Session, SessionKey, Values};

/// Strategy for encoding a session's values.
pub trait SessionSerializer: Send + Sync {
    fn serialize(&self, session: &Session) -> Result<Vec<u8>>;

    fn deserialize(&self, data: &[u8], session: &mut Session) -> Result<()>;
}

// == JSON ==
/// Encodes the value map as a JSON object.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl SessionSerializer for JsonSerializer {
    fn serialize(&self, session: &Session) -> Result<Vec<u8>> {
        let mut map = Map::with_capacity(session.values.len());
        for (key, value) in &session.values {
            match key {
                SessionKey::Str(k) => {
                    map.insert(k.clone(), value.clone());
                }
                SessionKey::Int(_) => return Err(SessionError::NonStringKey(key.to_string())),
            }
        }
        serde_json::to_vec(&map).map_err(|e| SessionError::Serialization(e.to_string()))
    }

    fn deserialize(&self, data: &[u8], session: &mut Session) -> Result<()> {
        let map: Map<String, Value> =
            serde_json::from_slice(data).map_err(|e| SessionError::Serialization(e.to_string()))?;
        session
            .values
            .extend(map.into_iter().map(|(k, v)| (SessionKey::Str(k), v)));
        Ok(())
    }
}

// == MessagePack ==
/// Encodes the value map as MessagePack, preserving non-string keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgpackSerializer;

impl SessionSerializer for MsgpackSerializer {
    fn serialize(&self, session: &Session) -> Result<Vec<u8>> {
        rmp_serde::to_vec(&session.values).map_err(|e| SessionError::Serialization(e.to_string()))
    }

    fn deserialize(&self, data: &[u8], session: &mut Session) -> Result<()> {
        let values: Values =
            rmp_serde::from_slice(data).map_err(|e| SessionError::Serialization(e.to_string()))?;
        session.values.extend(values);
        Ok(())
    }
}
