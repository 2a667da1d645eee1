//! Error types for the session store
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Codec Error Enum ==
/// Failure while encoding or decoding a session cookie value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Cookie value is not in the expected wire format
    #[error("Malformed cookie value: {0}")]
    Malformed(String),

    /// Signature does not match the cookie contents
    #[error("Invalid cookie signature")]
    InvalidSignature,

    /// Cookie timestamp is older than the codec's max-age
    #[error("Cookie has expired")]
    Expired,

    /// Cookie timestamp is younger than the codec's min-age
    #[error("Cookie timestamp is too new")]
    TimestampTooNew,

    /// Encrypted payload could not be decrypted
    #[error("Cookie decryption failed")]
    Decryption,

    /// Payload could not be encrypted
    #[error("Cookie encryption failed")]
    Encryption,

    /// No codec was configured for the store
    #[error("No cookie codecs configured")]
    NoCodecs,

    /// Key material was rejected
    #[error("Invalid codec key: {0}")]
    InvalidKey(String),
}

// == Session Error Enum ==
/// Unified error type for session store operations.
#[derive(Error, Debug, Clone)]
pub enum SessionError {
    /// Cookie decode/encode failure
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Text serializer was handed a value map with a non-string key
    #[error("Non-string key value, cannot serialize session to JSON: {0}")]
    NonStringKey(String),

    /// Payload could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Serialized session exceeds the configured maximum length
    #[error("SessionStore: the value to store is too big ({size} > {max} bytes)")]
    PayloadTooLarge { size: usize, max: usize },

    /// Connectivity or command failure reported by the cache client
    #[error("Cache error: {0}")]
    Cache(String),

    /// Cache answered the liveness check with something other than PONG
    #[error("Cache unreachable: {0}")]
    Unreachable(String),

    /// Cookie could not be turned into a header value
    #[error("Invalid header: {0}")]
    Header(String),

    /// Invalid request payload (demo API)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Store or middleware misconfiguration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<redis::RedisError> for SessionError {
    fn from(err: redis::RedisError) -> Self {
        SessionError::Cache(err.to_string())
    }
}

impl From<deadpool_redis::PoolError> for SessionError {
    fn from(err: deadpool_redis::PoolError) -> Self {
        SessionError::Cache(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let status = match &self {
            SessionError::Codec(_) | SessionError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            SessionError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            SessionError::Cache(_) | SessionError::Unreachable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            SessionError::NonStringKey(_)
            | SessionError::Serialization(_)
            | SessionError::Header(_)
            | SessionError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the session store.
pub type Result<T> = std::result::Result<T, SessionError>;
