//! Response DTOs for the demo session API

use std::collections::BTreeMap;

use serde::Serialize;

use crate::session::Session;

/// Response body for the `/session` endpoints
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    /// Empty until the session is first saved
    pub id: String,
    pub is_new: bool,
    /// Values keyed by their display form, sorted
    pub values: BTreeMap<String, serde_json::Value>,
}

impl SessionResponse {
    pub fn from_session(session: &Session) -> Self {
        Self {
            id: session.id.clone(),
            is_new: session.is_new,
            values: session
                .values
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// "healthy" or "unhealthy"
    pub status: String,
    /// Whether the cache answered PING
    pub cache: bool,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn new(cache_alive: bool) -> Self {
        let status = if cache_alive { "healthy" } else { "unhealthy" };
        Self {
            status: status.to_string(),
            cache: cache_alive,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
