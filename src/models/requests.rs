//! Request DTOs for the demo session API

use serde::Deserialize;

/// Maximum key length accepted by `PUT /session`.
pub const MAX_KEY_LENGTH: usize = 256;

/// Request body for `PUT /session`
#[derive(Debug, Clone, Deserialize)]
pub struct SetValueRequest {
    /// Session value key
    pub key: String,
    /// Any JSON value
    pub value: serde_json::Value,
}

impl SetValueRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        if self.key.len() > MAX_KEY_LENGTH {
            return Some(format!(
                "Key exceeds maximum length of {} characters",
                MAX_KEY_LENGTH
            ));
        }
        None
    }
}
