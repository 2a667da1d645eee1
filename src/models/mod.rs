//! Request and Response models for the demo session API
//!
//! DTOs used for serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

pub use requests::SetValueRequest;
pub use responses::{ErrorResponse, HealthResponse, SessionResponse};
