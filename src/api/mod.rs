//! API Module
//!
//! Demo HTTP service exercising the session store.
//!
//! # Endpoints
//! - `GET /health` - Cache liveness
//! - `GET /session` - Current session values
//! - `PUT /session` - Store a value in the session
//! - `DELETE /session` - Delete the session

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
