//! API Routes
//!
//! Configures the Axum router for the demo session service.

use axum::{middleware, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    delete_session_handler, get_session_handler, health_handler, put_session_handler, AppState,
};
use crate::session::middleware::session_middleware;

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - Sessions: resolves sessions per request and saves them afterwards
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/session",
            get(get_session_handler)
                .put(put_session_handler)
                .delete(delete_session_handler),
        )
        .layer(middleware::from_fn_with_state(
            state.store.clone(),
            session_middleware,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
