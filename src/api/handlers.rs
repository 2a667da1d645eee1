//! API Handlers
//!
//! HTTP request handlers for the demo session endpoints.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use tracing::debug;

use crate::error::{Result, SessionError};
use crate::models::{HealthResponse, SessionResponse, SetValueRequest};
use crate::session::middleware::Sessions;
use crate::session::{Loaded, Session, SessionStore};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SessionStore>,
    /// Cookie name of the demo session
    pub session_name: String,
}

impl AppState {
    pub fn new(store: SessionStore, session_name: impl Into<String>) -> Self {
        Self {
            store: Arc::new(store),
            session_name: session_name.into(),
        }
    }
}

/// Hands out the session, starting fresh when the cookie did not decode.
///
/// Load failures are returned and stay recorded on `loaded`, so the
/// registry does not overwrite the stored record with an empty session.
fn usable(loaded: &mut Loaded) -> Result<&mut Session> {
    match &loaded.error {
        None => Ok(&mut loaded.session),
        Some(SessionError::Codec(e)) => {
            debug!(error = %e, "Ignoring undecodable session cookie");
            loaded.error = None;
            Ok(&mut loaded.session)
        }
        Some(e) => Err(e.clone()),
    }
}

/// Handler for GET /session
pub async fn get_session_handler(
    State(state): State<AppState>,
    sessions: Sessions,
) -> Result<Json<SessionResponse>> {
    sessions
        .with(&state.session_name, |loaded| {
            let session = usable(loaded)?;
            Ok(Json(SessionResponse::from_session(session)))
        })
        .await
}

/// Handler for PUT /session
pub async fn put_session_handler(
    State(state): State<AppState>,
    sessions: Sessions,
    Json(req): Json<SetValueRequest>,
) -> Result<Json<SessionResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(SessionError::InvalidRequest(error_msg));
    }

    sessions
        .with(&state.session_name, |loaded| {
            let session = usable(loaded)?;
            session.insert(req.key, req.value);
            Ok(Json(SessionResponse::from_session(session)))
        })
        .await
}

/// Handler for DELETE /session
///
/// The record and cookie are removed when the middleware saves.
pub async fn delete_session_handler(
    State(state): State<AppState>,
    sessions: Sessions,
) -> Result<StatusCode> {
    sessions
        .with(&state.session_name, |loaded| {
            let session = usable(loaded)?;
            session.invalidate();
            Ok(StatusCode::NO_CONTENT)
        })
        .await
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let alive = state.store.ping().await.unwrap_or(false);
    let status = if alive {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(HealthResponse::new(alive)))
}
