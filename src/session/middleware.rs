//! Axum integration.
//!
//! [`session_middleware`] gives each request a [`Registry`] and saves every
//! session it resolved once the handler returns. Handlers reach the
//! registry through the [`Sessions`] extractor.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;
use tracing::error;

use crate::error::{Result, SessionError};
use crate::session::{Loaded, Registry, SessionStore};

/// Handle to the sessions of the current request.
#[derive(Clone)]
pub struct Sessions {
    store: Arc<SessionStore>,
    registry: Arc<Mutex<Registry>>,
}

impl Sessions {
    pub fn new(store: Arc<SessionStore>, headers: HeaderMap) -> Self {
        Self {
            store,
            registry: Arc::new(Mutex::new(Registry::new(headers))),
        }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Runs `f` against session `name`, resolving it on first use.
    pub async fn with<R>(&self, name: &str, f: impl FnOnce(&mut Loaded) -> R) -> R {
        let mut registry = self.registry.lock().await;
        let loaded = registry.get(&self.store, name).await;
        f(loaded)
    }

    /// Saves every session resolved so far into `response`.
    pub async fn save(&self, response: &mut HeaderMap) -> Result<()> {
        self.registry
            .lock()
            .await
            .save(&self.store, response)
            .await
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Sessions
where
    S: Send + Sync,
{
    type Rejection = SessionError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<Sessions>()
            .cloned()
            .ok_or_else(|| SessionError::Config("session middleware is not installed".to_string()))
    }
}

/// Installs [`Sessions`] for the handler and saves them afterwards.
///
/// A failed save replaces the handler's response with the error.
pub async fn session_middleware(
    State(store): State<Arc<SessionStore>>,
    mut request: Request,
    next: Next,
) -> Response {
    let sessions = Sessions::new(store, request.headers().clone());
    request.extensions_mut().insert(sessions.clone());

    let mut response = next.run(request).await;

    if let Err(e) = sessions.save(response.headers_mut()).await {
        error!(error = %e, "Failed to save sessions");
        return e.into_response();
    }
    response
}
