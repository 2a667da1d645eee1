//! Per-request session registry.
//!
//! Tracks every session resolved during one request so they can be saved
//! together once the handler is done.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use axum::http::HeaderMap;
use tracing::debug;

use crate::error::Result;
use crate::session::{Loaded, SessionStore};

/// Sessions resolved for a single request, keyed by cookie name.
#[derive(Debug, Default)]
pub struct Registry {
    headers: HeaderMap,
    sessions: HashMap<String, Loaded>,
}

impl Registry {
    /// Creates a registry for a request carrying `headers`.
    pub fn new(headers: HeaderMap) -> Self {
        Self {
            headers,
            sessions: HashMap::new(),
        }
    }

    /// Returns session `name`, resolving it through `store` on first use.
    pub async fn get(&mut self, store: &SessionStore, name: &str) -> &mut Loaded {
        match self.sessions.entry(name.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let loaded = store.new_session(&self.headers, name).await;
                entry.insert(loaded)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Saves every registered session, writing cookies to `response`.
    ///
    /// Sessions whose stored record could not be read are skipped until the
    /// caller clears `Loaded::error`. All others are attempted; the first
    /// error is returned.
    pub async fn save(&mut self, store: &SessionStore, response: &mut HeaderMap) -> Result<()> {
        let mut first_error = None;
        for (name, loaded) in self.sessions.iter_mut() {
            if loaded.load_failed() {
                debug!(session = %name, "Skipping save of session that failed to load");
                continue;
            }
            if let Err(e) = store.save(&mut loaded.session, response).await {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
