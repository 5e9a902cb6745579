//! Application state for the HTTP server.

use std::sync::Arc;

use crate::auth::SessionTokens;
use crate::db::repository::FullRepository;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for schedule and subject storage
    pub repository: Arc<dyn FullRepository>,
    /// Bearer token validator
    pub sessions: Arc<SessionTokens>,
}

impl AppState {
    pub fn new(repository: Arc<dyn FullRepository>, sessions: SessionTokens) -> Self {
        Self {
            repository,
            sessions: Arc::new(sessions),
        }
    }
}
