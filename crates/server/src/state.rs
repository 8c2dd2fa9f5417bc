use std::sync::Arc;

use lexireview_core::{Config, ReviewRepository, ReviewSession, SessionStore};

/// Shared application state
pub struct AppState {
    config: Config,
    repository: Arc<dyn ReviewRepository>,
    sessions: Arc<dyn SessionStore>,
}

impl AppState {
    pub fn new(
        config: Config,
        repository: Arc<dyn ReviewRepository>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            config,
            repository,
            sessions,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn repository(&self) -> &dyn ReviewRepository {
        self.repository.as_ref()
    }

    /// Review state of one learner.
    pub fn session(&self, session_id: &str) -> ReviewSession<'_> {
        ReviewSession::new(self.sessions.as_ref(), session_id)
    }
}
