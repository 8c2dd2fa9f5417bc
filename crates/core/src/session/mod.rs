//! Per-learner review state kept between requests.
//!
//! The engine only needs a small key-value surface, so storage is a narrow
//! [`SessionStore`] trait and the typed view over it is [`ReviewSession`].

mod memory;

pub use memory::InMemorySessionStore;

use tracing::warn;

use crate::selection::SelectionConfig;

/// Key holding the serialized selection configuration.
pub const CRITERIA_KEY: &str = "review.criteria";
/// Key holding the id of the last word shown.
pub const LAST_WORD_KEY: &str = "review.last_word_id";

/// Key-value storage scoped by session id.
pub trait SessionStore: Send + Sync {
    fn get(&self, session_id: &str, key: &str) -> Option<String>;

    fn set(&self, session_id: &str, key: &str, value: String);

    fn remove(&self, session_id: &str, key: &str);
}

/// Typed access to one learner's review state.
pub struct ReviewSession<'a> {
    store: &'a dyn SessionStore,
    session_id: String,
}

impl<'a> ReviewSession<'a> {
    pub fn new(store: &'a dyn SessionStore, session_id: impl Into<String>) -> Self {
        Self {
            store,
            session_id: session_id.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.session_id
    }

    /// Stored criteria. Unreadable entries are treated as absent.
    pub fn criteria(&self) -> Option<SelectionConfig> {
        let raw = self.store.get(&self.session_id, CRITERIA_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!(session = %self.session_id, error = %e, "Discarding unreadable review criteria");
                None
            }
        }
    }

    /// Persist new criteria. Switching to different criteria forgets the
    /// last shown word.
    pub fn set_criteria(&self, config: &SelectionConfig) {
        let previous = self.criteria();
        if previous.as_ref().map(SelectionConfig::selection) != Some(config.selection()) {
            self.store.remove(&self.session_id, LAST_WORD_KEY);
        }

        match serde_json::to_string(config) {
            Ok(raw) => self.store.set(&self.session_id, CRITERIA_KEY, raw),
            Err(e) => {
                warn!(session = %self.session_id, error = %e, "Failed to serialize review criteria")
            }
        }
    }

    pub fn last_word_id(&self) -> Option<i64> {
        self.store
            .get(&self.session_id, LAST_WORD_KEY)
            .and_then(|raw| raw.parse().ok())
    }

    pub fn set_last_word_id(&self, id: i64) {
        self.store
            .set(&self.session_id, LAST_WORD_KEY, id.to_string());
    }
}
