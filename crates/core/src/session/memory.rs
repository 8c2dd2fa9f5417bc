use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use tracing::debug;

use super::SessionStore;
use crate::config::SessionConfig;

#[derive(Debug)]
struct SessionEntry {
    values: HashMap<String, String>,
    touched: Instant,
}

/// Process-local session storage. State is lost on restart.
///
/// Sessions idle for longer than the timeout are dropped, and at most
/// `capacity` sessions are kept; the least recently written one makes room.
/// Idle time counts from the last write.
#[derive(Debug)]
pub struct InMemorySessionStore {
    entries: RwLock<HashMap<String, SessionEntry>>,
    capacity: usize,
    idle_timeout: Duration,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::from_config(&SessionConfig::default())
    }
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(capacity: usize, idle_timeout: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
            idle_timeout,
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::with_limits(config.capacity, config.idle_timeout())
    }

    /// Number of sessions held, including idle ones not yet pruned.
    pub fn session_count(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn is_idle(&self, entry: &SessionEntry, now: Instant) -> bool {
        now.saturating_duration_since(entry.touched) > self.idle_timeout
    }

    /// Drop sessions idle at `now`. Returns how many were dropped.
    fn expire_idle(&self, entries: &mut HashMap<String, SessionEntry>, now: Instant) -> usize {
        let before = entries.len();
        entries.retain(|_, entry| !self.is_idle(entry, now));
        before - entries.len()
    }

    fn evict_oldest(entries: &mut HashMap<String, SessionEntry>) {
        let oldest = entries
            .iter()
            .min_by_key(|(_, entry)| entry.touched)
            .map(|(id, _)| id.clone());
        if let Some(id) = oldest {
            entries.remove(&id);
            debug!(session = %id, "Evicted least recently used session");
        }
    }

    fn set_at(&self, session_id: &str, key: &str, value: String, now: Instant) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        let expired = self.expire_idle(&mut entries, now);
        if expired > 0 {
            debug!(expired, "Dropped idle sessions");
        }

        if !entries.contains_key(session_id) && entries.len() >= self.capacity {
            Self::evict_oldest(&mut entries);
        }

        let entry = entries
            .entry(session_id.to_string())
            .or_insert_with(|| SessionEntry {
                values: HashMap::new(),
                touched: now,
            });
        entry.touched = now;
        entry.values.insert(key.to_string(), value);
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, session_id: &str, key: &str) -> Option<String> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let entry = entries.get(session_id)?;
        if self.is_idle(entry, Instant::now()) {
            return None;
        }
        entry.values.get(key).cloned()
    }

    fn set(&self, session_id: &str, key: &str, value: String) {
        self.set_at(session_id, key, value, Instant::now());
    }

    fn remove(&self, session_id: &str, key: &str) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = entries.get_mut(session_id) {
            entry.values.remove(key);
            if entry.values.is_empty() {
                entries.remove(session_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = InMemorySessionStore::new();
        store.set("s", "k", "v".to_string());
        assert_eq!(store.get("s", "k").as_deref(), Some("v"));
        assert_eq!(store.session_count(), 1);

        store.remove("s", "k");
        assert!(store.get("s", "k").is_none());
        assert_eq!(store.session_count(), 0);
    }

    #[test]
    fn test_overwrite() {
        let store = InMemorySessionStore::new();
        store.set("s", "k", "1".to_string());
        store.set("s", "k", "2".to_string());
        assert_eq!(store.get("s", "k").as_deref(), Some("2"));
    }

    #[test]
    fn test_session_count_stays_within_capacity() {
        let store = InMemorySessionStore::with_limits(3, Duration::from_secs(3600));
        let start = Instant::now();
        for i in 0..50u64 {
            store.set_at(
                &format!("anonymous-{}", i),
                "k",
                i.to_string(),
                start + Duration::from_millis(i),
            );
        }

        assert_eq!(store.session_count(), 3);
        assert_eq!(store.get("anonymous-49", "k").as_deref(), Some("49"));
        assert!(store.get("anonymous-0", "k").is_none());
    }

    #[test]
    fn test_recently_written_session_survives_eviction() {
        let store = InMemorySessionStore::with_limits(2, Duration::from_secs(3600));
        let start = Instant::now();
        store.set_at("a", "k", "a".to_string(), start);
        store.set_at("b", "k", "b".to_string(), start + Duration::from_millis(1));
        store.set_at("a", "k", "a2".to_string(), start + Duration::from_millis(2));
        store.set_at("c", "k", "c".to_string(), start + Duration::from_millis(3));

        assert_eq!(store.get("a", "k").as_deref(), Some("a2"));
        assert!(store.get("b", "k").is_none());
        assert_eq!(store.get("c", "k").as_deref(), Some("c"));
    }

    #[test]
    fn test_idle_sessions_are_dropped_on_write() {
        let store = InMemorySessionStore::with_limits(100, Duration::from_secs(60));
        let start = Instant::now();
        store.set_at("old", "k", "v".to_string(), start);
        store.set_at("new", "k", "v".to_string(), start + Duration::from_secs(61));

        assert_eq!(store.session_count(), 1);
        assert!(store.get("old", "k").is_none());
    }

    #[test]
    fn test_idle_session_is_not_read() {
        let store = InMemorySessionStore::with_limits(100, Duration::ZERO);
        store.set_at("s", "k", "v".to_string(), Instant::now() - Duration::from_secs(1));
        assert!(store.get("s", "k").is_none());
    }
}
