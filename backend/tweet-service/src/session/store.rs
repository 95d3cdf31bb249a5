//! In-process session storage.
//!
//! Sessions live only as long as the process; there is no persistence
//! across restarts. Entries past their TTL are evicted lazily on load and
//! by [`MemorySessionStore::purge_expired`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_session::storage::{LoadError, SaveError, SessionKey, SessionStore, UpdateError};
use actix_web::cookie::time::Duration as CookieDuration;
use dashmap::DashMap;
use rand::distributions::{Alphanumeric, DistString};

const SESSION_KEY_LEN: usize = 64;

type SessionState = HashMap<String, String>;

#[derive(Debug)]
struct Entry {
    state: SessionState,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Shared map from session key to session state.
///
/// Only [`SessionStore::save`] creates entries. Updates for a key that has
/// been deleted (logout racing another request) are dropped.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<DashMap<String, Entry>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every entry past its TTL.
    pub fn purge_expired(&self) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, entry| !entry.is_expired());
        before.saturating_sub(self.sessions.len())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

fn deadline(ttl: &CookieDuration) -> Instant {
    Instant::now() + Duration::from_secs(ttl.whole_seconds().max(0) as u64)
}

impl SessionStore for MemorySessionStore {
    async fn load(&self, session_key: &SessionKey) -> Result<Option<SessionState>, LoadError> {
        let key = session_key.as_ref();
        let expired = match self.sessions.get(key) {
            Some(entry) if !entry.is_expired() => return Ok(Some(entry.state.clone())),
            Some(_) => true,
            None => false,
        };

        if expired {
            self.sessions.remove(key);
            tracing::debug!("expired session evicted");
        }
        Ok(None)
    }

    async fn save(
        &self,
        session_state: SessionState,
        ttl: &CookieDuration,
    ) -> Result<SessionKey, SaveError> {
        let key = Alphanumeric.sample_string(&mut rand::thread_rng(), SESSION_KEY_LEN);
        self.sessions.insert(
            key.clone(),
            Entry {
                state: session_state,
                expires_at: deadline(ttl),
            },
        );
        tracing::debug!(sessions = self.sessions.len(), "session created");

        SessionKey::try_from(key).map_err(|e| SaveError::Other(anyhow::anyhow!("{e}")))
    }

    async fn update(
        &self,
        session_key: SessionKey,
        session_state: SessionState,
        ttl: &CookieDuration,
    ) -> Result<SessionKey, UpdateError> {
        match self.sessions.get_mut(session_key.as_ref()) {
            Some(mut entry) => {
                entry.state = session_state;
                entry.expires_at = deadline(ttl);
            }
            None => tracing::debug!("update for deleted session dropped"),
        }
        Ok(session_key)
    }

    async fn update_ttl(
        &self,
        session_key: &SessionKey,
        ttl: &CookieDuration,
    ) -> Result<(), anyhow::Error> {
        if let Some(mut entry) = self.sessions.get_mut(session_key.as_ref()) {
            entry.expires_at = deadline(ttl);
        }
        Ok(())
    }

    async fn delete(&self, session_key: &SessionKey) -> Result<(), anyhow::Error> {
        self.sessions.remove(session_key.as_ref());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(token: &str) -> SessionState {
        HashMap::from([("twitter".to_string(), format!(r#"{{"access_token":"{token}"}}"#))])
    }

    #[actix_web::test]
    async fn test_save_then_load() {
        let store = MemorySessionStore::new();
        let key = store
            .save(state("at"), &CookieDuration::minutes(10))
            .await
            .unwrap();

        assert_eq!(key.as_ref().len(), SESSION_KEY_LEN);
        assert_eq!(store.load(&key).await.unwrap(), Some(state("at")));
        assert_eq!(store.len(), 1);
    }

    #[actix_web::test]
    async fn test_update_after_delete_does_not_resurrect() {
        let store = MemorySessionStore::new();
        let key = store
            .save(state("req"), &CookieDuration::minutes(10))
            .await
            .unwrap();
        let callback_key = SessionKey::try_from(key.as_ref().to_string()).unwrap();

        store.delete(&key).await.unwrap();
        store
            .update(callback_key, state("at"), &CookieDuration::minutes(10))
            .await
            .unwrap();
        store
            .update_ttl(&key, &CookieDuration::minutes(10))
            .await
            .unwrap();

        assert!(store.is_empty());
        assert_eq!(store.load(&key).await.unwrap(), None);
    }

    #[actix_web::test]
    async fn test_update_replaces_state() {
        let store = MemorySessionStore::new();
        let key = store
            .save(state("first"), &CookieDuration::minutes(10))
            .await
            .unwrap();

        let key = store
            .update(key, state("second"), &CookieDuration::minutes(10))
            .await
            .unwrap();

        assert_eq!(store.load(&key).await.unwrap(), Some(state("second")));
    }

    #[actix_web::test]
    async fn test_expired_sessions_are_evicted_on_load() {
        let store = MemorySessionStore::new();
        let key = store
            .save(state("at"), &CookieDuration::ZERO)
            .await
            .unwrap();

        assert_eq!(store.load(&key).await.unwrap(), None);
        assert!(store.is_empty());
    }

    #[actix_web::test]
    async fn test_purge_expired() {
        let store = MemorySessionStore::new();
        store.save(state("a"), &CookieDuration::ZERO).await.unwrap();
        store.save(state("b"), &CookieDuration::ZERO).await.unwrap();
        store
            .save(state("c"), &CookieDuration::minutes(10))
            .await
            .unwrap();

        assert_eq!(store.purge_expired(), 2);
        assert_eq!(store.len(), 1);
    }
}
