use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::{
    sync::RwLock,
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};
use uuid::Uuid;

use crate::{
    catalog::CatalogStore,
    models::SessionState,
    services::{ChatResponder, MusicSearchProvider},
};

const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Shared application state
pub struct AppState {
    pub catalog: Arc<CatalogStore>,
    pub music_search: Arc<dyn MusicSearchProvider>,
    pub chat: ChatResponder,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(
        catalog: Arc<CatalogStore>,
        music_search: Arc<dyn MusicSearchProvider>,
        chat: ChatResponder,
    ) -> Self {
        Self {
            catalog,
            music_search,
            chat,
            sessions: SessionStore::new(),
        }
    }
}

/// Per-session presentation state, keyed by session id
///
/// The lock is only held to read or swap a state; it is never held across
/// outbound calls. Sessions that see no activity for longer than the idle
/// limit are dropped by [`SessionStore::spawn_eviction`].
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
}

#[derive(Clone)]
struct SessionEntry {
    state: SessionState,
    last_seen: Instant,
}

impl SessionEntry {
    fn new(state: SessionState) -> Self {
        Self {
            state,
            last_seen: Instant::now(),
        }
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new idle session
    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.inner
            .write()
            .await
            .insert(id, SessionEntry::new(SessionState::default()));
        id
    }

    /// Returns a copy of the session state and marks the session active
    pub async fn get(&self, id: Uuid) -> Option<SessionState> {
        let mut sessions = self.inner.write().await;
        let entry = sessions.get_mut(&id)?;
        entry.last_seen = Instant::now();
        Some(entry.state.clone())
    }

    /// Checks that a session exists and marks it active
    pub async fn touch(&self, id: Uuid) -> bool {
        match self.inner.write().await.get_mut(&id) {
            Some(entry) => {
                entry.last_seen = Instant::now();
                true
            }
            None => false,
        }
    }

    /// Replaces the whole state of an existing session
    ///
    /// Returns `false` if the session ended in the meantime.
    pub async fn replace(&self, id: Uuid, state: SessionState) -> bool {
        match self.inner.write().await.get_mut(&id) {
            Some(slot) => {
                *slot = SessionEntry::new(state);
                true
            }
            None => false,
        }
    }

    /// Ends a session, returning whether it existed
    pub async fn remove(&self, id: Uuid) -> bool {
        self.inner.write().await.remove(&id).is_some()
    }

    /// Drops every session idle for longer than `max_idle`
    ///
    /// Returns the number of sessions removed.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.inner.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_seen.elapsed() <= max_idle);
        before - sessions.len()
    }

    /// Runs [`SessionStore::evict_idle`] in the background
    ///
    /// Sweeps every half idle period, at least once per second.
    pub fn spawn_eviction(&self, max_idle: Duration) -> JoinHandle<()> {
        let store = self.clone();
        let period = (max_idle / 2).max(MIN_SWEEP_INTERVAL);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let evicted = store.evict_idle(max_idle).await;
                if evicted > 0 {
                    let remaining = store.len().await;
                    tracing::info!(
                        evicted,
                        remaining,
                        "Evicted idle sessions"
                    );
                }
            }
        })
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
