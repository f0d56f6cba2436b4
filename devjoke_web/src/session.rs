use crate::{Error, Result};
use devjoke_conversation::ConversationSession;
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};
use tracing::{debug, info};
use uuid::Uuid;

/// Upper bound on the time between two idle sweeps.
const MAX_SWEEP_PERIOD: Duration = Duration::from_secs(60);

struct Entry {
    session: Arc<Mutex<ConversationSession>>,
    last_seen: Instant,
}

/// Live sessions keyed by id.
///
/// The outer lock is only held for lookups. Each session has its own lock,
/// held for a whole interaction, so requests within one session run one at
/// a time while other sessions proceed. Sessions nobody has touched for
/// longer than the idle TTL are dropped by [`SessionStore::evict_idle`].
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, Entry>>>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new empty session and return its id.
    pub async fn create(&self) -> Uuid {
        let session = ConversationSession::new();
        let id = session.id;

        self.sessions.lock().await.insert(
            id,
            Entry {
                session: Arc::new(Mutex::new(session)),
                last_seen: Instant::now(),
            },
        );

        info!("Created session: {id}");
        id
    }

    /// Look up a session and mark it as active.
    pub async fn get(&self, id: Uuid) -> Result<Arc<Mutex<ConversationSession>>> {
        let mut sessions = self.sessions.lock().await;
        let entry = sessions.get_mut(&id).ok_or(Error::SessionNotFound(id))?;
        entry.last_seen = Instant::now();
        Ok(Arc::clone(&entry.session))
    }

    /// Discard a session and its history.
    pub async fn remove(&self, id: Uuid) -> Result<()> {
        self.sessions
            .lock()
            .await
            .remove(&id)
            .map(|_| info!("Ended session: {id}"))
            .ok_or(Error::SessionNotFound(id))
    }

    /// Drop sessions idle for at least `ttl`. A session still borrowed by a
    /// request is kept. Returns how many were dropped.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();

        sessions.retain(|id, entry| {
            let keep = Arc::strong_count(&entry.session) > 1 || entry.last_seen.elapsed() < ttl;
            if !keep {
                debug!("Expired idle session: {id}");
            }
            keep
        });

        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("Expired {evicted} idle sessions, {} active", sessions.len());
        }
        evicted
    }

    /// Run [`SessionStore::evict_idle`] periodically until the task is aborted.
    #[must_use]
    pub fn spawn_sweeper(&self, ttl: Duration) -> JoinHandle<()> {
        let store = self.clone();
        let period = ttl.clamp(Duration::from_secs(1), MAX_SWEEP_PERIOD);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                store.evict_idle(ttl).await;
            }
        })
    }
}
