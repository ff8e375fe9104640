//! In-memory registry of running sessions.
//!
//! Sessions are dropped by `DELETE`, or by [`SessionStore::sweep`] once they
//! have been completed and unread for the retention window, or untouched for
//! the idle timeout.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use drill_core::{LiveSession, SessionConfig, SessionMachine, Validator, Word};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use uuid::Uuid;

pub const DEFAULT_RETENTION: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60 * 60);

struct Entry {
    session: Arc<LiveSession>,
    last_seen: Instant,
}

pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Entry>>,
    /// How long a completed session stays readable.
    retention: Duration,
    /// How long any session may go without a request.
    idle_timeout: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_RETENTION, DEFAULT_IDLE_TIMEOUT)
    }
}

impl SessionStore {
    pub fn new(retention: Duration, idle_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            retention,
            idle_timeout,
        }
    }

    /// Start a session and register it under a fresh id.
    pub async fn create(
        &self,
        words: Vec<Word>,
        config: SessionConfig,
        validator: Validator,
    ) -> (Uuid, Arc<LiveSession>) {
        let machine = SessionMachine::new(words, config, validator);
        let session = Arc::new(LiveSession::start(machine).await);
        let id = Uuid::new_v4();

        self.sessions.write().await.insert(
            id,
            Entry {
                session: session.clone(),
                last_seen: Instant::now(),
            },
        );
        tracing::info!("Started session {}", id);

        (id, session)
    }

    /// Look up a session and mark it as seen.
    pub async fn get(&self, id: Uuid) -> Option<Arc<LiveSession>> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id)?;
        entry.last_seen = Instant::now();
        Some(entry.session.clone())
    }

    /// Stop a session's background work and forget it.
    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id);
        match removed {
            Some(entry) => {
                entry.session.close().await;
                tracing::info!("Closed session {}", id);
                true
            }
            None => false,
        }
    }

    /// Drop expired sessions and return how many went.
    pub async fn sweep(&self) -> usize {
        let now = Instant::now();
        let snapshot: Vec<(Uuid, Arc<LiveSession>, Duration)> = self
            .sessions
            .read()
            .await
            .iter()
            .map(|(id, entry)| {
                let idle = now.saturating_duration_since(entry.last_seen);
                (*id, entry.session.clone(), idle)
            })
            .collect();

        let mut expired = Vec::new();
        for (id, session, idle) in snapshot {
            let completed = session.state().await.is_completed();
            if idle >= self.idle_timeout || (completed && idle >= self.retention) {
                expired.push(id);
            }
        }

        let mut evicted = 0;
        for id in expired {
            let removed = {
                let mut sessions = self.sessions.write().await;
                // a request since the snapshot keeps the session alive
                match sessions.get(&id) {
                    Some(entry) if entry.last_seen <= now => sessions.remove(&id),
                    _ => None,
                }
            };
            if let Some(entry) = removed {
                entry.session.close().await;
                evicted += 1;
            }
        }
        if evicted > 0 {
            tracing::info!("Evicted {} expired sessions", evicted);
        }
        evicted
    }

    /// Sweep every `period` until the store is dropped.
    pub fn spawn_sweeper(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let weak: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let Some(store) = weak.upgrade() else {
                    break;
                };
                store.sweep().await;
            }
        })
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
