//! In-memory registry of live interview sessions.
//!
//! Sessions share nothing: each lives behind its own mutex, so commands on
//! one session serialize while different sessions run concurrently.
//! Sessions idle for longer than the configured TTL are evicted.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::session::Session;

pub type SessionHandle = Arc<Mutex<Session>>;

struct Entry {
    handle: SessionHandle,
    last_touched: Instant,
}

impl Entry {
    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.duration_since(self.last_touched) >= ttl
    }
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Entry>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub async fn insert(&self, session: Session) -> SessionHandle {
        let id = session.id();
        let handle = Arc::new(Mutex::new(session));
        let now = Instant::now();

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, entry| !entry.is_expired(now, self.ttl));
        sessions.insert(
            id,
            Entry {
                handle: handle.clone(),
                last_touched: now,
            },
        );
        handle
    }

    /// Looks up a live session and refreshes its idle timer.
    pub async fn get(&self, id: Uuid) -> Result<SessionHandle, AppError> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;

        match sessions.get_mut(&id) {
            Some(entry) if !entry.is_expired(now, self.ttl) => {
                entry.last_touched = now;
                Ok(entry.handle.clone())
            }
            Some(_) => {
                sessions.remove(&id);
                Err(not_found(id))
            }
            None => Err(not_found(id)),
        }
    }

    /// Discards a session entirely.
    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops every session idle for at least the TTL. Returns how many were dropped.
    pub async fn evict_expired(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| !entry.is_expired(now, self.ttl));
        before - sessions.len()
    }

    /// Runs `evict_expired` on a fixed period for the lifetime of the process.
    pub fn spawn_eviction(&self, period: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = interval(period);
            loop {
                ticker.tick().await;
                let evicted = store.evict_expired().await;
                if evicted > 0 {
                    info!("Evicted {evicted} idle session(s)");
                }
            }
        })
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::DocumentExtractor;
    use crate::interview::models::{Category, Difficulty};
    use crate::interview::session::SessionSetup;

    const TTL: Duration = Duration::from_secs(60);

    fn session() -> Session {
        Session::start(
            SessionSetup {
                resume: bytes::Bytes::from_static(b"resume"),
                job_description: "jd".to_string(),
                total_questions: 3,
                difficulty: Difficulty::Easy,
                categories: vec![Category::Technical],
            },
            &DocumentExtractor,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_insert_get_remove() {
        let store = SessionStore::new(TTL);
        let handle = store.insert(session()).await;
        let id = handle.lock().await.id();

        assert_eq!(store.get(id).await.unwrap().lock().await.id(), id);
        store.remove(id).await.unwrap();
        assert!(matches!(store.get(id).await, Err(AppError::NotFound(_))));
        assert!(matches!(store.remove(id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let store = SessionStore::new(TTL);
        let a = store.insert(session()).await;
        let b = store.insert(session()).await;

        let a_id = a.lock().await.id();
        let b_id = b.lock().await.id();
        assert_ne!(a_id, b_id);
        assert_eq!(store.count().await, 2);

        store.remove(a_id).await.unwrap();
        assert!(store.get(b_id).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_session_expires() {
        let store = SessionStore::new(TTL);
        let id = store.insert(session()).await.lock().await.id();

        tokio::time::advance(TTL).await;

        assert!(matches!(store.get(id).await, Err(AppError::NotFound(_))));
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_access_refreshes_idle_timer() {
        let store = SessionStore::new(TTL);
        let id = store.insert(session()).await.lock().await.id();

        tokio::time::advance(TTL / 2).await;
        store.get(id).await.unwrap();
        tokio::time::advance(TTL / 2).await;

        assert!(store.get(id).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_evict_expired_keeps_active_sessions() {
        let store = SessionStore::new(TTL);
        store.insert(session()).await;
        tokio::time::advance(TTL / 2).await;
        let fresh = store.insert(session()).await.lock().await.id();
        tokio::time::advance(TTL / 2).await;

        assert_eq!(store.evict_expired().await, 1);
        assert_eq!(store.count().await, 1);
        assert!(store.get(fresh).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_insert_prunes_abandoned_sessions() {
        let store = SessionStore::new(TTL);
        store.insert(session()).await;
        tokio::time::advance(TTL).await;

        store.insert(session()).await;
        assert_eq!(store.count().await, 1);
    }
}
