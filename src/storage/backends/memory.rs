//! In-memory storage backend

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::domain::{Candidate, CandidateId, InterviewSession, SessionId};
use crate::storage::{
    error::StorageResult,
    traits::{CandidateRepository, LiveStateStore, SessionRepository},
    types::LiveState,
};

/// In-memory candidate and session repositories
#[derive(Clone, Default)]
pub struct MemoryBackend {
    candidates: Arc<RwLock<HashMap<CandidateId, Candidate>>>,
    sessions: Arc<RwLock<HashMap<SessionId, InterviewSession>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl CandidateRepository for MemoryBackend {
    async fn get_by_id(&self, id: &CandidateId) -> StorageResult<Option<Candidate>> {
        Ok(self.candidates.read().await.get(id).cloned())
    }

    async fn upsert(&self, candidate: &Candidate) -> StorageResult<()> {
        self.candidates
            .write()
            .await
            .insert(candidate.id.clone(), candidate.clone());
        Ok(())
    }
}

#[async_trait]
impl SessionRepository for MemoryBackend {
    async fn get_by_id(&self, id: &SessionId) -> StorageResult<Option<InterviewSession>> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn upsert(&self, session: &InterviewSession) -> StorageResult<()> {
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session.clone());
        Ok(())
    }
}

struct LiveEntry {
    state: LiveState,
    expires_at: Instant,
}

/// Live-state markers held in process; expired entries read as absent
pub struct MemoryLiveStateStore {
    entries: Arc<RwLock<HashMap<SessionId, LiveEntry>>>,
    default_ttl: Duration,
}

impl MemoryLiveStateStore {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            default_ttl,
        }
    }
}

/// Longer TTLs are capped here; about a century
const LONGEST_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

fn expiry(now: Instant, ttl: Duration) -> Instant {
    now + ttl.min(LONGEST_TTL)
}

#[async_trait]
impl LiveStateStore for MemoryLiveStateStore {
    async fn get(&self, session_id: &SessionId) -> StorageResult<Option<LiveState>> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(session_id)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.state.clone()))
    }

    async fn set(&self, state: &LiveState, ttl: Option<Duration>) -> StorageResult<()> {
        let now = Instant::now();
        let expires_at = expiry(now, ttl.unwrap_or(self.default_ttl));
        let mut entries = self.entries.write().await;

        // Opportunistic sweep so abandoned sessions do not accumulate
        entries.retain(|_, entry| entry.expires_at > now);

        entries.insert(
            state.session_id.clone(),
            LiveEntry {
                state: state.clone(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn clear(&self, session_id: &SessionId) -> StorageResult<()> {
        self.entries.write().await.remove(session_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InterviewContext, InterviewState, Level};
    use chrono::Utc;

    fn session(id: &str) -> InterviewSession {
        InterviewSession::new(
            SessionId::from_string(id),
            CandidateId::from_string("c-1"),
            InterviewContext {
                role: "backend".to_string(),
                level: Level::Senior,
            },
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_session_upsert_replaces_record() {
        let backend = MemoryBackend::new();
        let mut s = session("s-1");
        SessionRepository::upsert(&backend, &s).await.unwrap();

        s.state = InterviewState::Screening;
        SessionRepository::upsert(&backend, &s).await.unwrap();

        let loaded = SessionRepository::get_by_id(&backend, &s.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.state, InterviewState::Screening);
        assert_eq!(backend.session_count().await, 1);
    }

    #[tokio::test]
    async fn test_missing_records_are_none() {
        let backend = MemoryBackend::new();
        assert!(
            CandidateRepository::get_by_id(&backend, &CandidateId::from_string("nope"))
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            SessionRepository::get_by_id(&backend, &SessionId::from_string("nope"))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_candidate_round_trip() {
        let backend = MemoryBackend::new();
        let candidate = Candidate::new(CandidateId::from_string("c-9"), Utc::now());
        CandidateRepository::upsert(&backend, &candidate).await.unwrap();

        let loaded = CandidateRepository::get_by_id(&backend, &candidate.id)
            .await
            .unwrap();
        assert_eq!(loaded, Some(candidate));
    }

    #[tokio::test]
    async fn test_live_state_set_get_clear() {
        let store = MemoryLiveStateStore::new(Duration::from_secs(60));
        let live = LiveState::from_session(&session("s-2"), Utc::now());

        store.set(&live, None).await.unwrap();
        assert_eq!(store.get(&live.session_id).await.unwrap(), Some(live.clone()));

        store.clear(&live.session_id).await.unwrap();
        assert!(store.get(&live.session_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unbounded_ttl_is_capped() {
        let store = MemoryLiveStateStore::new(Duration::MAX);
        let live = LiveState::from_session(&session("s-4"), Utc::now());

        store.set(&live, None).await.unwrap();
        store.set(&live, Some(Duration::MAX)).await.unwrap();
        assert_eq!(store.get(&live.session_id).await.unwrap(), Some(live.clone()));
    }

    #[tokio::test]
    async fn test_live_state_expires() {
        let store = MemoryLiveStateStore::new(Duration::from_secs(60));
        let live = LiveState::from_session(&session("s-3"), Utc::now());

        store.set(&live, Some(Duration::from_millis(5))).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(store.get(&live.session_id).await.unwrap().is_none());
    }
}
