//! Core trait definitions for the storage abstraction layer

use async_trait::async_trait;
use std::time::Duration;

use super::error::StorageResult;
use super::types::LiveState;
use crate::domain::{Candidate, CandidateId, InterviewSession, SessionId};

/// Candidate persistence; `upsert` replaces the whole record
#[async_trait]
pub trait CandidateRepository: Send + Sync {
    async fn get_by_id(&self, id: &CandidateId) -> StorageResult<Option<Candidate>>;

    async fn upsert(&self, candidate: &Candidate) -> StorageResult<()>;
}

/// Session persistence; `upsert` replaces the session and all of its rounds
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn get_by_id(&self, id: &SessionId) -> StorageResult<Option<InterviewSession>>;

    async fn upsert(&self, session: &InterviewSession) -> StorageResult<()>;
}

/// Ephemeral live-state store, never the source of truth
#[async_trait]
pub trait LiveStateStore: Send + Sync {
    async fn get(&self, session_id: &SessionId) -> StorageResult<Option<LiveState>>;

    /// Write the marker; `ttl` of `None` uses the store's default
    async fn set(&self, state: &LiveState, ttl: Option<Duration>) -> StorageResult<()>;

    async fn clear(&self, session_id: &SessionId) -> StorageResult<()>;
}

