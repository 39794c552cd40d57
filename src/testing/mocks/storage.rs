//! Storage doubles

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::domain::SessionId;
use crate::storage::{LiveState, LiveStateStore, StorageError, StorageResult};

/// Live-state store whose every call fails
#[derive(Debug, Default)]
pub struct FailingLiveStateStore {
    calls: AtomicUsize,
}

impl FailingLiveStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail<T>(&self) -> StorageResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::unavailable("live state store offline"))
    }
}

#[async_trait]
impl LiveStateStore for FailingLiveStateStore {
    async fn get(&self, _session_id: &SessionId) -> StorageResult<Option<LiveState>> {
        self.fail()
    }

    async fn set(&self, _state: &LiveState, _ttl: Option<Duration>) -> StorageResult<()> {
        self.fail()
    }

    async fn clear(&self, _session_id: &SessionId) -> StorageResult<()> {
        self.fail()
    }
}
