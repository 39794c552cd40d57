//! Live-state store that keeps nothing

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::SessionId;
use crate::storage::{error::StorageResult, traits::LiveStateStore, types::LiveState};

/// Always absent on read, always acknowledges writes
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLiveStateStore;

#[async_trait]
impl LiveStateStore for NoopLiveStateStore {
    async fn get(&self, _session_id: &SessionId) -> StorageResult<Option<LiveState>> {
        Ok(None)
    }

    async fn set(&self, _state: &LiveState, _ttl: Option<Duration>) -> StorageResult<()> {
        Ok(())
    }

    async fn clear(&self, _session_id: &SessionId) -> StorageResult<()> {
        Ok(())
    }
}
