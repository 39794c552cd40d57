//! Per-session mutual exclusion
//!
//! Mutations of one session are applied one at a time; different sessions
//! proceed in parallel. The registry is process-local.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::SessionId;

/// Held for the duration of one session mutation
pub type SessionGuard = OwnedMutexGuard<()>;

#[derive(Default)]
pub struct SessionLocks {
    locks: StdMutex<HashMap<SessionId, Arc<Mutex<()>>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `session_id`
    pub async fn acquire(&self, session_id: &SessionId) -> SessionGuard {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            // Entries nobody holds or waits on can go
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(session_id.clone()).or_default())
        };
        lock.lock_owned().await
    }

    /// Number of sessions with a live lock entry
    pub fn tracked(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}
