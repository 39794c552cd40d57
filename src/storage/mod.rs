//! Storage abstraction layer
//!
//! Durable repositories hold candidates and sessions; the live-state store
//! holds a best-effort progress marker per active session.

pub mod backends;
pub mod config;
pub mod error;
pub mod factory;
pub mod traits;
pub mod types;

pub use config::{BackendType, LiveStateBackend, PostgresConfig, RedisConfig, StorageConfig};
pub use error::{StorageError, StorageResult};
pub use factory::StorageFactory;
pub use traits::{CandidateRepository, LiveStateStore, SessionRepository};
pub use types::LiveState;

use std::sync::Arc;

use backends::{MemoryBackend, NoopLiveStateStore};

/// Repositories and live-state store wired together
#[derive(Clone)]
pub struct Storage {
    pub candidates: Arc<dyn CandidateRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub live_state: Arc<dyn LiveStateStore>,
}

impl Storage {
    /// In-memory repositories with no live-state store
    pub fn in_memory() -> Self {
        let backend = MemoryBackend::new();
        Self {
            candidates: Arc::new(backend.clone()),
            sessions: Arc::new(backend),
            live_state: Arc::new(NoopLiveStateStore),
        }
    }
}

