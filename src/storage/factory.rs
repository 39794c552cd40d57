//! Storage factory for creating storage instances

use std::sync::Arc;
use tracing::info;

use super::backends::{MemoryBackend, MemoryLiveStateStore, NoopLiveStateStore};
#[cfg(feature = "postgres")]
use super::backends::PostgresBackend;
#[cfg(feature = "redis")]
use super::backends::RedisLiveStateStore;
use super::config::{BackendType, LiveStateBackend, StorageConfig};
use super::error::{StorageError, StorageResult};
use super::traits::{CandidateRepository, LiveStateStore, SessionRepository};
use super::Storage;

/// Factory for creating storage instances
pub struct StorageFactory;

impl StorageFactory {
    /// Create storage from explicit configuration
    pub async fn from_config(config: &StorageConfig) -> StorageResult<Storage> {
        let (candidates, sessions) = Self::repositories(config).await?;
        let live_state = Self::live_state(config).await?;

        info!(
            backend = ?config.backend,
            live_state = ?config.live_state,
            "Storage initialized"
        );

        Ok(Storage {
            candidates,
            sessions,
            live_state,
        })
    }

    async fn repositories(
        config: &StorageConfig,
    ) -> StorageResult<(Arc<dyn CandidateRepository>, Arc<dyn SessionRepository>)> {
        match config.backend {
            BackendType::Memory => {
                let backend = MemoryBackend::new();
                Ok((Arc::new(backend.clone()), Arc::new(backend)))
            }
            #[cfg(feature = "postgres")]
            BackendType::Postgres => {
                let pg_config = config.postgres.as_ref().ok_or_else(|| {
                    StorageError::configuration("Missing PostgreSQL configuration")
                })?;
                let backend = PostgresBackend::new(pg_config).await?;
                Ok((Arc::new(backend.clone()), Arc::new(backend)))
            }
            #[cfg(not(feature = "postgres"))]
            BackendType::Postgres => Err(StorageError::configuration(
                "PostgreSQL backend not enabled. Enable with --features postgres",
            )),
        }
    }

    async fn live_state(config: &StorageConfig) -> StorageResult<Arc<dyn LiveStateStore>> {
        match config.live_state {
            LiveStateBackend::None => Ok(Arc::new(NoopLiveStateStore)),
            LiveStateBackend::Memory => {
                Ok(Arc::new(MemoryLiveStateStore::new(config.live_state_ttl)))
            }
            #[cfg(feature = "redis")]
            LiveStateBackend::Redis => {
                let redis_config = config
                    .redis
                    .as_ref()
                    .ok_or_else(|| StorageError::configuration("Missing Redis configuration"))?;
                let store = RedisLiveStateStore::new(redis_config, config.live_state_ttl).await?;
                Ok(Arc::new(store))
            }
            #[cfg(not(feature = "redis"))]
            LiveStateBackend::Redis => Err(StorageError::configuration(
                "Redis live-state store not enabled. Enable with --features redis",
            )),
        }
    }
}
