//! Storage backend implementations

pub mod memory;
pub mod noop;
#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "redis")]
pub mod redis;

pub use memory::{MemoryBackend, MemoryLiveStateStore};
pub use noop::NoopLiveStateStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresBackend;
#[cfg(feature = "redis")]
pub use redis::RedisLiveStateStore;
