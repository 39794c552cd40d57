//! Storage configuration types and utilities

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Error, Result};

/// Durable repository backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendType {
    /// In-process maps, lost on restart (default)
    #[default]
    Memory,
    /// PostgreSQL via sqlx
    Postgres,
}

/// Live-state store backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiveStateBackend {
    /// Writes are accepted and dropped (default)
    #[default]
    None,
    Memory,
    Redis,
}

/// Main storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Repository backend type
    #[serde(default)]
    pub backend: BackendType,

    /// Live-state backend type
    #[serde(default)]
    pub live_state: LiveStateBackend,

    /// Default expiry for live-state markers
    #[serde(with = "humantime_serde", default = "default_live_state_ttl")]
    pub live_state_ttl: Duration,

    /// Required when `backend` is postgres
    #[serde(default)]
    pub postgres: Option<PostgresConfig>,

    /// Required when `live_state` is redis
    #[serde(default)]
    pub redis: Option<RedisConfig>,
}

/// PostgreSQL configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostgresConfig {
    pub connection_string: String,

    #[serde(default = "default_pool_size")]
    pub max_connections: u32,

    #[serde(with = "humantime_serde", default = "default_connection_timeout")]
    pub connection_timeout: Duration,
}

/// Redis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    pub url: String,

    /// Keys are `<prefix>:session:<id>:state`
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    #[serde(default = "default_redis_pool_size")]
    pub pool_size: usize,
}

// Default value functions for serde
fn default_pool_size() -> u32 {
    10
}

fn default_redis_pool_size() -> usize {
    8
}

fn default_connection_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_live_state_ttl() -> Duration {
    Duration::from_secs(2 * 60 * 60)
}

fn default_key_prefix() -> String {
    "interview".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BackendType::default(),
            live_state: LiveStateBackend::default(),
            live_state_ttl: default_live_state_ttl(),
            postgres: None,
            redis: None,
        }
    }
}

impl StorageConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (environment in production)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let backend = match lookup("ROUNDTABLE_STORAGE") {
            None => BackendType::default(),
            Some(value) => match value.to_lowercase().as_str() {
                "memory" => BackendType::Memory,
                "postgres" | "postgresql" => BackendType::Postgres,
                other => {
                    return Err(Error::config(format!(
                        "ROUNDTABLE_STORAGE `{other}` is not one of memory, postgres"
                    )))
                }
            },
        };

        let live_state = match lookup("ROUNDTABLE_LIVE_STATE") {
            None => LiveStateBackend::default(),
            Some(value) => match value.to_lowercase().as_str() {
                "none" | "" => LiveStateBackend::None,
                "memory" => LiveStateBackend::Memory,
                "redis" => LiveStateBackend::Redis,
                other => {
                    return Err(Error::config(format!(
                        "ROUNDTABLE_LIVE_STATE `{other}` is not one of none, memory, redis"
                    )))
                }
            },
        };

        let live_state_ttl = match lookup("ROUNDTABLE_LIVE_STATE_TTL") {
            None => default_live_state_ttl(),
            Some(value) => humantime_serde::re::humantime::parse_duration(&value).map_err(|e| {
                Error::config(format!("ROUNDTABLE_LIVE_STATE_TTL `{value}`: {e}"))
            })?,
        };

        let database_url = lookup("DATABASE_URL");
        if backend == BackendType::Postgres && database_url.is_none() {
            return Err(Error::config(
                "DATABASE_URL is required when ROUNDTABLE_STORAGE=postgres",
            ));
        }
        let max_connections = match lookup("DATABASE_POOL_SIZE") {
            None => default_pool_size(),
            Some(value) => value.parse().map_err(|_| {
                Error::config(format!("DATABASE_POOL_SIZE `{value}` is not a number"))
            })?,
        };
        let postgres = database_url.map(|connection_string| PostgresConfig {
            connection_string,
            max_connections,
            connection_timeout: default_connection_timeout(),
        });

        let redis_url = lookup("REDIS_URL");
        if live_state == LiveStateBackend::Redis && redis_url.is_none() {
            return Err(Error::config(
                "REDIS_URL is required when ROUNDTABLE_LIVE_STATE=redis",
            ));
        }
        let redis = redis_url.map(|url| RedisConfig {
            url,
            key_prefix: lookup("ROUNDTABLE_REDIS_PREFIX").unwrap_or_else(default_key_prefix),
            pool_size: default_redis_pool_size(),
        });

        Ok(Self {
            backend,
            live_state,
            live_state_ttl,
            postgres,
            redis,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_storage_config_default() {
        let config = StorageConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.backend, BackendType::Memory);
        assert_eq!(config.live_state, LiveStateBackend::None);
        assert_eq!(config.live_state_ttl, Duration::from_secs(7200));
        assert!(config.postgres.is_none());
        assert!(config.redis.is_none());
    }

    #[test]
    fn test_backend_type_serialization() {
        assert_eq!(
            serde_json::to_string(&BackendType::Postgres).unwrap(),
            r#""postgres""#
        );
        let live: LiveStateBackend = serde_json::from_str(r#""redis""#).unwrap();
        assert_eq!(live, LiveStateBackend::Redis);
    }

    #[test]
    fn test_postgres_requires_database_url() {
        let err =
            StorageConfig::from_lookup(lookup(&[("ROUNDTABLE_STORAGE", "postgres")])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);

        let config = StorageConfig::from_lookup(lookup(&[
            ("ROUNDTABLE_STORAGE", "postgres"),
            ("DATABASE_URL", "postgres://localhost/interviews"),
            ("DATABASE_POOL_SIZE", "4"),
        ]))
        .unwrap();
        let pg = config.postgres.unwrap();
        assert_eq!(pg.connection_string, "postgres://localhost/interviews");
        assert_eq!(pg.max_connections, 4);
    }

    #[test]
    fn test_redis_live_state_settings() {
        let config = StorageConfig::from_lookup(lookup(&[
            ("ROUNDTABLE_LIVE_STATE", "redis"),
            ("REDIS_URL", "redis://localhost:6379"),
            ("ROUNDTABLE_LIVE_STATE_TTL", "30m"),
        ]))
        .unwrap();

        assert_eq!(config.live_state, LiveStateBackend::Redis);
        assert_eq!(config.live_state_ttl, Duration::from_secs(1800));
        assert_eq!(config.redis.unwrap().key_prefix, "interview");
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let err = StorageConfig::from_lookup(lookup(&[("ROUNDTABLE_STORAGE", "s3")])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);

        let err =
            StorageConfig::from_lookup(lookup(&[("ROUNDTABLE_LIVE_STATE", "disk")])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_invalid_pool_size() {
        let err = StorageConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/db"),
            ("DATABASE_POOL_SIZE", "lots"),
        ]))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
