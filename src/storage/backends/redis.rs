//! Redis live-state store
//!
//! Each session's marker is a hash at `<prefix>:session:<id>:state` with the
//! fields `state`, `currentRound`, `questionIndex` and `updatedAt`. Writes set
//! the hash and its expiry inside one MULTI block.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_redis::{Config, Pool, PoolConfig, Runtime};
use redis::AsyncCommands;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

use crate::domain::{InterviewState, RoundType, SessionId};
use crate::storage::config::RedisConfig;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::traits::LiveStateStore;
use crate::storage::types::LiveState;

/// Redis-backed [`LiveStateStore`]
pub struct RedisLiveStateStore {
    pool: Pool,
    key_prefix: String,
    default_ttl: Duration,
}

impl RedisLiveStateStore {
    /// Create the pool and verify the server answers
    pub async fn new(config: &RedisConfig, default_ttl: Duration) -> StorageResult<Self> {
        info!("Initializing Redis live-state store");

        let mut pool_config = Config::from_url(&config.url);
        pool_config.pool = Some(PoolConfig::new(config.pool_size));

        let pool = pool_config
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| StorageError::connection(format!("Failed to create Redis pool: {}", e)))?;

        let store = Self {
            pool,
            key_prefix: config.key_prefix.clone(),
            default_ttl,
        };

        let mut conn = store.connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;

        Ok(store)
    }

    fn make_key(&self, session_id: &SessionId) -> String {
        format!("{}:session:{}:state", self.key_prefix, session_id)
    }

    async fn connection(&self) -> StorageResult<deadpool_redis::Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| StorageError::connection(format!("Failed to connect to Redis: {}", e)))
    }
}

/// Rebuild a marker from its hash fields
fn parse_fields(
    session_id: &SessionId,
    fields: &HashMap<String, String>,
) -> StorageResult<LiveState> {
    let state = fields
        .get("state")
        .ok_or_else(|| StorageError::corrupt("live state hash has no `state` field"))?;

    let current_round = match fields.get("currentRound").map(String::as_str) {
        None | Some("") => None,
        Some(round) => Some(round.parse::<RoundType>().map_err(StorageError::corrupt)?),
    };

    Ok(LiveState {
        session_id: session_id.clone(),
        state: state.parse::<InterviewState>().map_err(StorageError::corrupt)?,
        current_round,
        question_index: fields
            .get("questionIndex")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0),
        updated_at: fields
            .get("updatedAt")
            .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(Utc::now),
    })
}

fn to_fields(state: &LiveState) -> Vec<(&'static str, String)> {
    vec![
        ("state", state.state.as_str().to_string()),
        (
            "currentRound",
            state
                .current_round
                .map(|r| r.as_str().to_string())
                .unwrap_or_default(),
        ),
        ("questionIndex", state.question_index.to_string()),
        ("updatedAt", state.updated_at.to_rfc3339()),
    ]
}

#[async_trait]
impl LiveStateStore for RedisLiveStateStore {
    async fn get(&self, session_id: &SessionId) -> StorageResult<Option<LiveState>> {
        let mut conn = self.connection().await?;
        let fields: HashMap<String, String> = conn.hgetall(self.make_key(session_id)).await?;

        if fields.is_empty() {
            return Ok(None);
        }
        parse_fields(session_id, &fields).map(Some)
    }

    async fn set(&self, state: &LiveState, ttl: Option<Duration>) -> StorageResult<()> {
        let key = self.make_key(&state.session_id);
        let ttl_secs = ttl.unwrap_or(self.default_ttl).as_secs().max(1) as i64;
        debug!(key = %key, ttl_secs, "Writing live state");

        let mut conn = self.connection().await?;
        let _: () = redis::pipe()
            .atomic()
            .hset_multiple(&key, &to_fields(state))
            .ignore()
            .expire(&key, ttl_secs)
            .ignore()
            .query_async(&mut conn)
            .await?;

        Ok(())
    }

    async fn clear(&self, session_id: &SessionId) -> StorageResult<()> {
        let mut conn = self.connection().await?;
        let _: () = conn.del(self.make_key(session_id)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_round_trip() {
        let live = LiveState {
            session_id: SessionId::from_string("s-1"),
            state: InterviewState::Technical,
            current_round: Some(RoundType::Technical),
            question_index: 2,
            updated_at: Utc::now(),
        };

        let fields: HashMap<String, String> = to_fields(&live)
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        let parsed = parse_fields(&live.session_id, &fields).unwrap();

        assert_eq!(parsed.state, live.state);
        assert_eq!(parsed.current_round, live.current_round);
        assert_eq!(parsed.question_index, 2);
    }

    #[test]
    fn test_empty_round_reads_as_none() {
        let mut fields = HashMap::new();
        fields.insert("state".to_string(), "REJECTED".to_string());
        fields.insert("currentRound".to_string(), String::new());
        fields.insert("questionIndex".to_string(), "garbage".to_string());

        let parsed = parse_fields(&SessionId::from_string("s-2"), &fields).unwrap();
        assert_eq!(parsed.current_round, None);
        assert_eq!(parsed.question_index, 0);
    }

    #[test]
    fn test_missing_state_is_corrupt() {
        let err = parse_fields(&SessionId::from_string("s-3"), &HashMap::new()).unwrap_err();
        assert!(matches!(err, StorageError::Corrupt(_)));
    }
}
