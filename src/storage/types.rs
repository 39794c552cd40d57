//! Type definitions for the storage abstraction layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{InterviewSession, InterviewState, RoundType, SessionId};

/// Ephemeral progress marker kept beside the durable session record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveState {
    pub session_id: SessionId,
    pub state: InterviewState,
    pub current_round: Option<RoundType>,
    /// 0-based index of the latest question in the last round
    pub question_index: usize,
    pub updated_at: DateTime<Utc>,
}

impl LiveState {
    pub fn from_session(session: &InterviewSession, now: DateTime<Utc>) -> Self {
        let last_round = session.rounds.last();
        Self {
            session_id: session.id.clone(),
            state: session.state,
            current_round: last_round.map(|r| r.round_type),
            question_index: last_round
                .map(|r| r.questions.len().saturating_sub(1))
                .unwrap_or(0),
            updated_at: now,
        }
    }
}
