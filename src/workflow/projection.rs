//! Client-facing views of a session

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{
    AuditEvent, CandidateId, CandidateStatus, InterviewSession, InterviewState, QuestionId,
    RoundType, Scorecard, SessionId, StructuredMemory, Verdict,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveQuestionView {
    pub id: QuestionId,
    pub prompt: String,
    pub round_type: RoundType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundProgress {
    pub round_type: RoundType,
    pub answers: usize,
    pub questions_asked: usize,
    pub verdict: Option<Verdict>,
    pub weighted_score: Option<u8>,
    /// Scorecard reasoning once the round is scored
    pub feedback: Option<String>,
    pub dimensions: Option<BTreeMap<String, u8>>,
}

/// Snapshot returned after every interview operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicState {
    pub session_id: SessionId,
    pub candidate_id: CandidateId,
    pub state: InterviewState,
    pub current_round: Option<RoundType>,
    pub active_question: Option<ActiveQuestionView>,
    pub progress: Vec<RoundProgress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    pub memory: StructuredMemory,
}

impl PublicState {
    pub fn from_session(session: &InterviewSession) -> Self {
        let active_round = session.active_round();
        let active_question = active_round
            .and_then(|round| round.active_question())
            .map(|q| ActiveQuestionView {
                id: q.id.clone(),
                prompt: q.prompt.clone(),
                round_type: q.round_type,
            });

        Self {
            session_id: session.id.clone(),
            candidate_id: session.candidate_id.clone(),
            state: session.state,
            current_round: active_round.map(|r| r.round_type),
            active_question,
            progress: session
                .rounds
                .iter()
                .map(|r| RoundProgress {
                    round_type: r.round_type,
                    answers: r.answers.len(),
                    questions_asked: r.questions.len(),
                    verdict: r.verdict,
                    weighted_score: r.scorecard.as_ref().map(|s| s.weighted_score),
                    feedback: r.scorecard.as_ref().map(|s| s.reasoning.clone()),
                    dimensions: r.scorecard.as_ref().map(|s| s.dimensions.clone()),
                })
                .collect(),
            profile: session.profile.clone(),
            memory: session.memory.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundSummary {
    pub round_type: RoundType,
    pub verdict: Option<Verdict>,
    pub scorecard: Option<Scorecard>,
}

/// Final outcome of a completed session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultView {
    pub session_id: SessionId,
    pub candidate_id: CandidateId,
    pub candidate_status: CandidateStatus,
    pub state: InterviewState,
    pub memory: StructuredMemory,
    pub rounds: Vec<RoundSummary>,
    pub audit_log: Vec<AuditEvent>,
}

impl ResultView {
    pub fn from_session(session: &InterviewSession, candidate_status: CandidateStatus) -> Self {
        Self {
            session_id: session.id.clone(),
            candidate_id: session.candidate_id.clone(),
            candidate_status,
            state: session.state,
            memory: session.memory.clone(),
            rounds: session
                .rounds
                .iter()
                .map(|r| RoundSummary {
                    round_type: r.round_type,
                    verdict: r.verdict,
                    scorecard: r.scorecard.clone(),
                })
                .collect(),
            audit_log: session.audit_log.clone(),
        }
    }
}
