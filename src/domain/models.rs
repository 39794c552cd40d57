//! Interview aggregates: candidate, session, rounds, and their audit trail

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::ids::{CandidateId, QuestionId, SessionId};
use super::types::{CandidateStatus, InterviewState, Level, RoundType, Verdict};

/// One row per interview process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: CandidateId,
    pub status: CandidateStatus,
    pub current_round: Option<RoundType>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Candidate {
    pub fn new(id: CandidateId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            status: CandidateStatus::InProgress,
            current_round: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewQuestion {
    pub id: QuestionId,
    pub round_type: RoundType,
    pub prompt: String,
    pub created_at: DateTime<Utc>,
}

/// Raw evaluation payload as returned by the AI capability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerEvaluation {
    /// Unvalidated dimension scores, checked by the decision engine
    pub json: Value,
    pub reasoning_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewAnswer {
    pub question_id: QuestionId,
    pub answer_text: String,
    pub answered_at: DateTime<Utc>,
    pub evaluation: Option<AnswerEvaluation>,
}

/// Aggregated, immutable scoring record for one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scorecard {
    /// Rounded mean per dimension (0-10)
    pub dimensions: BTreeMap<String, u8>,
    /// Weighted composite (0-100)
    pub weighted_score: u8,
    pub reasoning: String,
    /// Validated per-answer payloads plus the aggregate, kept for audit
    pub raw_evaluation: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRound {
    pub round_type: RoundType,
    pub questions: Vec<InterviewQuestion>,
    pub answers: Vec<InterviewAnswer>,
    pub scorecard: Option<Scorecard>,
    pub verdict: Option<Verdict>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl InterviewRound {
    pub fn new(round_type: RoundType, now: DateTime<Utc>) -> Self {
        Self {
            round_type,
            questions: Vec::new(),
            answers: Vec::new(),
            scorecard: None,
            verdict: None,
            started_at: now,
            ended_at: None,
        }
    }

    /// First question that has no answer yet
    pub fn active_question(&self) -> Option<&InterviewQuestion> {
        self.questions
            .iter()
            .find(|q| !self.answers.iter().any(|a| a.question_id == q.id))
    }

    pub fn is_scored(&self) -> bool {
        self.verdict.is_some()
    }

    /// Question/answer pairs in question order; unanswered prompts get an empty answer
    pub fn transcript(&self) -> Vec<TranscriptEntry> {
        self.questions
            .iter()
            .map(|q| TranscriptEntry {
                question: q.prompt.clone(),
                answer: self
                    .answers
                    .iter()
                    .find(|a| a.question_id == q.id)
                    .map(|a| a.answer_text.clone())
                    .unwrap_or_default(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub question: String,
    pub answer: String,
}

/// Cross-round candidate memory; only ever grows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredMemory {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub notes: Vec<String>,
}

/// Memory suggestions attached to an evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryHints {
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditEventKind {
    SessionStarted,
    RoundStarted,
    QuestionAsked,
    AnswerSubmitted,
    AnswerEvaluated,
    #[serde(rename = "ROUNDED_SCORED")]
    RoundScored,
    RoundVerdict,
    SessionVerdict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: AuditEventKind,
    pub details: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    #[serde(default)]
    pub experience: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub education: Vec<String>,
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeData {
    pub file_name: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    pub extracted_text: String,
    pub analysis: Option<ResumeAnalysis>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewContext {
    pub role: String,
    pub level: Level,
}

/// The aggregate root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewSession {
    pub id: SessionId,
    pub candidate_id: CandidateId,
    pub state: InterviewState,
    pub context: InterviewContext,
    #[serde(default)]
    pub resume: Option<ResumeData>,
    #[serde(default)]
    pub profile: Option<String>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub rounds: Vec<InterviewRound>,
    pub memory: StructuredMemory,
    pub audit_log: Vec<AuditEvent>,
}

impl InterviewSession {
    pub fn new(
        id: SessionId,
        candidate_id: CandidateId,
        context: InterviewContext,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            candidate_id,
            state: InterviewState::Init,
            context,
            resume: None,
            profile: None,
            started_at: now,
            ended_at: None,
            rounds: Vec::new(),
            memory: StructuredMemory::default(),
            audit_log: Vec::new(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// The last round, scored or not
    pub fn active_round(&self) -> Option<&InterviewRound> {
        self.rounds.last()
    }

    pub fn active_round_mut(&mut self) -> Option<&mut InterviewRound> {
        self.rounds.last_mut()
    }

    /// Every prompt asked so far, across all rounds
    pub fn asked_prompts(&self) -> Vec<String> {
        self.rounds
            .iter()
            .flat_map(|r| r.questions.iter().map(|q| q.prompt.clone()))
            .collect()
    }

    pub fn append_audit(&mut self, kind: AuditEventKind, details: Value) {
        self.audit_log.push(AuditEvent {
            at: Utc::now(),
            kind,
            details,
        });
    }
}
