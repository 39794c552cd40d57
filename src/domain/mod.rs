//! Interview domain model
//!
//! The session is the aggregate root. It owns its rounds, memory, and audit
//! log; the candidate row only mirrors the coarse outcome.

pub mod ids;
pub mod models;
pub mod types;

pub use ids::{CandidateId, QuestionId, SessionId};
pub use models::{
    AnswerEvaluation, AuditEvent, AuditEventKind, Candidate, InterviewAnswer, InterviewContext,
    InterviewQuestion, InterviewRound, InterviewSession, MemoryHints, ResumeAnalysis, ResumeData,
    Scorecard, StructuredMemory, TranscriptEntry,
};
pub use types::{CandidateStatus, InterviewState, Level, RoundType, Verdict};
