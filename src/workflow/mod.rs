//! Interview workflow: round sequencing, scoring, memory and orchestration

pub mod memory;
pub mod orchestrator;
pub mod projection;
pub mod scoring;
pub mod session_lock;
pub mod state_machine;

#[cfg(test)]
mod tests;

pub use orchestrator::{InterviewOrchestrator, StartInterview, SubmitAnswer};
pub use projection::{ActiveQuestionView, PublicState, ResultView, RoundProgress, RoundSummary};
pub use scoring::{DecisionEngine, RoundResult, RoundScoringConfig};
pub use session_lock::SessionLocks;
