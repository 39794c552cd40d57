//! Testing utilities and fixtures
//!
//! Scripted collaborators for driving the orchestrator deterministically in
//! unit and integration tests.

pub mod mocks;

pub use mocks::{FailingLiveStateStore, ScriptedAiProvider};

use std::sync::Arc;

use crate::domain::Level;
use crate::error::Result;
use crate::storage::Storage;
use crate::workflow::{DecisionEngine, InterviewOrchestrator, StartInterview};

/// Orchestrator over in-memory storage with the default scoring configuration
pub fn orchestrator_with(ai: Arc<ScriptedAiProvider>) -> Result<InterviewOrchestrator> {
    orchestrator_with_storage(ai, Storage::in_memory())
}

pub fn orchestrator_with_storage(
    ai: Arc<ScriptedAiProvider>,
    storage: Storage,
) -> Result<InterviewOrchestrator> {
    let engine = DecisionEngine::with_defaults()?;
    Ok(InterviewOrchestrator::new(storage, ai, engine))
}

/// Start request for a mid-level backend candidate
pub fn backend_mid() -> StartInterview {
    StartInterview::new("backend", Level::Mid)
}
