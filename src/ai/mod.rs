//! AI capability abstraction
//!
//! The orchestrator depends on a required core (question generation and
//! answer evaluation) plus two optional extension points. Extensions are
//! discovered at runtime through [`AiProvider::resume_analyzer`] and
//! [`AiProvider::profile_generator`] and are best-effort by contract.

pub mod config;
pub mod mock;
pub mod openai;

pub use config::AiConfig;
pub use mock::MockAiProvider;
pub use openai::OpenAiCompatibleProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::domain::{
    Level, MemoryHints, ResumeAnalysis, RoundType, StructuredMemory, TranscriptEntry,
};
use crate::error::Result;

/// Resume material available while generating questions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeContext {
    pub extracted_text: String,
    pub analysis: Option<ResumeAnalysis>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRequest {
    pub round_type: RoundType,
    pub role: String,
    pub level: Level,
    pub memory: StructuredMemory,
    /// Prompts already asked in any round, to avoid repetition
    pub asked_questions: Vec<String>,
    /// 0-based position of the question within its round
    pub question_index: usize,
    pub resume_context: Option<ResumeContext>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest {
    pub round_type: RoundType,
    pub question: String,
    pub answer: String,
    pub memory: StructuredMemory,
}

/// Evaluation returned by the capability; scores are validated downstream
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub raw: Value,
    pub reasoning_text: String,
    pub memory_hints: Option<MemoryHints>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRequest {
    pub transcript: Vec<TranscriptEntry>,
    pub role: String,
    pub level: Level,
}

/// Required question/evaluation capability
#[async_trait]
pub trait AiProvider: Send + Sync {
    async fn generate_question(&self, request: &QuestionRequest) -> Result<GeneratedQuestion>;

    async fn evaluate_answer(&self, request: &EvaluationRequest) -> Result<Evaluation>;

    /// Optional resume analysis extension
    fn resume_analyzer(&self) -> Option<&dyn ResumeAnalyzer> {
        None
    }

    /// Optional profile summary extension
    fn profile_generator(&self) -> Option<&dyn ProfileGenerator> {
        None
    }
}

#[async_trait]
pub trait ResumeAnalyzer: Send + Sync {
    async fn analyze_resume(&self, resume_text: &str, target_role: &str)
        -> Result<ResumeAnalysis>;
}

#[async_trait]
pub trait ProfileGenerator: Send + Sync {
    async fn generate_profile(&self, request: &ProfileRequest) -> Result<String>;
}

/// Pick the provider from configuration: the OpenAI-compatible client when a
/// key is configured, the deterministic mock otherwise
pub fn provider_from_config(config: &AiConfig) -> Result<Arc<dyn AiProvider>> {
    match &config.api_key {
        Some(_) => Ok(Arc::new(OpenAiCompatibleProvider::new(config)?)),
        None => Ok(Arc::new(MockAiProvider::new())),
    }
}
