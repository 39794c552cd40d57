//! Scripted AI provider

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::ai::{
    AiProvider, Evaluation, EvaluationRequest, GeneratedQuestion, ProfileGenerator,
    ProfileRequest, QuestionRequest, ResumeAnalyzer,
};
use crate::domain::{MemoryHints, ResumeAnalysis, RoundType};
use crate::error::{Error, Result};
use crate::workflow::scoring::RoundScoringConfig;

enum Scripted<T> {
    Succeed(T),
    Fail(String),
}

impl<T: Clone> Scripted<T> {
    fn outcome(&self) -> Result<T> {
        match self {
            Scripted::Succeed(value) => Ok(value.clone()),
            Scripted::Fail(msg) => Err(Error::external(msg)),
        }
    }
}

/// Replays queued evaluations in order and numbers its questions
///
/// Extensions are offered only when configured. Evaluating with an empty
/// queue fails with an upstream error.
#[derive(Default)]
pub struct ScriptedAiProvider {
    evaluations: Mutex<VecDeque<Result<Evaluation>>>,
    question_requests: Mutex<Vec<QuestionRequest>>,
    evaluation_requests: Mutex<Vec<EvaluationRequest>>,
    profile_requests: Mutex<Vec<ProfileRequest>>,
    profile: Option<Scripted<String>>,
    resume: Option<Scripted<ResumeAnalysis>>,
    evaluation_delay: Option<Duration>,
}

impl ScriptedAiProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every configured dimension of `round_type` scored `score`
    pub fn uniform(round_type: RoundType, score: u8) -> Evaluation {
        let scores: Map<String, Value> = RoundScoringConfig::default_dimensions(round_type)
            .into_iter()
            .map(|d| (d, Value::from(score)))
            .collect();
        Evaluation {
            raw: Value::Object(scores),
            reasoning_text: format!("Scripted {round_type} evaluation"),
            memory_hints: None,
        }
    }

    pub fn with_evaluation(self, evaluation: Evaluation) -> Self {
        self.lock_evaluations().push_back(Ok(evaluation));
        self
    }

    /// Queue `count` uniform evaluations for `round_type`
    pub fn with_round(self, round_type: RoundType, score: u8, count: usize) -> Self {
        (0..count).fold(self, |provider, _| {
            provider.with_evaluation(Self::uniform(round_type, score))
        })
    }

    pub fn with_hints(self, round_type: RoundType, score: u8, hints: MemoryHints) -> Self {
        self.with_evaluation(Evaluation {
            memory_hints: Some(hints),
            ..Self::uniform(round_type, score)
        })
    }

    pub fn with_failing_evaluation(self, message: &str) -> Self {
        self.lock_evaluations()
            .push_back(Err(Error::external(message)));
        self
    }

    pub fn with_profile(mut self, profile: &str) -> Self {
        self.profile = Some(Scripted::Succeed(profile.to_string()));
        self
    }

    pub fn with_failing_profile(mut self) -> Self {
        self.profile = Some(Scripted::Fail("profile generator unavailable".to_string()));
        self
    }

    pub fn with_resume_analysis(mut self, analysis: ResumeAnalysis) -> Self {
        self.resume = Some(Scripted::Succeed(analysis));
        self
    }

    pub fn with_failing_resume_analysis(mut self) -> Self {
        self.resume = Some(Scripted::Fail("resume analyzer unavailable".to_string()));
        self
    }

    /// Sleep inside every evaluation, widening race windows
    pub fn with_evaluation_delay(mut self, delay: Duration) -> Self {
        self.evaluation_delay = Some(delay);
        self
    }

    pub fn question_requests(&self) -> Vec<QuestionRequest> {
        lock(&self.question_requests).clone()
    }

    pub fn evaluation_requests(&self) -> Vec<EvaluationRequest> {
        lock(&self.evaluation_requests).clone()
    }

    pub fn profile_requests(&self) -> Vec<ProfileRequest> {
        lock(&self.profile_requests).clone()
    }

    pub fn remaining_evaluations(&self) -> usize {
        self.lock_evaluations().len()
    }

    fn lock_evaluations(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<Evaluation>>> {
        lock(&self.evaluations)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

#[async_trait]
impl AiProvider for ScriptedAiProvider {
    async fn generate_question(&self, request: &QuestionRequest) -> Result<GeneratedQuestion> {
        lock(&self.question_requests).push(request.clone());
        Ok(GeneratedQuestion {
            prompt: format!("{} question {}", request.round_type, request.question_index + 1),
        })
    }

    async fn evaluate_answer(&self, request: &EvaluationRequest) -> Result<Evaluation> {
        lock(&self.evaluation_requests).push(request.clone());
        if let Some(delay) = self.evaluation_delay {
            tokio::time::sleep(delay).await;
        }
        self.lock_evaluations()
            .pop_front()
            .unwrap_or_else(|| Err(Error::external("no scripted evaluation left")))
    }

    fn resume_analyzer(&self) -> Option<&dyn ResumeAnalyzer> {
        self.resume.as_ref().map(|_| self as &dyn ResumeAnalyzer)
    }

    fn profile_generator(&self) -> Option<&dyn ProfileGenerator> {
        self.profile.as_ref().map(|_| self as &dyn ProfileGenerator)
    }
}

#[async_trait]
impl ResumeAnalyzer for ScriptedAiProvider {
    async fn analyze_resume(&self, _resume_text: &str, _target_role: &str) -> Result<ResumeAnalysis> {
        match &self.resume {
            Some(scripted) => scripted.outcome(),
            None => Err(Error::external("resume analysis not scripted")),
        }
    }
}

#[async_trait]
impl ProfileGenerator for ScriptedAiProvider {
    async fn generate_profile(&self, request: &ProfileRequest) -> Result<String> {
        lock(&self.profile_requests).push(request.clone());
        match &self.profile {
            Some(scripted) => scripted.outcome(),
            None => Err(Error::external("profile generation not scripted")),
        }
    }
}
