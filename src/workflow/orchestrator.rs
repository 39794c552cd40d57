//! Interview orchestration
//!
//! Each public operation loads the session aggregate, mutates it locally and
//! persists it at checkpoints. Answers on one session are serialized through
//! [`SessionLocks`]; live-state writes are best-effort and never fail a request.

use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::memory;
use super::projection::{PublicState, ResultView};
use super::scoring::DecisionEngine;
use super::session_lock::SessionLocks;
use super::state_machine::{can_accept_answer, next_round, state_for_round, FIRST_ROUND};
use crate::ai::{AiProvider, EvaluationRequest, ProfileRequest, QuestionRequest, ResumeContext};
use crate::domain::{
    AnswerEvaluation, AuditEventKind, Candidate, CandidateId, CandidateStatus, InterviewAnswer,
    InterviewContext, InterviewQuestion, InterviewRound, InterviewSession, InterviewState, Level,
    MemoryHints, QuestionId, ResumeAnalysis, ResumeData, RoundType, SessionId, Verdict,
};
use crate::error::{Error, Result};
use crate::storage::{CandidateRepository, LiveState, LiveStateStore, SessionRepository, Storage};

/// Number of resume skills copied into memory as a strength
const RESUME_SKILLS_IN_MEMORY: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartInterview {
    /// Generated when absent
    pub candidate_id: Option<CandidateId>,
    pub role: String,
    pub level: Level,
    pub resume_text: Option<String>,
    pub resume_file_name: Option<String>,
}

impl StartInterview {
    pub fn new(role: impl Into<String>, level: Level) -> Self {
        Self {
            candidate_id: None,
            role: role.into(),
            level,
            resume_text: None,
            resume_file_name: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitAnswer {
    pub session_id: SessionId,
    pub answer: String,
    /// When present it must name the active question
    pub question_id: Option<QuestionId>,
}

pub struct InterviewOrchestrator {
    candidates: Arc<dyn CandidateRepository>,
    sessions: Arc<dyn SessionRepository>,
    live_state: Arc<dyn LiveStateStore>,
    live_state_ttl: Option<Duration>,
    ai: Arc<dyn AiProvider>,
    engine: DecisionEngine,
    locks: SessionLocks,
}

impl InterviewOrchestrator {
    pub fn new(storage: Storage, ai: Arc<dyn AiProvider>, engine: DecisionEngine) -> Self {
        Self {
            candidates: storage.candidates,
            sessions: storage.sessions,
            live_state: storage.live_state,
            live_state_ttl: None,
            ai,
            engine,
            locks: SessionLocks::new(),
        }
    }

    /// Override the live-state store's default expiry
    pub fn with_live_state_ttl(mut self, ttl: Duration) -> Self {
        self.live_state_ttl = Some(ttl);
        self
    }

    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }

    pub async fn start_interview(&self, request: StartInterview) -> Result<PublicState> {
        let now = Utc::now();
        let candidate_id = request.candidate_id.unwrap_or_default();
        let candidate = Candidate::new(candidate_id.clone(), now);
        let context = InterviewContext {
            role: request.role,
            level: request.level,
        };
        let mut session = InterviewSession::new(SessionId::new(), candidate_id, context, now);

        let mut details = json!({
            "role": session.context.role,
            "level": session.context.level,
        });

        if let Some(text) = request.resume_text.filter(|t| !t.trim().is_empty()) {
            let analysis = self.analyze_resume(&session, &text).await;
            if let Some(skills) = analysis.as_ref().map(|a| &a.skills).filter(|s| !s.is_empty()) {
                let top: Vec<&str> = skills
                    .iter()
                    .take(RESUME_SKILLS_IN_MEMORY)
                    .map(String::as_str)
                    .collect();
                let hints = MemoryHints {
                    strengths: vec![format!("Resume skills: {}", top.join(", "))],
                    ..MemoryHints::default()
                };
                memory::merge(&mut session.memory, Some(&hints));
            }

            details["resumeUploaded"] = json!(true);
            details["resumeFileName"] = json!(request.resume_file_name);
            session.resume = Some(ResumeData {
                file_name: request.resume_file_name,
                uploaded_at: now,
                extracted_text: text,
                analysis,
            });
        }

        session.append_audit(AuditEventKind::SessionStarted, details);

        self.candidates.upsert(&candidate).await?;
        self.sessions.upsert(&session).await?;

        self.start_round(&mut session, FIRST_ROUND).await?;
        self.write_live_state(&session).await;

        info!(
            session_id = %session.id,
            candidate_id = %session.candidate_id,
            role = %session.context.role,
            level = %session.context.level,
            "Interview started"
        );
        Ok(PublicState::from_session(&session))
    }

    pub async fn submit_answer(&self, request: SubmitAnswer) -> Result<PublicState> {
        let _guard = self.locks.acquire(&request.session_id).await;
        let mut session = self.load_session(&request.session_id).await?;

        if !can_accept_answer(session.state) {
            return Err(Error::invalid_state(format!(
                "Cannot answer in state {}",
                session.state
            )));
        }

        let round = session
            .active_round()
            .ok_or_else(|| Error::invalid_state("No active round"))?;
        let round_type = round.round_type;
        if round.is_scored() {
            return Err(Error::invalid_state(format!(
                "{round_type} round is already scored"
            )));
        }
        let question = round
            .active_question()
            .cloned()
            .ok_or_else(|| Error::invalid_state("No active question"))?;

        if let Some(question_id) = &request.question_id {
            if *question_id != question.id {
                return Err(Error::validation(
                    "questionId does not match active question",
                ));
            }
        }

        active_round_mut(&mut session)?.answers.push(InterviewAnswer {
            question_id: question.id.clone(),
            answer_text: request.answer.clone(),
            answered_at: Utc::now(),
            evaluation: None,
        });
        self.write_live_state(&session).await;
        session.append_audit(
            AuditEventKind::AnswerSubmitted,
            json!({ "roundType": round_type, "questionId": question.id }),
        );

        let evaluation = self
            .ai
            .evaluate_answer(&EvaluationRequest {
                round_type,
                question: question.prompt.clone(),
                answer: request.answer,
                memory: session.memory.clone(),
            })
            .await?;
        let answer_index = session.active_round().map_or(0, |r| r.answers.len().saturating_sub(1));
        self.engine
            .validate_evaluation(round_type, answer_index, &evaluation.raw)?;

        if let Some(answer) = active_round_mut(&mut session)?.answers.last_mut() {
            answer.evaluation = Some(AnswerEvaluation {
                json: evaluation.raw,
                reasoning_text: evaluation.reasoning_text,
            });
        }
        session.append_audit(
            AuditEventKind::AnswerEvaluated,
            json!({ "roundType": round_type, "questionId": question.id }),
        );
        memory::merge(&mut session.memory, evaluation.memory_hints.as_ref());

        let quota = self.engine.config(round_type).questions_per_round;
        let answered = session.active_round().map_or(0, |r| r.answers.len());

        if answered < quota {
            self.ask_next_question(&mut session).await?;
            self.sessions.upsert(&session).await?;
            self.write_live_state(&session).await;
        } else {
            self.complete_round(&mut session, round_type).await?;
        }

        Ok(PublicState::from_session(&session))
    }

    pub async fn get_state(&self, session_id: &SessionId) -> Result<PublicState> {
        let session = self.load_session(session_id).await?;
        Ok(PublicState::from_session(&session))
    }

    pub async fn get_result(&self, session_id: &SessionId) -> Result<ResultView> {
        let session = self.load_session(session_id).await?;
        if !session.is_terminal() {
            return Err(Error::invalid_state("Interview not completed"));
        }

        let candidate_status = self
            .candidates
            .get_by_id(&session.candidate_id)
            .await?
            .map_or(CandidateStatus::InProgress, |c| c.status);

        Ok(ResultView::from_session(&session, candidate_status))
    }

    /// Most recent live-state marker, if the store keeps one
    pub async fn live_state(&self, session_id: &SessionId) -> Result<Option<LiveState>> {
        Ok(self.live_state.get(session_id).await?)
    }

    async fn load_session(&self, session_id: &SessionId) -> Result<InterviewSession> {
        self.sessions
            .get_by_id(session_id)
            .await?
            .ok_or_else(|| Error::not_found(format!("session {session_id}")))
    }

    async fn start_round(&self, session: &mut InterviewSession, round_type: RoundType) -> Result<()> {
        let mut candidate = self
            .candidates
            .get_by_id(&session.candidate_id)
            .await?
            .ok_or_else(|| Error::not_found(format!("candidate {}", session.candidate_id)))?;

        let now = Utc::now();
        session.state = state_for_round(round_type);
        candidate.current_round = Some(round_type);
        candidate.updated_at = now;

        session.rounds.push(InterviewRound::new(round_type, now));
        session.append_audit(
            AuditEventKind::RoundStarted,
            json!({ "roundType": round_type }),
        );

        self.ask_next_question(session).await?;

        self.candidates.upsert(&candidate).await?;
        self.sessions.upsert(session).await?;

        info!(session_id = %session.id, round = %round_type, "Round started");
        Ok(())
    }

    async fn ask_next_question(&self, session: &mut InterviewSession) -> Result<()> {
        let round = session
            .active_round()
            .ok_or_else(|| Error::invalid_state("No active round"))?;
        if round.active_question().is_some() {
            return Err(Error::invalid_state("Active question is still unanswered"));
        }

        let request = QuestionRequest {
            round_type: round.round_type,
            role: session.context.role.clone(),
            level: session.context.level,
            memory: session.memory.clone(),
            asked_questions: session.asked_prompts(),
            question_index: round.questions.len(),
            resume_context: session.resume.as_ref().map(|r| ResumeContext {
                extracted_text: r.extracted_text.clone(),
                analysis: r.analysis.clone(),
            }),
        };

        let generated = self.ai.generate_question(&request).await?;
        let question = InterviewQuestion {
            id: QuestionId::new(),
            round_type: request.round_type,
            prompt: generated.prompt,
            created_at: Utc::now(),
        };
        let question_id = question.id.clone();

        active_round_mut(session)?.questions.push(question);
        session.append_audit(
            AuditEventKind::QuestionAsked,
            json!({ "roundType": request.round_type, "questionId": question_id }),
        );

        debug!(
            session_id = %session.id,
            round = %request.round_type,
            question_index = request.question_index,
            "Question asked"
        );
        Ok(())
    }

    /// Score the finished round and apply its verdict
    async fn complete_round(&self, session: &mut InterviewSession, round_type: RoundType) -> Result<()> {
        let round = session
            .active_round()
            .ok_or_else(|| Error::invalid_state("No active round"))?;
        let evaluations: Vec<_> = round.answers.iter().filter_map(|a| a.evaluation.as_ref()).collect();
        let raw: Vec<_> = evaluations.iter().map(|e| e.json.clone()).collect();
        let reasoning: Vec<_> = evaluations.iter().map(|e| e.reasoning_text.clone()).collect();

        let result = self.engine.compute_round_result(round_type, &raw, &reasoning)?;
        let weighted_score = result.scorecard.weighted_score;

        let round = active_round_mut(session)?;
        round.scorecard = Some(result.scorecard.clone());
        round.verdict = Some(result.verdict);
        round.ended_at = Some(Utc::now());

        session.append_audit(
            AuditEventKind::RoundScored,
            json!({
                "roundType": round_type,
                "weightedScore": weighted_score,
                "dimensions": result.scorecard.dimensions,
            }),
        );
        session.append_audit(
            AuditEventKind::RoundVerdict,
            json!({
                "roundType": round_type,
                "verdict": result.verdict,
                "reasons": result.reasons,
            }),
        );

        info!(
            session_id = %session.id,
            round = %round_type,
            verdict = %result.verdict,
            weighted_score,
            "Round scored"
        );

        if result.verdict == Verdict::Fail {
            self.reject(session, format!("Failed {round_type} round"), &result.reasons)
                .await?;
            self.sessions.upsert(session).await?;
            self.clear_live_state(&session.id).await;
            return Ok(());
        }

        if round_type == RoundType::Screening {
            self.attach_profile(session).await;
        }

        match next_round(round_type) {
            Some(next) => {
                self.sessions.upsert(session).await?;
                self.start_round(session, next).await?;
                self.write_live_state(session).await;
            }
            None => {
                let reasons = vec![format!("Passed all rounds. Last score: {weighted_score}")];
                self.finalize(session, &reasons).await?;
                self.sessions.upsert(session).await?;
                self.clear_live_state(&session.id).await;
            }
        }

        Ok(())
    }

    async fn reject(
        &self,
        session: &mut InterviewSession,
        message: String,
        reasons: &[String],
    ) -> Result<()> {
        self.close_session(session, InterviewState::Rejected, CandidateStatus::Rejected)
            .await?;
        session.append_audit(
            AuditEventKind::SessionVerdict,
            json!({
                "verdict": CandidateStatus::Rejected,
                "message": message,
                "reasons": reasons,
            }),
        );
        info!(session_id = %session.id, "Candidate rejected");
        Ok(())
    }

    async fn finalize(&self, session: &mut InterviewSession, reasons: &[String]) -> Result<()> {
        self.close_session(session, InterviewState::FinalDecision, CandidateStatus::Selected)
            .await?;
        session.append_audit(
            AuditEventKind::SessionVerdict,
            json!({
                "verdict": CandidateStatus::Selected,
                "reasons": reasons,
            }),
        );
        info!(session_id = %session.id, "Candidate selected");
        Ok(())
    }

    /// Move the session into a terminal state and mirror the outcome on the candidate
    async fn close_session(
        &self,
        session: &mut InterviewSession,
        state: InterviewState,
        status: CandidateStatus,
    ) -> Result<()> {
        let now = Utc::now();
        session.state = state;
        session.ended_at = Some(now);

        if let Some(mut candidate) = self.candidates.get_by_id(&session.candidate_id).await? {
            candidate.status = status;
            candidate.updated_at = now;
            self.candidates.upsert(&candidate).await?;
        }
        Ok(())
    }

    async fn analyze_resume(&self, session: &InterviewSession, text: &str) -> Option<ResumeAnalysis> {
        let analyzer = self.ai.resume_analyzer()?;
        match analyzer.analyze_resume(text, &session.context.role).await {
            Ok(analysis) => Some(analysis),
            Err(e) => {
                warn!(session_id = %session.id, error = %e, "resume_analysis_failed");
                None
            }
        }
    }

    async fn attach_profile(&self, session: &mut InterviewSession) {
        let Some(generator) = self.ai.profile_generator() else {
            return;
        };
        let Some(round) = session.active_round() else {
            return;
        };

        let request = ProfileRequest {
            transcript: round.transcript(),
            role: session.context.role.clone(),
            level: session.context.level,
        };
        match generator.generate_profile(&request).await {
            Ok(profile) => session.profile = Some(profile),
            Err(e) => warn!(session_id = %session.id, error = %e, "profile_generation_failed"),
        }
    }

    async fn write_live_state(&self, session: &InterviewSession) {
        let state = LiveState::from_session(session, Utc::now());
        if let Err(e) = self.live_state.set(&state, self.live_state_ttl).await {
            warn!(session_id = %session.id, error = %e, "live_state_store_write_failed");
        }
    }

    async fn clear_live_state(&self, session_id: &SessionId) {
        if let Err(e) = self.live_state.clear(session_id).await {
            warn!(session_id = %session_id, error = %e, "live_state_store_write_failed");
        }
    }
}

fn active_round_mut(session: &mut InterviewSession) -> Result<&mut InterviewRound> {
    session
        .active_round_mut()
        .ok_or_else(|| Error::invalid_state("No active round"))
}
