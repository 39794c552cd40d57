//! Interview endpoints

use axum::body::Bytes;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::error::ApiError;
use crate::domain::{CandidateId, Level, QuestionId, SessionId};
use crate::error::Error;
use crate::workflow::{InterviewOrchestrator, PublicState, ResultView, StartInterview, SubmitAnswer};

pub type AppState = Arc<InterviewOrchestrator>;

type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRequest {
    pub candidate_id: Option<String>,
    pub role: Option<String>,
    pub level: Option<Level>,
    pub resume_text: Option<String>,
    pub resume_file_name: Option<String>,
}

impl StartRequest {
    /// An empty body means every field takes its default
    fn from_body(body: &[u8]) -> Result<Self, Error> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| Error::validation(format!("invalid request body: {e}")))
    }

    fn into_command(self) -> Result<StartInterview, Error> {
        let role = match self.role {
            Some(role) if role.trim().is_empty() => {
                return Err(Error::validation("role must not be empty"))
            }
            Some(role) => role,
            None => "backend".to_string(),
        };
        let candidate_id = match self.candidate_id {
            Some(id) if id.trim().is_empty() => {
                return Err(Error::validation("candidateId must not be empty"))
            }
            other => other.map(CandidateId::from_string),
        };

        Ok(StartInterview {
            candidate_id,
            role,
            level: self.level.unwrap_or_default(),
            resume_text: self.resume_text,
            resume_file_name: self.resume_file_name,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub answer: String,
    pub question_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionQuery {
    pub session_id: Option<String>,
}

impl SessionQuery {
    fn session_id(self) -> Result<SessionId, Error> {
        self.session_id
            .filter(|id| !id.trim().is_empty())
            .map(SessionId::from_string)
            .ok_or_else(|| Error::validation("sessionId is required"))
    }
}

pub fn interview_routes() -> Router<AppState> {
    Router::new()
        .route("/interview/start", post(start_interview))
        .route("/interview/answer", post(submit_answer))
        .route("/interview/state", get(get_state))
        .route("/interview/result", get(get_result))
}

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}

async fn health_check() -> Json<Value> {
    Json(json!({ "ok": true }))
}

async fn start_interview(
    State(orchestrator): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<PublicState>)> {
    let request = StartRequest::from_body(&body)?;
    let state = orchestrator
        .start_interview(request.into_command()?)
        .await?;
    Ok((StatusCode::CREATED, Json(state)))
}

async fn submit_answer(
    State(orchestrator): State<AppState>,
    body: Result<Json<AnswerRequest>, JsonRejection>,
) -> ApiResult<Json<PublicState>> {
    let Json(body) = body?;
    if body.session_id.trim().is_empty() {
        return Err(Error::validation("sessionId is required").into());
    }
    if body.answer.trim().is_empty() {
        return Err(Error::validation("answer must not be empty").into());
    }

    let question_id = match body.question_id {
        Some(id) if id.trim().is_empty() => {
            return Err(Error::validation("questionId must not be empty").into())
        }
        other => other.map(QuestionId::from_string),
    };

    let state = orchestrator
        .submit_answer(SubmitAnswer {
            session_id: SessionId::from_string(body.session_id),
            answer: body.answer,
            question_id,
        })
        .await?;
    Ok(Json(state))
}

async fn get_state(
    State(orchestrator): State<AppState>,
    query: Result<Query<SessionQuery>, QueryRejection>,
) -> ApiResult<Json<PublicState>> {
    let Query(query) = query?;
    let state = orchestrator.get_state(&query.session_id()?).await?;
    Ok(Json(state))
}

async fn get_result(
    State(orchestrator): State<AppState>,
    query: Result<Query<SessionQuery>, QueryRejection>,
) -> ApiResult<Json<ResultView>> {
    let Query(query) = query?;
    let result = orchestrator.get_result(&query.session_id()?).await?;
    Ok(Json(result))
}
