//! PostgreSQL storage backend implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::Row;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::domain::{
    AuditEvent, Candidate, CandidateId, CandidateStatus, InterviewAnswer, InterviewContext,
    InterviewQuestion, InterviewRound, InterviewSession, InterviewState, ResumeData, RoundType,
    Scorecard, SessionId, StructuredMemory, Verdict,
};
use crate::storage::config::PostgresConfig;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::traits::{CandidateRepository, SessionRepository};

/// Session and round rows of one read come from the same snapshot
const SNAPSHOT_READ: &str = "SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY";

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS candidates (
        id TEXT PRIMARY KEY,
        status TEXT NOT NULL,
        current_round TEXT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS interview_sessions (
        id TEXT PRIMARY KEY,
        candidate_id TEXT NOT NULL REFERENCES candidates(id) ON DELETE CASCADE,
        state TEXT NOT NULL,
        context JSONB NOT NULL,
        memory JSONB NOT NULL,
        audit_log JSONB NOT NULL,
        resume JSONB NULL,
        profile TEXT NULL,
        started_at TIMESTAMPTZ NOT NULL,
        ended_at TIMESTAMPTZ NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS interview_rounds (
        session_id TEXT NOT NULL REFERENCES interview_sessions(id) ON DELETE CASCADE,
        round_type TEXT NOT NULL,
        started_at TIMESTAMPTZ NOT NULL,
        ended_at TIMESTAMPTZ NULL,
        verdict TEXT NULL,
        scorecard JSONB NULL,
        questions JSONB NOT NULL,
        answers JSONB NOT NULL,
        PRIMARY KEY (session_id, round_type)
    )
    "#,
];

/// PostgreSQL storage backend
#[derive(Clone)]
pub struct PostgresBackend {
    pool: PgPool,
}

impl PostgresBackend {
    /// Connect and make sure the schema exists
    pub async fn new(config: &PostgresConfig) -> StorageResult<Self> {
        info!("Initializing PostgreSQL backend");

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connection_timeout)
            .idle_timeout(Some(Duration::from_secs(600)))
            .connect(&config.connection_string)
            .await
            .map_err(|e| StorageError::connection(format!("Failed to connect to database: {}", e)))?;

        let backend = Self { pool };
        backend.initialize_schema().await?;
        Ok(backend)
    }

    async fn initialize_schema(&self) -> StorageResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("PostgreSQL schema initialized successfully");
        Ok(())
    }
}

fn parse_column<T: FromStr<Err = String>>(value: &str) -> StorageResult<T> {
    T::from_str(value).map_err(StorageError::corrupt)
}

fn candidate_from_row(row: &PgRow) -> StorageResult<Candidate> {
    let status: String = row.try_get("status")?;
    let current_round: Option<String> = row.try_get("current_round")?;

    Ok(Candidate {
        id: CandidateId::from_string(row.try_get::<String, _>("id")?),
        status: parse_column::<CandidateStatus>(&status)?,
        current_round: current_round
            .as_deref()
            .map(parse_column::<RoundType>)
            .transpose()?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn round_from_row(row: &PgRow) -> StorageResult<InterviewRound> {
    let round_type: String = row.try_get("round_type")?;
    let verdict: Option<String> = row.try_get("verdict")?;
    let scorecard: Option<Json<Scorecard>> = row.try_get("scorecard")?;
    let questions: Json<Vec<InterviewQuestion>> = row.try_get("questions")?;
    let answers: Json<Vec<InterviewAnswer>> = row.try_get("answers")?;

    Ok(InterviewRound {
        round_type: parse_column(&round_type)?,
        questions: questions.0,
        answers: answers.0,
        scorecard: scorecard.map(|s| s.0),
        verdict: verdict.as_deref().map(parse_column::<Verdict>).transpose()?,
        started_at: row.try_get("started_at")?,
        ended_at: row.try_get("ended_at")?,
    })
}

#[async_trait]
impl CandidateRepository for PostgresBackend {
    async fn get_by_id(&self, id: &CandidateId) -> StorageResult<Option<Candidate>> {
        let row = sqlx::query(
            "SELECT id, status, current_round, created_at, updated_at FROM candidates WHERE id = $1",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(candidate_from_row).transpose()
    }

    async fn upsert(&self, candidate: &Candidate) -> StorageResult<()> {
        debug!(candidate_id = %candidate.id, "Saving candidate");

        sqlx::query(
            r#"
            INSERT INTO candidates (id, status, current_round, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
            SET status = EXCLUDED.status,
                current_round = EXCLUDED.current_round,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(candidate.id.as_str())
        .bind(candidate.status.as_str())
        .bind(candidate.current_round.map(|r| r.as_str()))
        .bind(candidate.created_at)
        .bind(candidate.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl SessionRepository for PostgresBackend {
    async fn get_by_id(&self, id: &SessionId) -> StorageResult<Option<InterviewSession>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StorageError::transaction(format!("Failed to begin: {}", e)))?;
        sqlx::query(SNAPSHOT_READ).execute(&mut *tx).await?;

        let Some(row) = sqlx::query(
            r#"
            SELECT id, candidate_id, state, context, memory, audit_log, resume, profile,
                   started_at, ended_at
            FROM interview_sessions
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&mut *tx)
        .await?
        else {
            return Ok(None);
        };

        let rounds = sqlx::query(
            r#"
            SELECT round_type, started_at, ended_at, verdict, scorecard, questions, answers
            FROM interview_rounds
            WHERE session_id = $1
            ORDER BY started_at ASC
            "#,
        )
        .bind(id.as_str())
        .fetch_all(&mut *tx)
        .await?
        .iter()
        .map(round_from_row)
        .collect::<StorageResult<Vec<_>>>()?;

        tx.commit()
            .await
            .map_err(|e| StorageError::transaction(format!("Failed to commit: {}", e)))?;

        let state: String = row.try_get("state")?;
        let context: Json<InterviewContext> = row.try_get("context")?;
        let memory: Json<StructuredMemory> = row.try_get("memory")?;
        let audit_log: Json<Vec<AuditEvent>> = row.try_get("audit_log")?;
        let resume: Option<Json<ResumeData>> = row.try_get("resume")?;
        let started_at: DateTime<Utc> = row.try_get("started_at")?;

        Ok(Some(InterviewSession {
            id: SessionId::from_string(row.try_get::<String, _>("id")?),
            candidate_id: CandidateId::from_string(row.try_get::<String, _>("candidate_id")?),
            state: parse_column::<InterviewState>(&state)?,
            context: context.0,
            resume: resume.map(|r| r.0),
            profile: row.try_get("profile")?,
            started_at,
            ended_at: row.try_get("ended_at")?,
            rounds,
            memory: memory.0,
            audit_log: audit_log.0,
        }))
    }

    async fn upsert(&self, session: &InterviewSession) -> StorageResult<()> {
        debug!(session_id = %session.id, rounds = session.rounds.len(), "Saving session");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StorageError::transaction(format!("Failed to begin: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO interview_sessions (
                id, candidate_id, state, context, memory, audit_log, resume, profile,
                started_at, ended_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW())
            ON CONFLICT (id) DO UPDATE
            SET candidate_id = EXCLUDED.candidate_id,
                state = EXCLUDED.state,
                context = EXCLUDED.context,
                memory = EXCLUDED.memory,
                audit_log = EXCLUDED.audit_log,
                resume = EXCLUDED.resume,
                profile = EXCLUDED.profile,
                started_at = EXCLUDED.started_at,
                ended_at = EXCLUDED.ended_at,
                updated_at = NOW()
            "#,
        )
        .bind(session.id.as_str())
        .bind(session.candidate_id.as_str())
        .bind(session.state.as_str())
        .bind(Json(&session.context))
        .bind(Json(&session.memory))
        .bind(Json(&session.audit_log))
        .bind(session.resume.as_ref().map(Json))
        .bind(session.profile.as_deref())
        .bind(session.started_at)
        .bind(session.ended_at)
        .execute(&mut *tx)
        .await?;

        for round in &session.rounds {
            sqlx::query(
                r#"
                INSERT INTO interview_rounds (
                    session_id, round_type, started_at, ended_at, verdict, scorecard,
                    questions, answers
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ON CONFLICT (session_id, round_type) DO UPDATE
                SET started_at = EXCLUDED.started_at,
                    ended_at = EXCLUDED.ended_at,
                    verdict = EXCLUDED.verdict,
                    scorecard = EXCLUDED.scorecard,
                    questions = EXCLUDED.questions,
                    answers = EXCLUDED.answers
                "#,
            )
            .bind(session.id.as_str())
            .bind(round.round_type.as_str())
            .bind(round.started_at)
            .bind(round.ended_at)
            .bind(round.verdict.map(|v| v.as_str()))
            .bind(round.scorecard.as_ref().map(Json))
            .bind(Json(&round.questions))
            .bind(Json(&round.answers))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| StorageError::transaction(format!("Failed to commit: {}", e)))?;

        Ok(())
    }
}
