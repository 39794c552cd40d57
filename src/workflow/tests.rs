//! Orchestrator behaviour with scripted collaborators

use super::*;
use crate::ai::Evaluation;
use crate::domain::{
    AuditEventKind, CandidateStatus, InterviewState, MemoryHints, QuestionId, ResumeAnalysis,
    RoundType, SessionId, Verdict,
};
use crate::error::ErrorKind;
use crate::storage::backends::MemoryLiveStateStore;
use crate::storage::Storage;
use crate::testing::{
    backend_mid, orchestrator_with, orchestrator_with_storage, FailingLiveStateStore,
    ScriptedAiProvider,
};
use std::sync::Arc;
use std::time::Duration;

async fn answer(orchestrator: &InterviewOrchestrator, state: &PublicState, text: &str) -> PublicState {
    let question = state.active_question.as_ref().unwrap();
    orchestrator
        .submit_answer(SubmitAnswer {
            session_id: state.session_id.clone(),
            answer: text.to_string(),
            question_id: Some(question.id.clone()),
        })
        .await
        .unwrap()
}

async fn answer_round(
    orchestrator: &InterviewOrchestrator,
    mut state: PublicState,
    count: usize,
) -> PublicState {
    for i in 0..count {
        state = answer(orchestrator, &state, &format!("answer {i}")).await;
    }
    state
}

fn audit_kinds(result: &ResultView) -> Vec<AuditEventKind> {
    result.audit_log.iter().map(|e| e.kind).collect()
}

#[tokio::test]
async fn test_start_enters_screening_with_one_question() {
    let storage = Storage::in_memory();
    let orchestrator =
        orchestrator_with_storage(Arc::new(ScriptedAiProvider::new()), storage.clone()).unwrap();

    let state = orchestrator.start_interview(backend_mid()).await.unwrap();

    assert_eq!(state.state, InterviewState::Screening);
    assert_eq!(state.current_round, Some(RoundType::Screening));
    assert_eq!(state.progress.len(), 1);
    assert_eq!(state.progress[0].questions_asked, 1);
    assert_eq!(state.progress[0].answers, 0);
    let question = state.active_question.unwrap();
    assert_eq!(question.round_type, RoundType::Screening);
    assert_eq!(question.prompt, "SCREENING question 1");

    let candidate = storage
        .candidates
        .get_by_id(&state.candidate_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(candidate.status, CandidateStatus::InProgress);
    assert_eq!(candidate.current_round, Some(RoundType::Screening));
}

#[tokio::test]
async fn test_supplied_candidate_id_is_kept() {
    let orchestrator = orchestrator_with(Arc::new(ScriptedAiProvider::new())).unwrap();
    let mut request = backend_mid();
    request.candidate_id = Some("cand-42".into());

    let state = orchestrator.start_interview(request).await.unwrap();
    assert_eq!(state.candidate_id.as_str(), "cand-42");
}

#[tokio::test]
async fn test_rejected_after_failing_scenario() {
    let ai = Arc::new(
        ScriptedAiProvider::new()
            .with_round(RoundType::Screening, 7, 3)
            .with_round(RoundType::Technical, 7, 3)
            .with_round(RoundType::Scenario, 4, 3),
    );
    let storage = Storage::in_memory();
    let orchestrator = orchestrator_with_storage(ai.clone(), storage.clone()).unwrap();

    let state = orchestrator.start_interview(backend_mid()).await.unwrap();
    let session_id = state.session_id.clone();

    let state = answer_round(&orchestrator, state, 3).await;
    assert_eq!(state.state, InterviewState::Technical);
    assert_eq!(state.progress[0].verdict, Some(Verdict::Pass));
    assert_eq!(state.progress[0].weighted_score, Some(70));
    assert_eq!(state.active_question.as_ref().unwrap().round_type, RoundType::Technical);

    let err = orchestrator.get_result(&session_id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);

    let state = answer_round(&orchestrator, state, 3).await;
    assert_eq!(state.state, InterviewState::Scenario);
    assert_eq!(state.progress[1].weighted_score, Some(70));

    let state = answer_round(&orchestrator, state, 3).await;
    assert_eq!(state.state, InterviewState::Rejected);
    assert_eq!(state.progress[2].verdict, Some(Verdict::Fail));
    assert_eq!(state.progress[2].weighted_score, Some(40));
    assert!(state.active_question.is_none());

    let result = orchestrator.get_result(&session_id).await.unwrap();
    assert_eq!(result.candidate_status, CandidateStatus::Rejected);
    assert_eq!(result.state, InterviewState::Rejected);
    assert_eq!(result.rounds.len(), 3);
    assert_eq!(
        audit_kinds(&result).last(),
        Some(&AuditEventKind::SessionVerdict)
    );
    assert_eq!(ai.remaining_evaluations(), 0);

    let candidate = storage
        .candidates
        .get_by_id(&result.candidate_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(candidate.status, CandidateStatus::Rejected);
}

#[tokio::test]
async fn test_selected_after_passing_every_round() {
    let ai = Arc::new(
        ScriptedAiProvider::new()
            .with_round(RoundType::Screening, 8, 3)
            .with_round(RoundType::Technical, 6, 3)
            .with_round(RoundType::Scenario, 9, 3),
    );
    let orchestrator = orchestrator_with(ai).unwrap();

    let state = orchestrator.start_interview(backend_mid()).await.unwrap();
    let state = answer_round(&orchestrator, state, 9).await;

    assert_eq!(state.state, InterviewState::FinalDecision);
    let result = orchestrator.get_result(&state.session_id).await.unwrap();
    assert_eq!(result.candidate_status, CandidateStatus::Selected);
    assert!(result
        .rounds
        .iter()
        .all(|r| r.verdict == Some(Verdict::Pass)));

    let verdict = result.audit_log.last().unwrap();
    assert_eq!(verdict.kind, AuditEventKind::SessionVerdict);
    assert_eq!(verdict.details["verdict"], "SELECTED");
    assert_eq!(verdict.details["reasons"][0], "Passed all rounds. Last score: 90");
}

#[tokio::test]
async fn test_failing_screening_rejects_immediately() {
    let ai = Arc::new(ScriptedAiProvider::new().with_round(RoundType::Screening, 3, 3));
    let orchestrator = orchestrator_with(ai).unwrap();

    let state = orchestrator.start_interview(backend_mid()).await.unwrap();
    let state = answer_round(&orchestrator, state, 3).await;

    assert_eq!(state.state, InterviewState::Rejected);
    assert_eq!(state.progress.len(), 1);

    let result = orchestrator.get_result(&state.session_id).await.unwrap();
    let verdict = result.audit_log.last().unwrap();
    assert_eq!(verdict.details["message"], "Failed SCREENING round");
}

#[tokio::test]
async fn test_mismatched_question_id_leaves_session_untouched() {
    let ai = Arc::new(ScriptedAiProvider::new().with_round(RoundType::Screening, 7, 3));
    let orchestrator = orchestrator_with(ai.clone()).unwrap();

    let before = orchestrator.start_interview(backend_mid()).await.unwrap();

    let err = orchestrator
        .submit_answer(SubmitAnswer {
            session_id: before.session_id.clone(),
            answer: "An answer".to_string(),
            question_id: Some(QuestionId::from_string("not-the-active-one")),
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    let after = orchestrator.get_state(&before.session_id).await.unwrap();
    assert_eq!(after, before);
    assert_eq!(ai.remaining_evaluations(), 3);
}

#[tokio::test]
async fn test_answer_without_question_id_targets_active_question() {
    let ai = Arc::new(ScriptedAiProvider::new().with_round(RoundType::Screening, 7, 3));
    let orchestrator = orchestrator_with(ai.clone()).unwrap();

    let state = orchestrator.start_interview(backend_mid()).await.unwrap();
    let state = orchestrator
        .submit_answer(SubmitAnswer {
            session_id: state.session_id,
            answer: "Because the mission fits".to_string(),
            question_id: None,
        })
        .await
        .unwrap();

    assert_eq!(state.progress[0].answers, 1);
    assert_eq!(state.progress[0].questions_asked, 2);
    assert_eq!(ai.evaluation_requests()[0].question, "SCREENING question 1");
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let orchestrator = orchestrator_with(Arc::new(ScriptedAiProvider::new())).unwrap();
    let missing = SessionId::from_string("missing");

    let err = orchestrator.get_state(&missing).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = orchestrator.get_result(&missing).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = orchestrator
        .submit_answer(SubmitAnswer {
            session_id: missing,
            answer: "hello".to_string(),
            question_id: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_answer_after_rejection_is_invalid_state() {
    let ai = Arc::new(ScriptedAiProvider::new().with_round(RoundType::Screening, 2, 3));
    let orchestrator = orchestrator_with(ai).unwrap();

    let state = orchestrator.start_interview(backend_mid()).await.unwrap();
    let state = answer_round(&orchestrator, state, 3).await;
    assert_eq!(state.state, InterviewState::Rejected);

    let err = orchestrator
        .submit_answer(SubmitAnswer {
            session_id: state.session_id.clone(),
            answer: "one more".to_string(),
            question_id: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
}

#[tokio::test]
async fn test_evaluation_failure_is_not_persisted() {
    let ai = Arc::new(
        ScriptedAiProvider::new()
            .with_failing_evaluation("model overloaded")
            .with_round(RoundType::Screening, 7, 3),
    );
    let orchestrator = orchestrator_with(ai).unwrap();

    let state = orchestrator.start_interview(backend_mid()).await.unwrap();
    let question_id = state.active_question.as_ref().unwrap().id.clone();

    let err = orchestrator
        .submit_answer(SubmitAnswer {
            session_id: state.session_id.clone(),
            answer: "first try".to_string(),
            question_id: Some(question_id.clone()),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Upstream);

    let unchanged = orchestrator.get_state(&state.session_id).await.unwrap();
    assert_eq!(unchanged.progress[0].answers, 0);

    // The same question can be answered again
    let retried = orchestrator
        .submit_answer(SubmitAnswer {
            session_id: state.session_id.clone(),
            answer: "second try".to_string(),
            question_id: Some(question_id),
        })
        .await
        .unwrap();
    assert_eq!(retried.progress[0].answers, 1);
}

#[tokio::test]
async fn test_malformed_evaluation_is_rejected_before_storing() {
    let ai = Arc::new(
        ScriptedAiProvider::new()
            .with_evaluation(Evaluation {
                raw: serde_json::json!({ "communication": 7 }),
                reasoning_text: "partial".to_string(),
                memory_hints: None,
            })
            .with_round(RoundType::Screening, 7, 3),
    );
    let orchestrator = orchestrator_with(ai.clone()).unwrap();

    let state = orchestrator.start_interview(backend_mid()).await.unwrap();
    let question_id = state.active_question.as_ref().unwrap().id.clone();

    let err = orchestrator
        .submit_answer(SubmitAnswer {
            session_id: state.session_id.clone(),
            answer: "first try".to_string(),
            question_id: Some(question_id.clone()),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().contains("relevance"));

    let unchanged = orchestrator.get_state(&state.session_id).await.unwrap();
    assert_eq!(unchanged.progress[0].answers, 0);
    assert_eq!(unchanged.active_question.as_ref().unwrap().id, question_id);

    // Retrying the question with well-formed evaluations completes the round
    let state = answer_round(&orchestrator, unchanged, 3).await;
    assert_eq!(state.state, InterviewState::Technical);
    assert_eq!(state.progress[0].verdict, Some(Verdict::Pass));
    assert_eq!(ai.remaining_evaluations(), 0);
}

#[tokio::test]
async fn test_scored_round_accepts_no_more_answers() {
    let storage = Storage::in_memory();
    let ai = Arc::new(ScriptedAiProvider::new().with_round(RoundType::Screening, 7, 3));
    let orchestrator = orchestrator_with_storage(ai.clone(), storage.clone()).unwrap();

    let state = orchestrator.start_interview(backend_mid()).await.unwrap();

    // Verdict recorded while the session still sits in its answering state
    let mut session = storage
        .sessions
        .get_by_id(&state.session_id)
        .await
        .unwrap()
        .unwrap();
    session.rounds[0].verdict = Some(Verdict::Pass);
    storage.sessions.upsert(&session).await.unwrap();

    let err = orchestrator
        .submit_answer(SubmitAnswer {
            session_id: state.session_id.clone(),
            answer: "one more".to_string(),
            question_id: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert!(ai.evaluation_requests().is_empty());

    let stored = orchestrator.get_state(&state.session_id).await.unwrap();
    assert_eq!(stored.progress[0].answers, 0);
}

#[tokio::test]
async fn test_memory_hints_accumulate_without_duplicates() {
    let hints = MemoryHints {
        strengths: vec!["Clear structure".to_string()],
        weaknesses: vec!["Light on metrics".to_string()],
        notes: vec![],
    };
    let ai = Arc::new(
        ScriptedAiProvider::new()
            .with_hints(RoundType::Screening, 7, hints.clone())
            .with_hints(RoundType::Screening, 7, hints)
            .with_round(RoundType::Screening, 7, 1),
    );
    let orchestrator = orchestrator_with(ai.clone()).unwrap();

    let state = orchestrator.start_interview(backend_mid()).await.unwrap();
    let state = answer_round(&orchestrator, state, 3).await;

    assert_eq!(state.memory.strengths, vec!["Clear structure"]);
    assert_eq!(state.memory.weaknesses, vec!["Light on metrics"]);

    // The technical question request sees the accumulated memory
    let requests = ai.question_requests();
    let technical = requests.last().unwrap();
    assert_eq!(technical.round_type, RoundType::Technical);
    assert_eq!(technical.memory.strengths, vec!["Clear structure"]);
}

#[tokio::test]
async fn test_question_requests_carry_history() {
    let ai = Arc::new(ScriptedAiProvider::new().with_round(RoundType::Screening, 7, 3));
    let orchestrator = orchestrator_with(ai.clone()).unwrap();

    let state = orchestrator.start_interview(backend_mid()).await.unwrap();
    answer_round(&orchestrator, state, 3).await;

    let requests = ai.question_requests();
    assert_eq!(requests.len(), 4);
    let indexes: Vec<usize> = requests.iter().map(|r| r.question_index).collect();
    assert_eq!(indexes, vec![0, 1, 2, 0]);
    assert_eq!(
        requests[3].asked_questions,
        vec![
            "SCREENING question 1",
            "SCREENING question 2",
            "SCREENING question 3"
        ]
    );
    assert!(requests.iter().all(|r| r.resume_context.is_none()));
}

#[tokio::test]
async fn test_profile_generated_after_screening_pass() {
    let ai = Arc::new(
        ScriptedAiProvider::new()
            .with_round(RoundType::Screening, 7, 3)
            .with_profile("Concise communicator with platform depth"),
    );
    let orchestrator = orchestrator_with(ai.clone()).unwrap();

    let state = orchestrator.start_interview(backend_mid()).await.unwrap();
    let state = answer_round(&orchestrator, state, 3).await;

    assert_eq!(
        state.profile.as_deref(),
        Some("Concise communicator with platform depth")
    );
    let requests = ai.profile_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].transcript.len(), 3);
    assert_eq!(requests[0].transcript[2].answer, "answer 2");
}

#[tokio::test]
async fn test_profile_failure_does_not_block_progress() {
    let ai = Arc::new(
        ScriptedAiProvider::new()
            .with_round(RoundType::Screening, 7, 3)
            .with_failing_profile(),
    );
    let orchestrator = orchestrator_with(ai).unwrap();

    let state = orchestrator.start_interview(backend_mid()).await.unwrap();
    let state = answer_round(&orchestrator, state, 3).await;

    assert_eq!(state.state, InterviewState::Technical);
    assert!(state.profile.is_none());
}

#[tokio::test]
async fn test_resume_skills_seed_memory() {
    let analysis = ResumeAnalysis {
        skills: ["rust", "postgres", "redis", "kafka", "k8s", "terraform"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        ..ResumeAnalysis::default()
    };
    let seeded = "Resume skills: rust, postgres, redis, kafka, k8s".to_string();
    let repeat = MemoryHints {
        strengths: vec![seeded.clone()],
        ..MemoryHints::default()
    };
    let ai = Arc::new(
        ScriptedAiProvider::new()
            .with_resume_analysis(analysis)
            .with_hints(RoundType::Screening, 7, repeat),
    );
    let orchestrator = orchestrator_with(ai.clone()).unwrap();

    let mut request = backend_mid();
    request.resume_text = Some("Ten years of backend work".to_string());
    request.resume_file_name = Some("cv.pdf".to_string());
    let state = orchestrator.start_interview(request).await.unwrap();

    assert_eq!(
        state.memory.strengths,
        vec!["Resume skills: rust, postgres, redis, kafka, k8s"]
    );
    let context = ai.question_requests()[0].resume_context.clone().unwrap();
    assert_eq!(context.extracted_text, "Ten years of backend work");
    assert!(context.analysis.is_some());

    // Evaluator hints repeating the seeded entry are merged away
    let state = answer(&orchestrator, &state, "fine").await;
    assert_eq!(state.memory.strengths, vec![seeded]);
}

#[tokio::test]
async fn test_resume_analysis_failure_keeps_resume() {
    let ai = Arc::new(ScriptedAiProvider::new().with_failing_resume_analysis());
    let orchestrator = orchestrator_with(ai.clone()).unwrap();

    let mut request = backend_mid();
    request.resume_text = Some("Ten years of backend work".to_string());
    let state = orchestrator.start_interview(request).await.unwrap();

    assert_eq!(state.state, InterviewState::Screening);
    assert!(state.memory.strengths.is_empty());
    let context = ai.question_requests()[0].resume_context.clone().unwrap();
    assert!(context.analysis.is_none());
}

#[tokio::test]
async fn test_live_state_failures_are_swallowed() {
    let live = Arc::new(FailingLiveStateStore::new());
    let storage = Storage {
        live_state: live.clone(),
        ..Storage::in_memory()
    };
    let ai = Arc::new(ScriptedAiProvider::new().with_round(RoundType::Screening, 7, 1));
    let orchestrator = orchestrator_with_storage(ai, storage).unwrap();

    let state = orchestrator.start_interview(backend_mid()).await.unwrap();
    let state = answer(&orchestrator, &state, "fine").await;

    assert_eq!(state.progress[0].answers, 1);
    assert!(live.calls() >= 3);
}

#[tokio::test]
async fn test_live_state_tracks_and_clears() {
    let storage = Storage {
        live_state: Arc::new(MemoryLiveStateStore::new(Duration::from_secs(60))),
        ..Storage::in_memory()
    };
    let ai = Arc::new(ScriptedAiProvider::new().with_round(RoundType::Screening, 1, 3));
    let orchestrator = orchestrator_with_storage(ai, storage)
        .unwrap()
        .with_live_state_ttl(Duration::from_secs(30));

    let state = orchestrator.start_interview(backend_mid()).await.unwrap();
    let state = answer(&orchestrator, &state, "one").await;

    let live = orchestrator
        .live_state(&state.session_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(live.state, InterviewState::Screening);
    assert_eq!(live.current_round, Some(RoundType::Screening));
    assert_eq!(live.question_index, 1);

    let state = answer_round(&orchestrator, state, 2).await;
    assert_eq!(state.state, InterviewState::Rejected);
    assert!(orchestrator
        .live_state(&state.session_id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_concurrent_answers_are_serialized() {
    let ai = Arc::new(
        ScriptedAiProvider::new()
            .with_round(RoundType::Screening, 7, 3)
            .with_evaluation_delay(Duration::from_millis(20)),
    );
    let orchestrator = Arc::new(orchestrator_with(ai).unwrap());

    let state = orchestrator.start_interview(backend_mid()).await.unwrap();
    let question_id = state.active_question.as_ref().unwrap().id.clone();

    let submit = |text: &'static str| {
        let orchestrator = Arc::clone(&orchestrator);
        let request = SubmitAnswer {
            session_id: state.session_id.clone(),
            answer: text.to_string(),
            question_id: Some(question_id.clone()),
        };
        tokio::spawn(async move { orchestrator.submit_answer(request).await })
    };

    let first = submit("racer one");
    let second = submit("racer two");
    let outcomes = [first.await.unwrap(), second.await.unwrap()];

    let ok = outcomes.iter().filter(|r| r.is_ok()).count();
    let rejected = outcomes
        .iter()
        .filter(|r| matches!(r, Err(e) if e.kind() == ErrorKind::Validation))
        .count();
    assert_eq!((ok, rejected), (1, 1));

    let after = orchestrator.get_state(&state.session_id).await.unwrap();
    assert_eq!(after.progress[0].answers, 1);
    assert_eq!(after.progress[0].questions_asked, 2);
}

#[tokio::test]
async fn test_round_scored_audit_payload() {
    let ai = Arc::new(ScriptedAiProvider::new().with_round(RoundType::Screening, 2, 3));
    let orchestrator = orchestrator_with(ai).unwrap();

    let state = orchestrator.start_interview(backend_mid()).await.unwrap();
    let state = answer_round(&orchestrator, state, 3).await;
    let result = orchestrator.get_result(&state.session_id).await.unwrap();

    let scored = result
        .audit_log
        .iter()
        .find(|e| e.kind == AuditEventKind::RoundScored)
        .unwrap();
    assert_eq!(scored.details["weightedScore"], 20);
    assert_eq!(scored.details["dimensions"]["communication"], 2);

    let json = serde_json::to_value(scored).unwrap();
    assert_eq!(json["type"], "ROUNDED_SCORED");

    let quota = orchestrator.engine().config(RoundType::Screening).questions_per_round;
    let answered = result
        .audit_log
        .iter()
        .filter(|e| e.kind == AuditEventKind::AnswerSubmitted)
        .count();
    assert_eq!(answered, quota);
}
