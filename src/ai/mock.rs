//! Deterministic offline provider
//!
//! Used when no API key is configured. Scores come from answer length and a
//! handful of structure keywords; the decision engine still makes the call.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{AiProvider, Evaluation, EvaluationRequest, GeneratedQuestion, QuestionRequest};
use crate::domain::{MemoryHints, RoundType};
use crate::error::Result;

const SCREENING_PROMPTS: &[&str] = &[
    "Tell me about a time you collaborated across teams.",
    "Walk me through a project you are proud of and your part in it.",
    "Why are you interested in this role right now?",
];

const TECHNICAL_PROMPTS: &[&str] = &[
    "Explain how you would design a rate limiter for an API.",
    "How would you make a slow database query fast again?",
    "Describe how you would version a public HTTP API.",
];

const SCENARIO_PROMPTS: &[&str] = &[
    "You discover latency spikes after a deployment. Walk through your approach.",
    "A teammate's change is breaking production nightly. What do you do?",
    "You must cut a feature to hit a deadline. How do you decide what goes?",
];

const STRUCTURE_MARKERS: &[&str] = &[
    "first",
    "second",
    "finally",
    "tradeoff",
    "trade-off",
    "because",
    "therefore",
];

#[derive(Debug, Clone, Default)]
pub struct MockAiProvider;

impl MockAiProvider {
    pub fn new() -> Self {
        Self
    }

    fn prompts(round_type: RoundType) -> &'static [&'static str] {
        match round_type {
            RoundType::Screening => SCREENING_PROMPTS,
            RoundType::Technical => TECHNICAL_PROMPTS,
            RoundType::Scenario => SCENARIO_PROMPTS,
        }
    }

    /// Heuristic scores under the built-in dimension names for each round
    pub fn score_answer(round_type: RoundType, answer: &str) -> Value {
        let text = answer.trim().to_lowercase();
        let len = text.chars().count();
        let structured = u8::from(mentions_any(&text, STRUCTURE_MARKERS));
        let clamp = |score: u8| score.min(10);
        let pick = |condition: bool, high: u8, low: u8| if condition { high } else { low };

        match round_type {
            RoundType::Screening => json!({
                "communication": clamp(pick(len > 120, 7, 5) + structured),
                "relevance": clamp(pick(len > 60, 6, 4)),
                "presentation": clamp(pick(len > 150, 7, 5) + structured),
            }),
            RoundType::Technical => {
                let on_topic =
                    mentions_any(&text, &["token", "bucket", "limit", "429", "sliding", "index"]);
                json!({
                    "accuracy": clamp(pick(on_topic, 7, 5) + structured),
                    "completeness": clamp(pick(len > 200, 7, 5)),
                    "clarity": clamp(pick(len > 120, 6, 5) + structured),
                })
            }
            RoundType::Scenario => {
                let investigative =
                    mentions_any(&text, &["measure", "metric", "trace", "rollback", "hypothesis"]);
                let weighs_costs =
                    mentions_any(&text, &["tradeoff", "trade-off", "cost", "risk", "impact"]);
                json!({
                    "reasoning": clamp(pick(investigative, 7, 5) + structured),
                    "tradeoffs": clamp(pick(weighs_costs, 7, 5)),
                    "communication": clamp(pick(len > 120, 6, 5) + structured),
                })
            }
        }
    }
}

fn mentions_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate_question(&self, request: &QuestionRequest) -> Result<GeneratedQuestion> {
        let prompts = Self::prompts(request.round_type);
        let base = prompts
            .iter()
            .map(|p| format!("[MOCK {}] {p}", request.round_type))
            .find(|p| !request.asked_questions.contains(p))
            .unwrap_or_else(|| {
                format!(
                    "[MOCK {} #{}] {}",
                    request.round_type,
                    request.question_index + 1,
                    prompts[request.question_index % prompts.len()]
                )
            });

        Ok(GeneratedQuestion { prompt: base })
    }

    async fn evaluate_answer(&self, request: &EvaluationRequest) -> Result<Evaluation> {
        let text = request.answer.trim();
        let structured = mentions_any(&text.to_lowercase(), STRUCTURE_MARKERS);

        let mut hints = MemoryHints::default();
        if structured {
            hints.strengths.push("Structured communication".to_string());
        }
        if text.chars().count() < 80 {
            hints.weaknesses.push("Insufficient detail".to_string());
        }

        Ok(Evaluation {
            raw: Self::score_answer(request.round_type, text),
            reasoning_text: "Mock evaluation: deterministic heuristics; backend makes decisions."
                .to_string(),
            memory_hints: Some(hints),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Level, StructuredMemory};
    use crate::workflow::scoring::DecisionEngine;

    fn question_request(round_type: RoundType, asked: Vec<String>, index: usize) -> QuestionRequest {
        QuestionRequest {
            round_type,
            role: "backend".to_string(),
            level: Level::Mid,
            memory: StructuredMemory::default(),
            asked_questions: asked,
            question_index: index,
            resume_context: None,
        }
    }

    #[tokio::test]
    async fn test_questions_do_not_repeat() {
        let provider = MockAiProvider::new();
        let mut asked = Vec::new();
        for index in 0..5 {
            let q = provider
                .generate_question(&question_request(RoundType::Technical, asked.clone(), index))
                .await
                .unwrap();
            assert!(!asked.contains(&q.prompt), "repeated {}", q.prompt);
            asked.push(q.prompt);
        }
    }

    #[tokio::test]
    async fn test_mock_scores_are_accepted_by_engine() {
        let provider = MockAiProvider::new();
        let engine = DecisionEngine::with_defaults().unwrap();

        for round_type in RoundType::ALL {
            let evaluation = provider
                .evaluate_answer(&EvaluationRequest {
                    round_type,
                    question: "q".to_string(),
                    answer: "First I would measure, because the tradeoff matters.".to_string(),
                    memory: StructuredMemory::default(),
                })
                .await
                .unwrap();
            engine
                .compute_round_result(round_type, &[evaluation.raw], &[])
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_short_structured_answer_hints() {
        let evaluation = MockAiProvider::new()
            .evaluate_answer(&EvaluationRequest {
                round_type: RoundType::Screening,
                question: "q".to_string(),
                answer: "First, because.".to_string(),
                memory: StructuredMemory::default(),
            })
            .await
            .unwrap();

        let hints = evaluation.memory_hints.unwrap();
        assert_eq!(hints.strengths, vec!["Structured communication"]);
        assert_eq!(hints.weaknesses, vec!["Insufficient detail"]);
    }

    #[test]
    fn test_mock_offers_no_extensions() {
        let provider = MockAiProvider::new();
        assert!(provider.resume_analyzer().is_none());
        assert!(provider.profile_generator().is_none());
    }
}
