//! OpenAI-compatible chat-completions provider
//!
//! Questions and profiles are requested as plain text; evaluations and resume
//! analysis are requested as schema-constrained JSON. The provider never
//! decides pass/fail: scores are forwarded raw to the decision engine.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use super::{
    AiConfig, AiProvider, Evaluation, EvaluationRequest, GeneratedQuestion, ProfileGenerator,
    ProfileRequest, QuestionRequest, ResumeAnalyzer,
};
use crate::domain::{MemoryHints, ResumeAnalysis};
use crate::error::{Error, Result};
use crate::workflow::scoring::RoundScoringConfig;

const QUESTION_SYSTEM_PROMPT: &str = "You generate ONE creative and non-generic interview question. \
Do not evaluate. Do not decide pass/fail. Output plain text only. \
STRICTLY do not repeat any question from the 'askedQuestions' list. \
Focus on the candidate's specific role and level.";

const EVALUATION_SYSTEM_PROMPT: &str = "You are an interview answer evaluator. \
Output MUST be JSON ONLY (no markdown). \
Do not decide pass/fail. Provide 0-10 integer scores for requested dimensions.";

const RESUME_SYSTEM_PROMPT: &str =
    "You analyze resumes and extract structured information. Output STRICT JSON only.";

const PROFILE_SYSTEM_PROMPT: &str = "You are an expert recruiter. \
Analyze the interview transcript and generate a professional profile summary for the candidate. \
Focus on their communication skills, technical depth, and cultural fit. Output plain text.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Fields the provider itself reads out of an evaluation payload
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EvaluationEnvelope {
    summary: String,
    #[serde(default)]
    memory_hints: Option<MemoryHints>,
}

pub struct OpenAiCompatibleProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiCompatibleProvider {
    pub fn new(config: &AiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| Error::config("OPENAI_API_KEY is required for the OpenAI provider"))?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    async fn chat(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
        response_format: Option<Value>,
    ) -> Result<Option<String>> {
        let request = ChatRequest {
            model: &self.model,
            temperature,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            response_format,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::external(format!("API request failed: {}", e)))?;

        match response.status() {
            status if status.is_success() => {
                let body: ChatResponse = response
                    .json()
                    .await
                    .map_err(|e| Error::external(format!("Failed to parse response: {}", e)))?;
                Ok(body
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|c| c.message)
                    .and_then(|m| m.content))
            }
            StatusCode::TOO_MANY_REQUESTS => Err(Error::external("Rate limit exceeded")),
            StatusCode::UNAUTHORIZED => Err(Error::external("Invalid API key")),
            status => {
                let error_text = response.text().await.unwrap_or_default();
                Err(Error::external(format!(
                    "OpenAI-compatible request failed ({}): {}",
                    status, error_text
                )))
            }
        }
    }

    async fn chat_text(&self, system: &str, user: &Value, temperature: f32) -> Result<String> {
        let content = self
            .chat(system, &user.to_string(), temperature, None)
            .await?
            .unwrap_or_default();
        Ok(content.trim().to_string())
    }

    async fn chat_json(&self, system: &str, user: &Value, schema: Value) -> Result<Value> {
        let format = json!({ "type": "json_schema", "json_schema": schema });
        let content = self
            .chat(system, &user.to_string(), 0.0, Some(format))
            .await?
            .unwrap_or_else(|| "{}".to_string());

        serde_json::from_str(content.trim())
            .map_err(|e| Error::external(format!("Provider returned invalid JSON: {}", e)))
    }
}

fn evaluation_schema(dimensions: &[String]) -> Value {
    let mut properties = serde_json::Map::new();
    for dimension in dimensions {
        properties.insert(
            dimension.clone(),
            json!({ "type": "integer", "minimum": 0, "maximum": 10 }),
        );
    }
    properties.insert("summary".to_string(), json!({ "type": "string" }));
    properties.insert(
        "memoryHints".to_string(),
        json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "strengths": { "type": "array", "items": { "type": "string" } },
                "weaknesses": { "type": "array", "items": { "type": "string" } },
                "notes": { "type": "array", "items": { "type": "string" } }
            }
        }),
    );

    let mut required: Vec<Value> = dimensions.iter().map(|d| json!(d)).collect();
    required.push(json!("summary"));

    json!({
        "name": "InterviewEvaluation",
        "schema": {
            "type": "object",
            "additionalProperties": true,
            "properties": properties,
            "required": required
        },
        "strict": true
    })
}

fn resume_schema() -> Value {
    json!({
        "name": "ResumeAnalysis",
        "schema": {
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "experience": { "type": "array", "items": { "type": "string" } },
                "skills": { "type": "array", "items": { "type": "string" } },
                "education": { "type": "array", "items": { "type": "string" } },
                "summary": { "type": "string" }
            },
            "required": ["experience", "skills", "education", "summary"]
        },
        "strict": true
    })
}

/// Split an evaluation payload into the raw scores and the text fields
fn parse_evaluation(raw: Value) -> Result<Evaluation> {
    let envelope: EvaluationEnvelope = serde_json::from_value(raw.clone())
        .map_err(|e| Error::external(format!("Evaluation payload is malformed: {}", e)))?;

    Ok(Evaluation {
        raw,
        reasoning_text: envelope.summary,
        memory_hints: envelope.memory_hints,
    })
}

#[async_trait]
impl AiProvider for OpenAiCompatibleProvider {
    async fn generate_question(&self, request: &QuestionRequest) -> Result<GeneratedQuestion> {
        let user = json!({
            "roundType": request.round_type,
            "role": request.role,
            "level": request.level,
            "memory": request.memory,
            "askedQuestions": request.asked_questions,
            "questionIndex": request.question_index,
            "resumeContext": request.resume_context,
        });

        let prompt = self.chat_text(QUESTION_SYSTEM_PROMPT, &user, 0.7).await?;
        if prompt.is_empty() {
            return Err(Error::external("Provider returned an empty question"));
        }
        debug!(round = %request.round_type, "question generated");
        Ok(GeneratedQuestion { prompt })
    }

    async fn evaluate_answer(&self, request: &EvaluationRequest) -> Result<Evaluation> {
        let dimensions = RoundScoringConfig::default_dimensions(request.round_type);
        let user = json!({
            "roundType": request.round_type,
            "question": request.question,
            "answer": request.answer,
            "memory": request.memory,
            "scoringScale": "0-10 integers",
        });

        let raw = self
            .chat_json(EVALUATION_SYSTEM_PROMPT, &user, evaluation_schema(&dimensions))
            .await?;
        parse_evaluation(raw)
    }

    fn resume_analyzer(&self) -> Option<&dyn ResumeAnalyzer> {
        Some(self)
    }

    fn profile_generator(&self) -> Option<&dyn ProfileGenerator> {
        Some(self)
    }
}

#[async_trait]
impl ResumeAnalyzer for OpenAiCompatibleProvider {
    async fn analyze_resume(
        &self,
        resume_text: &str,
        target_role: &str,
    ) -> Result<ResumeAnalysis> {
        let user = json!({
            "resumeText": resume_text,
            "targetRole": target_role,
            "instruction": "Extract experience entries, technical skills, education details, and provide a brief summary."
        });

        let raw = self
            .chat_json(RESUME_SYSTEM_PROMPT, &user, resume_schema())
            .await?;
        serde_json::from_value(raw)
            .map_err(|e| Error::external(format!("Resume analysis is malformed: {}", e)))
    }
}

#[async_trait]
impl ProfileGenerator for OpenAiCompatibleProvider {
    async fn generate_profile(&self, request: &ProfileRequest) -> Result<String> {
        let user = json!({
            "role": request.role,
            "level": request.level,
            "transcript": request.transcript,
        });
        self.chat_text(PROFILE_SYSTEM_PROMPT, &user, 0.7).await
    }
}
