//! Deterministic round scoring
//!
//! Turns raw per-answer evaluation payloads into a scorecard and verdict.
//! The verdict is decided only by comparing the weighted composite with the
//! configured threshold; reasoning text from the evaluator never affects it.
//!
//! Rounding policy: means and the composite are rounded half away from zero,
//! so a per-dimension mean of 6.5 becomes 7 and a composite of 31.5 becomes 32.
//! Both are computed in integer arithmetic; weights are resolved to millionths
//! first so that exact halves are never lost to binary fractions.

use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

use super::config::RoundScoringConfig;
use crate::domain::{RoundType, Scorecard, Verdict};
use crate::error::{Error, Result};

/// Highest score a single dimension may carry
pub const MAX_DIMENSION_SCORE: i64 = 10;

/// Weights are resolved to this many units before the composite is summed
const WEIGHT_SCALE: i64 = 1_000_000;

/// Outcome of scoring one round
#[derive(Debug, Clone, PartialEq)]
pub struct RoundResult {
    pub round_type: RoundType,
    pub scorecard: Scorecard,
    pub verdict: Verdict,
    /// Advisory explanation lines, audit only
    pub reasons: Vec<String>,
}

/// Holds one validated configuration per round type
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    // Indexed by `RoundType::index`, complete by construction
    configs: Vec<RoundScoringConfig>,
}

impl DecisionEngine {
    /// Validate and install the configuration set.
    ///
    /// Every round type must be configured exactly once.
    pub fn new(configs: impl IntoIterator<Item = RoundScoringConfig>) -> Result<Self> {
        let mut slots: Vec<Option<RoundScoringConfig>> = vec![None; RoundType::ALL.len()];

        for cfg in configs {
            cfg.validate()?;
            let slot = &mut slots[cfg.round_type.index()];
            if slot.is_some() {
                return Err(Error::config(format!(
                    "{} configured more than once",
                    cfg.round_type
                )));
            }
            *slot = Some(cfg);
        }

        let configs = RoundType::ALL
            .iter()
            .zip(slots)
            .map(|(round, slot)| {
                slot.ok_or_else(|| Error::config(format!("no scoring configuration for {round}")))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { configs })
    }

    /// Engine with the built-in round configuration
    pub fn with_defaults() -> Result<Self> {
        Self::new(RoundScoringConfig::defaults())
    }

    pub fn config(&self, round_type: RoundType) -> &RoundScoringConfig {
        &self.configs[round_type.index()]
    }

    /// Check one evaluation payload against the round's dimensions.
    ///
    /// `index` only labels the error message.
    pub fn validate_evaluation(
        &self,
        round_type: RoundType,
        index: usize,
        raw: &Value,
    ) -> Result<()> {
        parse_evaluation(self.config(round_type), index, raw).map(|_| ())
    }

    pub fn compute_round_result(
        &self,
        round_type: RoundType,
        raw_evaluations: &[Value],
        reasoning_texts: &[String],
    ) -> Result<RoundResult> {
        let cfg = self.config(round_type);

        if raw_evaluations.is_empty() {
            return Err(Error::invalid_state(format!(
                "No evaluations provided for {round_type}"
            )));
        }

        let per_answer = raw_evaluations
            .iter()
            .enumerate()
            .map(|(index, raw)| parse_evaluation(cfg, index, raw))
            .collect::<Result<Vec<_>>>()?;

        let count = per_answer.len() as i64;
        let mut dimensions = BTreeMap::new();
        for (position, dimension) in cfg.dimensions.iter().enumerate() {
            let total: i64 = per_answer.iter().map(|scores| scores[position]).sum();
            let mean = round_half_up(total, count);
            dimensions.insert(dimension.clone(), mean as u8);
        }

        // Each mean is out of 10, so `mean * 10` is its percentage
        let weighted: i64 = cfg
            .dimensions
            .iter()
            .map(|d| i64::from(dimensions[d]) * 10 * weight_units(cfg.weight(d)))
            .sum();
        let weighted_score = round_half_up(weighted, WEIGHT_SCALE).clamp(0, 100) as u8;

        let verdict = if weighted_score >= cfg.pass_threshold {
            Verdict::Pass
        } else {
            Verdict::Fail
        };

        let mut reasons = vec![format!(
            "Weighted score {weighted_score} (threshold {}) => {verdict}",
            cfg.pass_threshold
        )];
        for dimension in &cfg.dimensions {
            let value = dimensions[dimension];
            if value <= 4 {
                reasons.push(format!("{dimension} is weak ({value}/10)"));
            }
            if value >= 8 {
                reasons.push(format!("{dimension} is strong ({value}/10)"));
            }
        }

        debug!(
            round = %round_type,
            weighted_score,
            verdict = %verdict,
            answers = per_answer.len(),
            "round scored"
        );

        let scorecard = Scorecard {
            raw_evaluation: json!({
                "perAnswer": raw_evaluations,
                "aggregate": &dimensions,
            }),
            dimensions,
            weighted_score,
            reasoning: join_unique(reasoning_texts),
        };

        Ok(RoundResult {
            round_type,
            scorecard,
            verdict,
            reasons,
        })
    }
}

/// Extract the configured dimensions, in config order, from one payload
fn parse_evaluation(cfg: &RoundScoringConfig, index: usize, raw: &Value) -> Result<Vec<i64>> {
    let object: &Map<String, Value> = raw.as_object().ok_or_else(|| {
        Error::validation(format!(
            "evaluation {index} for {} is not a JSON object",
            cfg.round_type
        ))
    })?;

    cfg.dimensions
        .iter()
        .map(|dimension| {
            let value = object.get(dimension).ok_or_else(|| {
                Error::validation(format!(
                    "evaluation {index} for {} is missing dimension `{dimension}`",
                    cfg.round_type
                ))
            })?;
            let score = as_integer(value).ok_or_else(|| {
                Error::validation(format!(
                    "evaluation {index}: `{dimension}` must be an integer, got {value}"
                ))
            })?;
            if !(0..=MAX_DIMENSION_SCORE).contains(&score) {
                return Err(Error::validation(format!(
                    "evaluation {index}: `{dimension}` must be within 0..={MAX_DIMENSION_SCORE}, got {score}"
                )));
            }
            Ok(score)
        })
        .collect()
}

/// `numerator / denominator` rounded half up; both are non-negative here
fn round_half_up(numerator: i64, denominator: i64) -> i64 {
    (2 * numerator + denominator) / (2 * denominator)
}

fn weight_units(weight: f64) -> i64 {
    (weight * WEIGHT_SCALE as f64).round() as i64
}

/// Integral JSON numbers only; `7.0` is accepted, `7.5` and `"7"` are not
fn as_integer(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    (f.fract() == 0.0 && f.abs() <= i64::MAX as f64).then_some(f as i64)
}

fn join_unique(texts: &[String]) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for text in texts {
        if !text.is_empty() && !seen.contains(&text.as_str()) {
            seen.push(text);
        }
    }
    seen.join("\n\n")
}
