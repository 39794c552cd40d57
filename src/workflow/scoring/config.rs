//! Per-round scoring configuration

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::RoundType;
use crate::error::{Error, Result};

/// Tolerance applied when checking that weights sum to one
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Scoring rules for one round type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundScoringConfig {
    pub round_type: RoundType,
    /// Scored dimensions, in reporting order
    pub dimensions: Vec<String>,
    /// Weight per dimension; must sum to 1
    pub weights: BTreeMap<String, f64>,
    /// Minimum composite (0-100) for a pass
    pub pass_threshold: u8,
    /// Answers required before the round is scored
    pub questions_per_round: usize,
}

impl RoundScoringConfig {
    pub fn new(
        round_type: RoundType,
        weights: &[(&str, f64)],
        pass_threshold: u8,
        questions_per_round: usize,
    ) -> Self {
        Self {
            round_type,
            dimensions: weights.iter().map(|(d, _)| d.to_string()).collect(),
            weights: weights.iter().map(|(d, w)| (d.to_string(), *w)).collect(),
            pass_threshold,
            questions_per_round,
        }
    }

    /// Built-in configuration for the three rounds
    pub fn defaults() -> Vec<RoundScoringConfig> {
        vec![
            Self::new(
                RoundType::Screening,
                &[
                    ("communication", 0.4),
                    ("relevance", 0.35),
                    ("presentation", 0.25),
                ],
                60,
                3,
            ),
            Self::new(
                RoundType::Technical,
                &[("accuracy", 0.5), ("completeness", 0.3), ("clarity", 0.2)],
                60,
                3,
            ),
            Self::new(
                RoundType::Scenario,
                &[
                    ("reasoning", 0.4),
                    ("tradeoffs", 0.3),
                    ("communication", 0.3),
                ],
                60,
                3,
            ),
        ]
    }

    /// Default dimension names for a round
    pub fn default_dimensions(round_type: RoundType) -> Vec<String> {
        Self::defaults()
            .into_iter()
            .find(|cfg| cfg.round_type == round_type)
            .map(|cfg| cfg.dimensions)
            .unwrap_or_default()
    }

    pub fn weight(&self, dimension: &str) -> f64 {
        self.weights.get(dimension).copied().unwrap_or(0.0)
    }

    /// Check internal consistency of this configuration
    pub fn validate(&self) -> Result<()> {
        let round = self.round_type;

        if self.dimensions.is_empty() {
            return Err(Error::config(format!("{round}: no scoring dimensions")));
        }

        for (position, dimension) in self.dimensions.iter().enumerate() {
            if self.dimensions[..position].contains(dimension) {
                return Err(Error::config(format!(
                    "{round}: dimension `{dimension}` declared more than once"
                )));
            }
            if !self.weights.contains_key(dimension) {
                return Err(Error::config(format!(
                    "{round}: dimension `{dimension}` has no weight"
                )));
            }
        }

        for (dimension, weight) in &self.weights {
            if !self.dimensions.contains(dimension) {
                return Err(Error::config(format!(
                    "{round}: weight given for undeclared dimension `{dimension}`"
                )));
            }
            if !weight.is_finite() || *weight < 0.0 {
                return Err(Error::config(format!(
                    "{round}: weight for `{dimension}` must be a non-negative number, got {weight}"
                )));
            }
        }

        let weight_sum: f64 = self.weights.values().sum();
        if (weight_sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(Error::config(format!(
                "Invalid weights for {round}: sum={weight_sum}"
            )));
        }

        if self.pass_threshold > 100 {
            return Err(Error::config(format!(
                "{round}: pass threshold {} exceeds 100",
                self.pass_threshold
            )));
        }

        if self.questions_per_round == 0 {
            return Err(Error::config(format!(
                "{round}: questions per round must be at least 1"
            )));
        }

        Ok(())
    }
}
