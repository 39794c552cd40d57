//! Round scoring: configuration and the decision engine
//!
//! All composite scores use a 0-100 range; individual dimensions use 0-10.

pub mod config;
pub mod engine;

pub use config::RoundScoringConfig;
pub use engine::{DecisionEngine, RoundResult};
