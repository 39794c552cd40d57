//! Lifecycle enums shared by the interview aggregates

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One phase of the interview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundType {
    Screening,
    Technical,
    Scenario,
}

impl RoundType {
    /// Canonical round order
    pub const ALL: [RoundType; 3] = [RoundType::Screening, RoundType::Technical, RoundType::Scenario];

    /// Position in the canonical order
    pub fn index(&self) -> usize {
        match self {
            RoundType::Screening => 0,
            RoundType::Technical => 1,
            RoundType::Scenario => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoundType::Screening => "SCREENING",
            RoundType::Technical => "TECHNICAL",
            RoundType::Scenario => "SCENARIO",
        }
    }
}

impl fmt::Display for RoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoundType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SCREENING" => Ok(RoundType::Screening),
            "TECHNICAL" => Ok(RoundType::Technical),
            "SCENARIO" => Ok(RoundType::Scenario),
            other => Err(format!("unknown round type: {other}")),
        }
    }
}

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterviewState {
    Init,
    Screening,
    Technical,
    Scenario,
    FinalDecision,
    Rejected,
}

impl InterviewState {
    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, InterviewState::FinalDecision | InterviewState::Rejected)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewState::Init => "INIT",
            InterviewState::Screening => "SCREENING",
            InterviewState::Technical => "TECHNICAL",
            InterviewState::Scenario => "SCENARIO",
            InterviewState::FinalDecision => "FINAL_DECISION",
            InterviewState::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for InterviewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterviewState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INIT" => Ok(InterviewState::Init),
            "SCREENING" => Ok(InterviewState::Screening),
            "TECHNICAL" => Ok(InterviewState::Technical),
            "SCENARIO" => Ok(InterviewState::Scenario),
            "FINAL_DECISION" => Ok(InterviewState::FinalDecision),
            "REJECTED" => Ok(InterviewState::Rejected),
            other => Err(format!("unknown interview state: {other}")),
        }
    }
}

/// Coarse candidate status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CandidateStatus {
    InProgress,
    Selected,
    Rejected,
}

impl CandidateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateStatus::InProgress => "IN_PROGRESS",
            CandidateStatus::Selected => "SELECTED",
            CandidateStatus::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CandidateStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN_PROGRESS" => Ok(CandidateStatus::InProgress),
            "SELECTED" => Ok(CandidateStatus::Selected),
            "REJECTED" => Ok(CandidateStatus::Rejected),
            other => Err(format!("unknown candidate status: {other}")),
        }
    }
}

/// Round outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Pass => "PASS",
            Verdict::Fail => "FAIL",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PASS" => Ok(Verdict::Pass),
            "FAIL" => Ok(Verdict::Fail),
            other => Err(format!("unknown verdict: {other}")),
        }
    }
}

/// Target seniority of the interview
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Junior,
    #[default]
    Mid,
    Senior,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Junior => "junior",
            Level::Mid => "mid",
            Level::Senior => "senior",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
