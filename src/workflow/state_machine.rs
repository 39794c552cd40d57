//! Round sequencing
//!
//! Pure functions only. Entering `FINAL_DECISION` or `REJECTED` is decided by
//! the orchestrator from the round verdict, not here.

use crate::domain::{InterviewState, RoundType};

/// Round every session begins with
pub const FIRST_ROUND: RoundType = RoundType::Screening;

/// Session state while `round` is active
pub fn state_for_round(round: RoundType) -> InterviewState {
    match round {
        RoundType::Screening => InterviewState::Screening,
        RoundType::Technical => InterviewState::Technical,
        RoundType::Scenario => InterviewState::Scenario,
    }
}

/// Round following `current` in canonical order, `None` after the last one
pub fn next_round(current: RoundType) -> Option<RoundType> {
    RoundType::ALL.get(current.index() + 1).copied()
}

pub fn can_accept_answer(state: InterviewState) -> bool {
    matches!(
        state,
        InterviewState::Screening | InterviewState::Technical | InterviewState::Scenario
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_sequence() {
        assert_eq!(FIRST_ROUND, RoundType::Screening);
        assert_eq!(next_round(RoundType::Screening), Some(RoundType::Technical));
        assert_eq!(next_round(RoundType::Technical), Some(RoundType::Scenario));
        assert_eq!(next_round(RoundType::Scenario), None);
    }

    #[test]
    fn test_state_for_round_is_identity() {
        for round in RoundType::ALL {
            assert_eq!(state_for_round(round).as_str(), round.as_str());
        }
    }

    #[test]
    fn test_only_round_states_accept_answers() {
        assert!(can_accept_answer(InterviewState::Screening));
        assert!(can_accept_answer(InterviewState::Technical));
        assert!(can_accept_answer(InterviewState::Scenario));
        assert!(!can_accept_answer(InterviewState::Init));
        assert!(!can_accept_answer(InterviewState::FinalDecision));
        assert!(!can_accept_answer(InterviewState::Rejected));
    }
}
