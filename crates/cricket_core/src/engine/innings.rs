//! Innings Lifecycle: initialize, transition to the chase, close.

use tracing::info;

use super::oracle::{decide_outcome, CompletionStatus};
use crate::error::{Result, ScoringError};
use crate::models::{InningsData, MatchState, TeamSide};

impl MatchState {
    /// Reset the active innings to a blank ledger for the given sides.
    ///
    /// Crease and bowler pointers are cleared along with everything else.
    pub fn initialize_innings(&mut self, batting: TeamSide, bowling: TeamSide) -> Result<()> {
        if batting == bowling {
            return Err(ScoringError::InvalidSetup(
                "batting and bowling sides must differ".into(),
            ));
        }
        if self.match_over {
            return Err(ScoringError::MatchOver);
        }
        *self.active_innings_mut() = InningsData::new(batting, bowling);
        self.team_mut(batting).set_role(true);
        self.team_mut(bowling).set_role(false);
        info!(inning = self.current_inning, ?batting, "innings initialized");
        Ok(())
    }

    /// Move to innings 2. Allowed once, after innings 1 is ready or closed.
    pub fn start_innings2(&mut self) -> Result<()> {
        if self.match_over {
            return Err(ScoringError::MatchOver);
        }
        if self.current_inning == 2 {
            return Err(ScoringError::InvalidTransition("innings 2 already started".into()));
        }
        let first = &self.innings1;
        let (Some(batting_first), Some(bowling_first)) = (first.batting_side, first.bowling_side)
        else {
            return Err(ScoringError::not_ready("innings 1 was never initialized"));
        };
        if !(first.ready_for_innings2 || first.is_completed) {
            return Err(ScoringError::InvalidTransition("innings 1 is still in progress".into()));
        }

        self.innings1.is_completed = true;
        self.current_inning = 2;
        self.innings2 = InningsData::new(bowling_first, batting_first);
        self.team_mut(bowling_first).set_role(true);
        self.team_mut(batting_first).set_role(false);
        self.target_score = Some(self.innings1.total_runs + 1);

        info!(target = ?self.target_score, "innings 2 started");
        Ok(())
    }

    /// Close the active innings by hand. Closing innings 2 ends the match.
    pub fn end_innings(&mut self) -> Result<CompletionStatus> {
        if !self.active_innings().is_initialized() {
            return Err(ScoringError::not_ready("innings was never initialized"));
        }
        if self.match_over {
            return Ok(self.completion_status());
        }

        if self.current_inning == 1 {
            self.innings1.is_completed = true;
            info!(runs = self.innings1.total_runs, "innings 1 closed");
        } else if let Some(outcome) = decide_outcome(self) {
            self.finish_match(outcome);
        }
        Ok(self.completion_status())
    }

    /// Explicit correction of the chase target.
    pub fn set_target_score(&mut self, value: u32) {
        self.target_score = Some(value);
    }

    /// Runs still needed, innings 2 only.
    pub fn runs_required(&self) -> Option<u32> {
        if self.current_inning != 2 {
            return None;
        }
        let target = self.target_score?;
        Some(target.saturating_sub(self.innings2.total_runs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> MatchState {
        let mut state = MatchState::new();
        state.initialize_innings(TeamSide::Home, TeamSide::Away).unwrap();
        state
    }

    #[test]
    fn test_initialize_rejects_same_side() {
        let mut state = MatchState::new();
        assert!(state.initialize_innings(TeamSide::Home, TeamSide::Home).is_err());
        assert!(!state.innings1.is_initialized());
    }

    #[test]
    fn test_start_innings2_requires_ready() {
        let mut state = started();
        let err = state.start_innings2().unwrap_err();
        assert!(matches!(err, ScoringError::InvalidTransition(_)));
        assert_eq!(state.current_inning, 1);
    }

    #[test]
    fn test_start_innings2_swaps_sides_and_sets_target() {
        let mut state = started();
        state.innings1.total_runs = 142;
        state.innings1.ready_for_innings2 = true;
        state.start_innings2().unwrap();

        assert_eq!(state.current_inning, 2);
        assert!(state.innings1.is_completed);
        assert_eq!(state.innings2.batting_side, Some(TeamSide::Away));
        assert_eq!(state.innings2.bowling_side, Some(TeamSide::Home));
        assert!(state.away.is_batting && !state.away.is_bowling);
        assert!(state.home.is_bowling && !state.home.is_batting);
        assert_eq!(state.target_score, Some(143));
        assert_eq!(state.runs_required(), Some(143));

        // taken exactly once
        assert!(state.start_innings2().is_err());
    }

    #[test]
    fn test_end_innings_guards_uninitialized() {
        let mut state = MatchState::new();
        assert!(matches!(state.end_innings(), Err(ScoringError::NotReady { .. })));
        assert!(!state.match_over);
    }

    #[test]
    fn test_end_innings_two_decides_match() {
        let mut state = started();
        state.home.name = "Lions".into();
        state.innings1.total_runs = 90;
        state.end_innings().unwrap();
        assert!(state.innings1.is_completed);
        state.start_innings2().unwrap();
        state.innings2.total_runs = 70;

        let status = state.end_innings().unwrap();
        assert!(state.match_over);
        assert_eq!(state.match_result.as_deref(), Some("Lions wins by 20 runs"));
        assert!(matches!(status, CompletionStatus::MatchComplete { .. }));
    }

    #[test]
    fn test_target_override() {
        let mut state = started();
        state.set_target_score(77);
        assert_eq!(state.target_score, Some(77));
    }
}
