//! Completion Oracle: decides innings and match completion.
//!
//! `evaluate` and `decide_outcome` are pure. `check_innings_completion`
//! applies their verdict to the state and is run after every delivery.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::{Margin, MatchOutcome, MatchState, TeamSide};

/// Which completion conditions currently hold for the active innings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CompletionCheck {
    pub all_out: bool,
    pub overs_complete: bool,
    /// Innings 2 only
    pub target_reached: bool,
}

impl CompletionCheck {
    pub fn any(&self) -> bool {
        self.all_out || self.overs_complete || self.target_reached
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum CompletionStatus {
    InProgress,
    /// Innings 1 is done; the caller should prompt `start_innings2`.
    AwaitingSecondInnings { all_out: bool },
    MatchComplete { outcome: Option<MatchOutcome> },
}

/// `None` when the active innings was never initialized.
pub fn evaluate(state: &MatchState) -> Option<CompletionCheck> {
    let innings = state.active_innings();
    let batting = innings.batting_side?;
    let target_reached = state.current_inning == 2
        && state.target_score.is_some_and(|target| innings.total_runs >= target);
    Some(CompletionCheck {
        all_out: innings.wickets >= state.max_wickets(batting),
        overs_complete: innings.completed_overs >= state.total_overs,
        target_reached,
    })
}

/// Result of the chase as it stands. Only meaningful in innings 2.
///
/// A lost target falls back to innings 1 total + 1.
pub fn decide_outcome(state: &MatchState) -> Option<MatchOutcome> {
    let innings = &state.innings2;
    let batting = innings.batting_side?;
    let target = state
        .target_score
        .unwrap_or(state.innings1.total_runs + 1);

    if innings.total_runs >= target {
        let remaining = state.max_wickets(batting).saturating_sub(innings.wickets);
        return Some(MatchOutcome::Won { side: batting, margin: Margin::Wickets(remaining) });
    }

    let shortfall = target - 1 - innings.total_runs;
    if shortfall == 0 {
        Some(MatchOutcome::Tied)
    } else {
        Some(MatchOutcome::Won { side: batting.opponent(), margin: Margin::Runs(shortfall) })
    }
}

/// Human-readable result line, e.g. `Lions wins by 7 wickets`.
pub fn describe_outcome(state: &MatchState, outcome: &MatchOutcome) -> String {
    match outcome {
        MatchOutcome::Tied => "Match tied".to_string(),
        MatchOutcome::Won { side, margin } => {
            let name = team_label(state, *side);
            match margin {
                Margin::Runs(n) => format!("{name} wins by {n} {}", plural(*n, "run")),
                Margin::Wickets(n) => format!("{name} wins by {n} {}", plural(*n, "wicket")),
            }
        }
    }
}

fn team_label(state: &MatchState, side: TeamSide) -> String {
    let name = state.team(side).name.trim();
    if name.is_empty() {
        match side {
            TeamSide::Home => "Team A".to_string(),
            TeamSide::Away => "Team B".to_string(),
        }
    } else {
        name.to_string()
    }
}

fn plural(n: u32, word: &str) -> String {
    if n == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

impl MatchState {
    /// Current status without touching the state.
    pub fn completion_status(&self) -> CompletionStatus {
        if self.match_over {
            return CompletionStatus::MatchComplete { outcome: self.outcome };
        }
        if self.current_inning == 1 && (self.innings1.ready_for_innings2 || self.innings1.is_completed)
        {
            return CompletionStatus::AwaitingSecondInnings { all_out: self.innings1.is_all_out };
        }
        CompletionStatus::InProgress
    }

    /// Re-evaluate completion for the active innings and record the verdict.
    ///
    /// Innings 1 is never closed here: it only raises `ready_for_innings2`.
    /// Innings 2 ends the match as soon as any condition holds.
    pub fn check_innings_completion(&mut self) -> CompletionStatus {
        if self.match_over {
            return self.completion_status();
        }
        let Some(check) = evaluate(self) else {
            return CompletionStatus::InProgress;
        };

        if self.current_inning == 1 {
            if check.all_out || check.overs_complete {
                let innings = &mut self.innings1;
                if !innings.ready_for_innings2 {
                    info!(
                        runs = innings.total_runs,
                        wickets = innings.wickets,
                        overs = %innings.overs_display(),
                        all_out = check.all_out,
                        "innings 1 ready for transition"
                    );
                }
                innings.ready_for_innings2 = true;
                if check.all_out {
                    innings.is_all_out = true;
                }
            }
        } else if check.any() {
            if check.all_out {
                self.innings2.is_all_out = true;
            }
            if let Some(outcome) = decide_outcome(self) {
                self.finish_match(outcome);
            }
        }
        self.completion_status()
    }

    pub(crate) fn finish_match(&mut self, outcome: MatchOutcome) {
        let result = describe_outcome(self, &outcome);
        info!(match_id = %self.match_id, result = %result, "match over");
        self.active_innings_mut().is_completed = true;
        self.match_over = true;
        self.outcome = Some(outcome);
        self.match_result = Some(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InningsData;

    fn chase_state(first_innings: u32, runs: u32, wickets: u32) -> MatchState {
        let mut state = MatchState::new();
        state.home.name = "Lions".into();
        state.away.name = "Tigers".into();
        state.innings1 = InningsData::new(TeamSide::Home, TeamSide::Away);
        state.innings1.total_runs = first_innings;
        state.innings2 = InningsData::new(TeamSide::Away, TeamSide::Home);
        state.innings2.total_runs = runs;
        state.innings2.wickets = wickets;
        state.current_inning = 2;
        state.target_score = Some(first_innings + 1);
        state
    }

    #[test]
    fn test_evaluate_uninitialized() {
        assert!(evaluate(&MatchState::new()).is_none());
    }

    #[test]
    fn test_chase_won_by_wickets() {
        let state = chase_state(150, 151, 3);
        let outcome = decide_outcome(&state).unwrap();
        assert_eq!(
            outcome,
            MatchOutcome::Won { side: TeamSide::Away, margin: Margin::Wickets(7) }
        );
        assert_eq!(describe_outcome(&state, &outcome), "Tigers wins by 7 wickets");
    }

    #[test]
    fn test_defended_total_and_tie() {
        let state = chase_state(150, 138, 10);
        let outcome = decide_outcome(&state).unwrap();
        assert_eq!(describe_outcome(&state, &outcome), "Lions wins by 12 runs");

        let tied = chase_state(150, 150, 10);
        assert_eq!(decide_outcome(&tied), Some(MatchOutcome::Tied));

        let one_run = chase_state(150, 149, 10);
        let outcome = decide_outcome(&one_run).unwrap();
        assert_eq!(describe_outcome(&one_run, &outcome), "Lions wins by 1 run");
    }

    #[test]
    fn test_innings_two_all_out_ends_match() {
        let mut state = chase_state(100, 80, 10);
        let status = state.check_innings_completion();
        assert!(state.match_over);
        assert!(state.innings2.is_completed);
        assert!(state.innings2.is_all_out);
        assert_eq!(state.match_result.as_deref(), Some("Lions wins by 20 runs"));
        assert!(matches!(status, CompletionStatus::MatchComplete { .. }));
    }

    #[test]
    fn test_innings_one_only_signals() {
        let mut state = MatchState::new();
        state.total_overs = 1;
        state.innings1 = InningsData::new(TeamSide::Home, TeamSide::Away);
        state.innings1.completed_overs = 1;

        let status = state.check_innings_completion();
        assert_eq!(status, CompletionStatus::AwaitingSecondInnings { all_out: false });
        assert!(state.innings1.ready_for_innings2);
        assert!(!state.innings1.is_completed);
        assert!(!state.match_over);
    }
}
