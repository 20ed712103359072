//! Delivery Processor: applies one ball to the match state.
//!
//! All preconditions are checked before the first mutation, so a rejected
//! ball leaves the state untouched.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::oracle::CompletionStatus;
use crate::error::{Result, ScoringError};
use crate::models::{
    DeliveryEffects, DeliveryEvent, DeliveryInput, ExtraType, InningsData, Margin, MatchOutcome,
    MatchState, PartnershipRecord, PlayerId, BALLS_PER_OVER, MAX_RUNS_PER_BALL,
};

/// What the caller needs to know after a ball, e.g. to prompt for a new
/// bowler or batsman.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryOutcome {
    pub over_completed: bool,
    pub wicket_fell: bool,
    pub strike_rotated: bool,
    pub status: CompletionStatus,
}

/// Players involved in the ball, resolved during validation.
struct Crease {
    striker: PlayerId,
    non_striker: PlayerId,
    bowler: PlayerId,
    out_batsman: Option<PlayerId>,
}

/// How a ball's runs are split between batsman, bowler, team and extras.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSplit {
    pub total: u32,
    pub batsman: u32,
    pub bowler: u32,
    pub extras: u32,
}

impl RunSplit {
    pub fn for_input(input: &DeliveryInput, wide_penalty: u32, no_ball_penalty: u32) -> Self {
        let runs = input.runs;
        match input.extra_type {
            None => Self { total: runs, batsman: runs, bowler: runs, extras: 0 },
            Some(ExtraType::NoBall) => Self {
                total: runs.saturating_add(no_ball_penalty),
                batsman: runs,
                bowler: runs.saturating_add(no_ball_penalty),
                extras: no_ball_penalty,
            },
            // Wide penalty goes to extras only, never to the bowler's figures
            Some(ExtraType::Wide) => Self {
                total: runs.saturating_add(wide_penalty),
                batsman: 0,
                bowler: runs,
                extras: runs.saturating_add(wide_penalty),
            },
            Some(ExtraType::Bye) | Some(ExtraType::LegBye) => {
                Self { total: runs, batsman: 0, bowler: 0, extras: runs }
            }
        }
    }
}

/// Batsman's personal tally counts the runs off the bat on fair balls and no-balls.
pub(crate) fn credits_batsman_runs(extra: Option<ExtraType>) -> bool {
    matches!(extra, None | Some(ExtraType::NoBall))
}

/// Balls faced: every legal delivery.
pub(crate) fn counts_ball_faced(extra: Option<ExtraType>) -> bool {
    !extra.is_some_and(|e| e.is_illegal())
}

fn extras_bucket(innings: &mut InningsData, extra: Option<ExtraType>) -> Option<&mut u32> {
    let breakdown = &mut innings.extras_breakdown;
    match extra? {
        ExtraType::Wide => Some(&mut breakdown.wides),
        ExtraType::NoBall => Some(&mut breakdown.no_balls),
        ExtraType::Bye => Some(&mut breakdown.byes),
        ExtraType::LegBye => Some(&mut breakdown.leg_byes),
    }
}

pub(crate) fn add_extras(innings: &mut InningsData, extra: Option<ExtraType>, amount: u32) {
    if let Some(bucket) = extras_bucket(innings, extra) {
        *bucket += amount;
        innings.extras += amount;
    }
}

pub(crate) fn remove_extras(innings: &mut InningsData, extra: Option<ExtraType>, amount: u32) {
    if let Some(bucket) = extras_bucket(innings, extra) {
        *bucket = bucket.saturating_sub(amount);
        innings.extras = innings.extras.saturating_sub(amount);
    }
}

impl MatchState {
    /// Apply one ball to the active innings.
    pub fn score_ball(&mut self, input: DeliveryInput) -> Result<DeliveryOutcome> {
        let crease = self.validate_delivery(&input)?;

        let split = RunSplit::for_input(&input, self.rules.wide_penalty, self.rules.no_ball_penalty);
        let target = self.target_score;
        let batting_side = self.batting_side();
        let max_wickets = batting_side.map_or(1, |side| self.max_wickets(side));
        let timestamp = chrono::Utc::now().timestamp_millis();

        let Some(active) = self.active_mut() else {
            return Err(ScoringError::not_ready("innings not initialized"));
        };
        let inning = active.inning;
        let innings = active.innings;
        let batting = active.batting;
        let bowling = active.bowling;

        if innings.ball_in_current_over as u32 >= BALLS_PER_OVER {
            warn!(
                ball = innings.ball_in_current_over,
                "ball count out of range, clamping to 5"
            );
            innings.ball_in_current_over = (BALLS_PER_OVER - 1) as u8;
        }

        let legal = input.is_legal();
        let mut effects = DeliveryEffects {
            previous_last_over_bowler_id: innings.last_over_bowler_id.clone(),
            previous_ready_for_innings2: innings.ready_for_innings2,
            previous_all_out: innings.is_all_out,
            ..Default::default()
        };
        let over = innings.completed_overs;

        // Extras
        add_extras(innings, input.extra_type, split.extras);

        // Batsman
        if let Some(striker) = batting.player_mut(&crease.striker) {
            let stats = &mut striker.batting;
            if credits_batsman_runs(input.extra_type) {
                stats.runs += split.batsman;
                match split.batsman {
                    4 => stats.fours += 1,
                    6 => stats.sixes += 1,
                    _ => {}
                }
            }
            if counts_ball_faced(input.extra_type) {
                stats.balls += 1;
            }
            stats.recompute_strike_rate();
        }

        // Bowler
        if let Some(bowler) = bowling.player_mut(&crease.bowler) {
            let stats = &mut bowler.bowling;
            stats.runs_conceded += split.bowler;
            if legal {
                stats.balls_this_over += 1;
                if stats.balls_this_over >= BALLS_PER_OVER {
                    stats.overs += 1;
                    stats.balls_this_over = 0;
                    effects.bowler_over_completed = true;
                    innings.last_over_bowler_id = Some(crease.bowler.clone());
                }
            }
            stats.recompute_economy();
        }

        // Team total and partnership
        innings.total_runs += split.total;
        if innings.active_partnership().is_none() {
            innings.partnerships.push(PartnershipRecord::open(
                crease.striker.clone(),
                crease.non_striker.clone(),
            ));
            effects.opened_partnership = true;
        }
        if let Some(partnership) = innings.partnerships.last_mut() {
            partnership.runs += split.total;
            if legal {
                partnership.balls += 1;
            }
        }

        // Ball and over counters
        if legal {
            innings.ball_in_current_over += 1;
            if innings.ball_in_current_over as u32 >= BALLS_PER_OVER {
                innings.ball_in_current_over = 0;
                innings.completed_overs += 1;
                effects.over_completed = true;
            }
        }
        let ball = if effects.over_completed {
            BALLS_PER_OVER as u8
        } else {
            innings.ball_in_current_over
        };

        // The winning ball still counts toward the over so the legal-ball
        // count matches the ledger; only rotation and wickets are skipped.
        let chase_won =
            inning == 2 && target.is_some_and(|target| innings.total_runs >= target);

        if !chase_won {
            if effects.over_completed {
                innings.last_over_bowler_id = Some(crease.bowler.clone());
                innings.current_bowler_id = None;
                if is_maiden(innings, over, &crease.bowler, split.bowler, legal) {
                    if let Some(bowler) = bowling.player_mut(&crease.bowler) {
                        bowler.bowling.maidens += 1;
                    }
                    effects.maiden = true;
                }
            }

            // An odd run already changes ends, so it replaces the end-of-over swap.
            if input.rotates_strike() || effects.over_completed {
                innings.swap_strike();
                effects.strike_rotated = true;
            }

            if input.wicket {
                if let Some(out_id) = crease.out_batsman.as_deref() {
                    innings.wickets += 1;
                    if let Some(out) = batting.player_mut(out_id) {
                        out.batting.is_out = true;
                    }
                    if input.wicket_type.map_or(true, |w| w.credits_bowler()) {
                        if let Some(bowler) = bowling.player_mut(&crease.bowler) {
                            bowler.bowling.wickets += 1;
                        }
                    }
                    if let Some(fielder_id) = input.fielder_id.as_deref() {
                        credit_fielder(bowling.player_mut(fielder_id), input.wicket_type, 1);
                    }
                    if let Some(partnership) = innings.partnerships.last_mut() {
                        partnership.is_active = false;
                        effects.closed_partnership = true;
                    }
                    innings.vacate(out_id);
                    effects.wicket_applied = true;
                }
            }
        }

        debug!(
            inning,
            over,
            ball,
            runs = input.runs,
            extra = ?input.extra_type,
            wicket = input.wicket,
            total = innings.total_runs,
            "delivery applied"
        );

        innings.deliveries.push(DeliveryEvent {
            runs: input.runs,
            batsman_runs: split.batsman,
            total_runs: split.total,
            bowler_runs: split.bowler,
            extra_type: input.extra_type,
            wicket: input.wicket,
            wicket_type: input.wicket_type,
            out_batsman_id: crease.out_batsman.clone(),
            fielder_id: input.fielder_id.clone(),
            bowler_id: crease.bowler.clone(),
            batsman_id: crease.striker.clone(),
            non_striker_id: crease.non_striker.clone(),
            over,
            ball,
            timestamp,
            effects: effects.clone(),
        });

        let status = if chase_won {
            if let Some(side) = batting_side {
                let remaining = max_wickets.saturating_sub(self.active_innings().wickets);
                self.finish_match(MatchOutcome::Won { side, margin: Margin::Wickets(remaining) });
            }
            self.completion_status()
        } else {
            self.check_innings_completion()
        };
        if self.match_over {
            if let Some(last) = self.active_innings_mut().deliveries.last_mut() {
                last.effects.ended_match = true;
            }
        }

        Ok(DeliveryOutcome {
            over_completed: effects.over_completed,
            wicket_fell: effects.wicket_applied,
            strike_rotated: effects.strike_rotated,
            status,
        })
    }

    /// Whether `score_ball` would accept a ball right now.
    pub fn can_score(&self) -> bool {
        self.validate_delivery(&DeliveryInput::dot()).is_ok()
    }

    fn validate_delivery(&self, input: &DeliveryInput) -> Result<Crease> {
        if self.match_over {
            return Err(ScoringError::MatchOver);
        }
        if input.runs > MAX_RUNS_PER_BALL {
            return Err(ScoringError::InvalidDelivery(format!(
                "{} runs off one ball (max {MAX_RUNS_PER_BALL})",
                input.runs
            )));
        }
        let innings = self.active_innings();
        let (Some(batting), Some(bowling)) = (innings.batting_side, innings.bowling_side) else {
            return Err(ScoringError::not_ready("innings not initialized"));
        };
        if self.current_inning == 1 && (innings.ready_for_innings2 || innings.is_completed) {
            return Err(ScoringError::InningsAwaitingTransition);
        }
        if innings.is_completed {
            return Err(ScoringError::MatchOver);
        }

        let striker = innings
            .current_striker_id
            .clone()
            .ok_or_else(|| ScoringError::not_ready("striker not set"))?;
        let non_striker = innings
            .current_non_striker_id
            .clone()
            .ok_or_else(|| ScoringError::not_ready("non-striker not set"))?;
        let bowler = innings
            .current_bowler_id
            .clone()
            .ok_or_else(|| ScoringError::not_ready("bowler not set"))?;

        for id in [&striker, &non_striker] {
            if !self.team(batting).has_player(id) {
                return Err(ScoringError::UnknownPlayer { player_id: id.clone() });
            }
        }
        if !self.team(bowling).has_player(&bowler) {
            return Err(ScoringError::UnknownPlayer { player_id: bowler });
        }

        let out_batsman = if input.wicket {
            let out = input.out_batsman_id.clone().unwrap_or_else(|| striker.clone());
            if out != striker && out != non_striker {
                return Err(ScoringError::InvalidDismissal { player_id: out });
            }
            if let Some(fielder) = input.fielder_id.as_deref() {
                if !self.team(bowling).has_player(fielder) {
                    return Err(ScoringError::UnknownPlayer { player_id: fielder.to_string() });
                }
            }
            Some(out)
        } else {
            None
        };

        Ok(Crease { striker, non_striker, bowler, out_batsman })
    }
}

/// Catches and run outs are the only fielding credits tracked.
pub(crate) fn credit_fielder(
    fielder: Option<&mut crate::models::Cricketer>,
    wicket_type: Option<crate::models::WicketType>,
    delta: i32,
) {
    use crate::models::WicketType;

    let Some(fielder) = fielder else { return };
    let counter = match wicket_type {
        Some(WicketType::Caught) => &mut fielder.fielding.catches,
        Some(WicketType::RunOut) => &mut fielder.fielding.runouts,
        _ => return,
    };
    *counter = counter.saturating_add_signed(delta);
}

/// A completed over is a maiden when one bowler bowled all of it, every
/// ball was fair and nothing was charged to them.
fn is_maiden(
    innings: &InningsData,
    over: u32,
    bowler: &str,
    current_bowler_runs: u32,
    current_legal: bool,
) -> bool {
    if current_bowler_runs > 0 || !current_legal {
        return false;
    }
    innings
        .deliveries
        .iter()
        .filter(|d| d.over == over)
        .all(|d| d.bowler_id == bowler && d.is_legal() && d.bowler_runs == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cricketer, TeamSide, WicketType};

    fn live_state() -> MatchState {
        let mut state = MatchState::new();
        state.set_team_name(TeamSide::Home, "Lions").unwrap();
        state.set_team_name(TeamSide::Away, "Tigers").unwrap();
        state.initialize_innings(TeamSide::Home, TeamSide::Away).unwrap();
        for i in 1..=11 {
            state
                .add_player(TeamSide::Home, Cricketer::new(format!("h{i}"), format!("Home {i}")))
                .unwrap();
            state
                .add_player(TeamSide::Away, Cricketer::new(format!("a{i}"), format!("Away {i}")))
                .unwrap();
        }
        state.set_current_striker("h1", None).unwrap();
        state.set_current_non_striker("h2", None).unwrap();
        state.set_bowler("a1", None).unwrap();
        state
    }

    #[test]
    fn test_run_split() {
        let wide = RunSplit::for_input(&DeliveryInput::wide(2), 1, 1);
        assert_eq!(wide, RunSplit { total: 3, batsman: 0, bowler: 2, extras: 3 });

        let nb = RunSplit::for_input(&DeliveryInput::no_ball(4), 1, 1);
        assert_eq!(nb, RunSplit { total: 5, batsman: 4, bowler: 5, extras: 1 });

        let lb = RunSplit::for_input(&DeliveryInput::leg_bye(3), 1, 1);
        assert_eq!(lb, RunSplit { total: 3, batsman: 0, bowler: 0, extras: 3 });
    }

    #[test]
    fn test_dot_ball() {
        let mut state = live_state();
        state.score_ball(DeliveryInput::dot()).unwrap();

        let striker = state.home.player("h1").unwrap();
        assert_eq!(striker.batting.balls, 1);
        assert_eq!(striker.batting.runs, 0);
        assert_eq!(striker.batting.strike_rate, 0.0);
        assert_eq!(state.innings1.ball_in_current_over, 1);
        assert_eq!(state.innings1.deliveries.len(), 1);
    }

    #[test]
    fn test_four_keeps_strike() {
        let mut state = live_state();
        let outcome = state.score_ball(DeliveryInput::runs(4)).unwrap();

        let striker = state.home.player("h1").unwrap();
        assert_eq!(striker.batting.fours, 1);
        assert_eq!(striker.batting.runs, 4);
        assert!(!outcome.strike_rotated);
        assert_eq!(state.innings1.current_striker_id.as_deref(), Some("h1"));
        assert_eq!(state.away.player("a1").unwrap().bowling.runs_conceded, 4);
    }

    #[test]
    fn test_wide_accounting() {
        let mut state = live_state();
        state.score_ball(DeliveryInput::wide(2)).unwrap();

        assert_eq!(state.innings1.extras, 3);
        assert_eq!(state.innings1.extras_breakdown.wides, 3);
        assert_eq!(state.innings1.total_runs, 3);
        assert_eq!(state.innings1.ball_in_current_over, 0);
        let striker = state.home.player("h1").unwrap();
        assert_eq!(striker.batting.runs, 0);
        assert_eq!(striker.batting.balls, 0);
        let bowler = state.away.player("a1").unwrap();
        assert_eq!(bowler.bowling.runs_conceded, 2);
        assert_eq!(bowler.bowling.balls_this_over, 0);
        // two runs run on a wide: even, no swap
        assert_eq!(state.innings1.current_striker_id.as_deref(), Some("h1"));
    }

    #[test]
    fn test_no_ball_credits_batsman_not_ball_count() {
        let mut state = live_state();
        state.score_ball(DeliveryInput::no_ball(1)).unwrap();

        let batsman = state.home.player("h1").unwrap();
        assert_eq!(batsman.batting.runs, 1);
        assert_eq!(batsman.batting.balls, 0);
        assert_eq!(state.innings1.extras, 1);
        assert_eq!(state.innings1.total_runs, 2);
        assert_eq!(state.away.player("a1").unwrap().bowling.runs_conceded, 2);
        assert_eq!(state.innings1.current_striker_id.as_deref(), Some("h2"));
    }

    #[test]
    fn test_bye_counts_ball_not_runs() {
        let mut state = live_state();
        state.score_ball(DeliveryInput::bye(2)).unwrap();

        let batsman = state.home.player("h1").unwrap();
        assert_eq!(batsman.batting.runs, 0);
        assert_eq!(batsman.batting.balls, 1);
        assert_eq!(state.innings1.extras_breakdown.byes, 2);
        assert_eq!(state.innings1.ball_in_current_over, 1);
        let bowler = state.away.player("a1").unwrap();
        assert_eq!(bowler.bowling.runs_conceded, 0);
        assert_eq!(bowler.bowling.balls_this_over, 1);
    }

    #[test]
    fn test_wicket_credits_bowler_and_vacates() {
        let mut state = live_state();
        let outcome = state
            .score_ball(DeliveryInput::dot().with_wicket(WicketType::Bowled, Some("h1".into())))
            .unwrap();

        assert!(outcome.wicket_fell);
        assert_eq!(state.innings1.wickets, 1);
        assert!(state.home.player("h1").unwrap().batting.is_out);
        assert_eq!(state.away.player("a1").unwrap().bowling.wickets, 1);
        assert!(state.innings1.current_striker_id.is_none());
        assert!(!state.innings1.partnerships[0].is_active);
        assert!(matches!(state.score_ball(DeliveryInput::dot()), Err(ScoringError::NotReady { .. })));
    }

    #[test]
    fn test_run_out_credits_fielder_not_bowler() {
        let mut state = live_state();
        state
            .score_ball(
                DeliveryInput::runs(1)
                    .with_wicket(WicketType::RunOut, Some("h2".into()))
                    .with_fielder("a5"),
            )
            .unwrap();

        assert_eq!(state.away.player("a1").unwrap().bowling.wickets, 0);
        assert_eq!(state.away.player("a5").unwrap().fielding.runouts, 1);
        assert!(state.home.player("h2").unwrap().batting.is_out);
        // one run swapped ends, then h2's slot was vacated
        assert_eq!(state.innings1.current_non_striker_id.as_deref(), Some("h1"));
        assert!(state.innings1.current_striker_id.is_none());
    }

    #[test]
    fn test_dismissal_must_be_at_crease() {
        let mut state = live_state();
        let before = state.clone();
        let err = state
            .score_ball(DeliveryInput::dot().with_wicket(WicketType::Caught, Some("h7".into())))
            .unwrap_err();
        assert_eq!(err, ScoringError::InvalidDismissal { player_id: "h7".into() });
        assert_eq!(state, before);
    }

    #[test]
    fn test_over_completion_clears_bowler_and_rotates() {
        let mut state = live_state();
        for _ in 0..5 {
            state.score_ball(DeliveryInput::dot()).unwrap();
        }
        let outcome = state.score_ball(DeliveryInput::dot()).unwrap();

        assert!(outcome.over_completed);
        assert_eq!(state.innings1.completed_overs, 1);
        assert_eq!(state.innings1.ball_in_current_over, 0);
        assert_eq!(state.innings1.last_over_bowler_id.as_deref(), Some("a1"));
        assert!(state.innings1.current_bowler_id.is_none());
        assert_eq!(state.innings1.current_striker_id.as_deref(), Some("h2"));

        let bowler = state.away.player("a1").unwrap();
        assert_eq!(bowler.bowling.overs, 1);
        assert_eq!(bowler.bowling.maidens, 1);
        assert!(state.set_bowler("a1", None).is_err());
    }

    #[test]
    fn test_odd_run_on_last_ball_swaps_once() {
        let mut state = live_state();
        for _ in 0..5 {
            state.score_ball(DeliveryInput::dot()).unwrap();
        }
        state.score_ball(DeliveryInput::runs(1)).unwrap();
        assert_eq!(state.innings1.current_striker_id.as_deref(), Some("h2"));
        assert_eq!(state.away.player("a1").unwrap().bowling.maidens, 0);
    }

    #[test]
    fn test_rejected_when_match_over() {
        let mut state = live_state();
        state.match_over = true;
        assert_eq!(state.score_ball(DeliveryInput::dot()), Err(ScoringError::MatchOver));
        assert!(!state.can_score());
    }

    #[test]
    fn test_rejects_runs_above_ceiling() {
        let mut state = live_state();
        state.score_ball(DeliveryInput::runs(2)).unwrap();
        let before = state.clone();

        for input in [
            DeliveryInput::no_ball(u32::MAX),
            DeliveryInput::wide(u32::MAX),
            DeliveryInput::runs(MAX_RUNS_PER_BALL + 1),
        ] {
            assert!(matches!(state.score_ball(input), Err(ScoringError::InvalidDelivery(_))));
            assert_eq!(state, before);
        }

        state.score_ball(DeliveryInput::runs(MAX_RUNS_PER_BALL)).unwrap();
        assert_eq!(state.innings1.total_runs, 2 + MAX_RUNS_PER_BALL);
    }

    #[test]
    fn test_run_split_saturates_on_large_penalty() {
        let split = RunSplit::for_input(&DeliveryInput::wide(3), u32::MAX, 1);
        assert_eq!(split.total, u32::MAX);
        assert_eq!(split.bowler, 3);
    }

    #[test]
    fn test_clamps_corrupted_ball_count() {
        let mut state = live_state();
        state.innings1.ball_in_current_over = 9;
        let outcome = state.score_ball(DeliveryInput::dot()).unwrap();
        assert!(outcome.over_completed);
        assert_eq!(state.innings1.ball_in_current_over, 0);
        assert_eq!(state.innings1.completed_overs, 1);
    }
}
