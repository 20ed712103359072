//! Undo Engine: exact inverse of the most recent delivery.
//!
//! Every counter the Delivery Processor moved is moved back using the
//! recorded `DeliveryEvent`, so `score_ball` followed by `undo_last_ball`
//! restores the previous state exactly. Repeated calls walk back through
//! the active innings' ledger.

use tracing::{debug, warn};

use super::delivery::{counts_ball_faced, credit_fielder, credits_batsman_runs, remove_extras};
use crate::models::{DeliveryEvent, MatchState, BALLS_PER_OVER};

impl MatchState {
    /// Reverse the last ball of the active innings.
    ///
    /// Returns the removed event, or `None` when the ledger is empty.
    pub fn undo_last_ball(&mut self) -> Option<DeliveryEvent> {
        let ended_match = self.active_innings().deliveries.last()?.effects.ended_match;
        if ended_match {
            self.match_over = false;
            self.match_result = None;
            self.outcome = None;
        }

        let active = self.active_mut()?;
        let innings = active.innings;
        let batting = active.batting;
        let bowling = active.bowling;
        let event = innings.deliveries.pop()?;
        let effects = &event.effects;
        let legal = event.is_legal();

        if ended_match {
            innings.is_completed = false;
        }
        innings.ready_for_innings2 = effects.previous_ready_for_innings2;
        innings.is_all_out = effects.previous_all_out;

        // Wicket
        if effects.wicket_applied {
            innings.wickets = innings.wickets.saturating_sub(1);
            if let Some(out_id) = event.out_batsman_id.as_deref() {
                if let Some(out) = batting.player_mut(out_id) {
                    out.batting.is_out = false;
                }
            }
            if event.wicket_type.map_or(true, |w| w.credits_bowler()) {
                if let Some(bowler) = bowling.player_mut(&event.bowler_id) {
                    bowler.bowling.wickets = bowler.bowling.wickets.saturating_sub(1);
                }
            }
            if let Some(fielder_id) = event.fielder_id.as_deref() {
                credit_fielder(bowling.player_mut(fielder_id), event.wicket_type, -1);
            }
        }

        // Crease and bowler pointers as they were before the ball; this also
        // reverses any strike rotation.
        innings.current_striker_id = Some(event.batsman_id.clone());
        innings.current_non_striker_id = Some(event.non_striker_id.clone());
        innings.current_bowler_id = Some(event.bowler_id.clone());
        innings.last_over_bowler_id = effects.previous_last_over_bowler_id.clone();

        // Ball and over counters
        if effects.over_completed {
            innings.completed_overs = innings.completed_overs.saturating_sub(1);
            innings.ball_in_current_over = (BALLS_PER_OVER - 1) as u8;
        } else if legal {
            innings.ball_in_current_over = innings.ball_in_current_over.saturating_sub(1);
        }
        if effects.maiden {
            if let Some(bowler) = bowling.player_mut(&event.bowler_id) {
                bowler.bowling.maidens = bowler.bowling.maidens.saturating_sub(1);
            }
        }

        // Partnership
        if effects.opened_partnership {
            innings.partnerships.pop();
        } else if let Some(partnership) = innings.partnerships.last_mut() {
            partnership.runs = partnership.runs.saturating_sub(event.total_runs);
            if legal {
                partnership.balls = partnership.balls.saturating_sub(1);
            }
            if effects.closed_partnership {
                partnership.is_active = true;
            }
        }

        // Team total and extras
        innings.total_runs = innings.total_runs.saturating_sub(event.total_runs);
        let extras = event.total_runs - event.batsman_runs.min(event.total_runs);
        remove_extras(innings, event.extra_type, extras);

        // Bowler
        match bowling.player_mut(&event.bowler_id) {
            Some(bowler) => {
                let stats = &mut bowler.bowling;
                stats.runs_conceded = stats.runs_conceded.saturating_sub(event.bowler_runs);
                if effects.bowler_over_completed {
                    stats.overs = stats.overs.saturating_sub(1);
                    stats.balls_this_over = BALLS_PER_OVER - 1;
                } else if legal {
                    stats.balls_this_over = stats.balls_this_over.saturating_sub(1);
                }
                stats.recompute_economy();
            }
            None => warn!(bowler = %event.bowler_id, "undo: bowler missing from roster"),
        }

        // Batsman
        match batting.player_mut(&event.batsman_id) {
            Some(striker) => {
                let stats = &mut striker.batting;
                if credits_batsman_runs(event.extra_type) {
                    stats.runs = stats.runs.saturating_sub(event.batsman_runs);
                    match event.batsman_runs {
                        4 => stats.fours = stats.fours.saturating_sub(1),
                        6 => stats.sixes = stats.sixes.saturating_sub(1),
                        _ => {}
                    }
                }
                if counts_ball_faced(event.extra_type) {
                    stats.balls = stats.balls.saturating_sub(1);
                }
                stats.recompute_strike_rate();
            }
            None => warn!(batsman = %event.batsman_id, "undo: batsman missing from roster"),
        }

        debug!(
            over = event.over,
            ball = event.ball,
            runs = event.runs,
            total = innings.total_runs,
            "delivery undone"
        );
        Some(event)
    }
}
