//! Crease and bowler selection.
//!
//! An unknown player id is rejected unless a display name is supplied, in
//! which case the player is added to the right roster first.

use tracing::{debug, warn};

use crate::error::{Result, ScoringError};
use crate::models::{Cricketer, MatchState, PlayerId, TeamSide};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CreaseEnd {
    Striker,
    NonStriker,
}

impl MatchState {
    pub fn set_current_striker(&mut self, player_id: &str, name: Option<&str>) -> Result<()> {
        self.select_batsman(CreaseEnd::Striker, player_id, name)
    }

    pub fn set_current_non_striker(&mut self, player_id: &str, name: Option<&str>) -> Result<()> {
        self.select_batsman(CreaseEnd::NonStriker, player_id, name)
    }

    /// Rejected if the bowler bowled the previous over or has used up
    /// their overs allowance.
    pub fn set_bowler(&mut self, player_id: &str, name: Option<&str>) -> Result<()> {
        let bowling = self.selectable_side(false)?;
        let innings = self.active_innings();

        if innings.last_over_bowler_id.as_deref() == Some(player_id) {
            warn!(bowler = player_id, "rejected consecutive over");
            return Err(ScoringError::BowlerIneligible {
                bowler_id: player_id.to_string(),
                reason: "bowled the previous over".into(),
            });
        }
        if let (Some(max), Some(bowler)) =
            (self.rules.max_overs_per_bowler, self.team(bowling).player(player_id))
        {
            if bowler.bowling.overs >= max {
                warn!(bowler = player_id, overs = bowler.bowling.overs, max, "rejected over quota");
                return Err(ScoringError::BowlerIneligible {
                    bowler_id: player_id.to_string(),
                    reason: format!("already bowled the maximum of {max} overs"),
                });
            }
        }

        self.ensure_player(bowling, player_id, name)?;
        self.active_innings_mut().current_bowler_id = Some(player_id.to_string());
        debug!(bowler = player_id, "bowler set");
        Ok(())
    }

    /// Manual striker/non-striker swap, e.g. to correct a run-out call.
    pub fn swap_batsmen(&mut self) -> Result<()> {
        self.selectable_side(true)?;
        self.active_innings_mut().swap_strike();
        Ok(())
    }

    /// Retire a batsman at the crease. Not a wicket; the player leaves the
    /// active roster and the crease slot is vacated.
    pub fn retire_batsman(&mut self, player_id: &str) -> Result<()> {
        let batting = self.selectable_side(true)?;
        if !self.active_innings().is_at_crease(player_id) {
            return Err(ScoringError::InvalidDismissal { player_id: player_id.to_string() });
        }
        let player = self
            .team_mut(batting)
            .player_mut(player_id)
            .ok_or_else(|| ScoringError::UnknownPlayer { player_id: player_id.to_string() })?;
        player.batting.is_retired = true;
        self.active_innings_mut().vacate(player_id);
        debug!(batsman = player_id, "batsman retired");
        Ok(())
    }

    fn select_batsman(&mut self, end: CreaseEnd, player_id: &str, name: Option<&str>) -> Result<()> {
        let batting = self.selectable_side(true)?;
        let innings = self.active_innings();
        let other = match end {
            CreaseEnd::Striker => innings.current_non_striker_id.as_deref(),
            CreaseEnd::NonStriker => innings.current_striker_id.as_deref(),
        };
        if other == Some(player_id) {
            return Err(ScoringError::InvalidSelection(format!(
                "{player_id} is already at the other end"
            )));
        }
        if let Some(player) = self.team(batting).player(player_id) {
            if !player.can_bat() {
                return Err(ScoringError::InvalidSelection(format!(
                    "{player_id} is out or retired"
                )));
            }
        }

        self.ensure_player(batting, player_id, name)?;
        let slot = match end {
            CreaseEnd::Striker => &mut self.active_innings_mut().current_striker_id,
            CreaseEnd::NonStriker => &mut self.active_innings_mut().current_non_striker_id,
        };
        *slot = Some(PlayerId::from(player_id));
        debug!(batsman = player_id, ?end, "batsman set");
        Ok(())
    }

    /// Side for a batting (`true`) or bowling selection in the active innings.
    fn selectable_side(&self, batting: bool) -> Result<TeamSide> {
        if self.match_over {
            return Err(ScoringError::MatchOver);
        }
        let innings = self.active_innings();
        let side = if batting { innings.batting_side } else { innings.bowling_side };
        side.ok_or_else(|| ScoringError::not_ready("innings not initialized"))
    }

    fn ensure_player(&mut self, side: TeamSide, player_id: &str, name: Option<&str>) -> Result<()> {
        if self.team(side).has_player(player_id) {
            return Ok(());
        }
        match name {
            Some(name) => self.add_player(side, Cricketer::new(player_id, name)),
            None => Err(ScoringError::UnknownPlayer { player_id: player_id.to_string() }),
        }
    }
}
