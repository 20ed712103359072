//! Match Setup: team names, toss and format, before the first ball.

use tracing::info;

use crate::error::{Result, ScoringError};
use crate::models::{Cricketer, MatchState, TeamSide, TossChoice};

/// Batting side for innings 1 given the toss.
pub fn batting_first(toss_winner: TeamSide, choice: TossChoice) -> TeamSide {
    match choice {
        TossChoice::Bat => toss_winner,
        TossChoice::Bowl => toss_winner.opponent(),
    }
}

impl MatchState {
    pub fn set_team_name(&mut self, side: TeamSide, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ScoringError::InvalidSetup("team name must not be empty".into()));
        }
        self.team_mut(side).name = name.to_string();
        Ok(())
    }

    pub fn set_toss_winner(&mut self, side: TeamSide) {
        self.toss_winner = Some(side);
    }

    pub fn set_toss_choice(&mut self, choice: TossChoice) {
        self.toss_choice = Some(choice);
    }

    pub fn set_total_overs(&mut self, overs: u32) -> Result<()> {
        if overs == 0 {
            return Err(ScoringError::InvalidSetup("total overs must be positive".into()));
        }
        self.total_overs = overs;
        Ok(())
    }

    pub fn set_players_per_team(&mut self, players: u32) -> Result<()> {
        if players < 2 {
            return Err(ScoringError::InvalidSetup(format!(
                "a side needs at least 2 players, got {players}"
            )));
        }
        self.total_players_per_team = players;
        Ok(())
    }

    /// Add a player to a roster. Player ids are unique across both teams.
    pub fn add_player(&mut self, side: TeamSide, player: Cricketer) -> Result<()> {
        if self.home.has_player(&player.id) || self.away.has_player(&player.id) {
            return Err(ScoringError::InvalidSelection(format!(
                "player id {} is already on a roster",
                player.id
            )));
        }
        self.team_mut(side).add_player(player);
        Ok(())
    }

    /// Check everything `begin_match` needs.
    pub fn validate_setup(&self) -> Result<()> {
        if self.home.name.trim().is_empty() || self.away.name.trim().is_empty() {
            return Err(ScoringError::InvalidSetup("both teams need a name".into()));
        }
        if self.toss_winner.is_none() {
            return Err(ScoringError::InvalidSetup("toss winner not set".into()));
        }
        if self.toss_choice.is_none() {
            return Err(ScoringError::InvalidSetup("toss choice not set".into()));
        }
        if self.total_overs == 0 {
            return Err(ScoringError::InvalidSetup("total overs must be positive".into()));
        }
        Ok(())
    }

    /// `(batting, bowling)` for innings 1, once the toss is recorded.
    pub fn initial_sides(&self) -> Option<(TeamSide, TeamSide)> {
        let batting = batting_first(self.toss_winner?, self.toss_choice?);
        Some((batting, batting.opponent()))
    }

    /// Validate setup and open innings 1 with the sides the toss decided.
    pub fn begin_match(&mut self) -> Result<()> {
        self.validate_setup()?;
        let (batting, bowling) = self
            .initial_sides()
            .ok_or_else(|| ScoringError::InvalidSetup("toss not recorded".into()))?;
        if self.innings1.is_initialized() {
            return Err(ScoringError::InvalidTransition("match already started".into()));
        }
        info!(
            match_id = %self.match_id,
            batting = %self.team(batting).name,
            overs = self.total_overs,
            "match started"
        );
        self.initialize_innings(batting, bowling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named_state() -> MatchState {
        let mut state = MatchState::new();
        state.set_team_name(TeamSide::Home, "Lions").unwrap();
        state.set_team_name(TeamSide::Away, "Tigers").unwrap();
        state
    }

    #[test]
    fn test_batting_first_follows_toss() {
        assert_eq!(batting_first(TeamSide::Home, TossChoice::Bat), TeamSide::Home);
        assert_eq!(batting_first(TeamSide::Home, TossChoice::Bowl), TeamSide::Away);
        assert_eq!(batting_first(TeamSide::Away, TossChoice::Bowl), TeamSide::Home);
    }

    #[test]
    fn test_setup_rejects_bad_values() {
        let mut state = MatchState::new();
        assert!(matches!(
            state.set_team_name(TeamSide::Home, "   "),
            Err(ScoringError::InvalidSetup(_))
        ));
        assert!(state.set_total_overs(0).is_err());
        assert!(state.set_players_per_team(1).is_err());
        assert_eq!(state.total_overs, 20);
    }

    #[test]
    fn test_begin_match_requires_toss() {
        let mut state = named_state();
        assert!(state.begin_match().is_err());
        assert!(!state.innings1.is_initialized());

        state.set_toss_winner(TeamSide::Away);
        state.set_toss_choice(TossChoice::Bowl);
        state.begin_match().unwrap();

        assert_eq!(state.innings1.batting_side, Some(TeamSide::Home));
        assert_eq!(state.innings1.bowling_side, Some(TeamSide::Away));
        assert!(state.home.is_batting);
        assert!(state.away.is_bowling);
        assert!(state.begin_match().is_err());
    }

    #[test]
    fn test_player_ids_unique_across_teams() {
        let mut state = named_state();
        state.add_player(TeamSide::Home, Cricketer::new("p1", "Asha")).unwrap();
        let err = state.add_player(TeamSide::Away, Cricketer::new("p1", "Bina")).unwrap_err();
        assert!(matches!(err, ScoringError::InvalidSelection(_)));
        assert!(state.away.players.is_empty());
    }
}
