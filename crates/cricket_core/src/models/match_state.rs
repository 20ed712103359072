use serde::{Deserialize, Serialize};

use super::{Cricketer, InningsData, MatchRules, Team, TeamSide};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TossChoice {
    Bat,
    Bowl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum Margin {
    Runs(u32),
    Wickets(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "result")]
pub enum MatchOutcome {
    Won { side: TeamSide, margin: Margin },
    Tied,
}

/// Root aggregate for one match. The caller owns exactly one instance and
/// mutates it only through the scoring commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub match_id: String,
    #[serde(alias = "teamA")]
    pub home: Team,
    #[serde(alias = "teamB")]
    pub away: Team,
    pub toss_winner: Option<TeamSide>,
    pub toss_choice: Option<TossChoice>,
    pub total_overs: u32,
    pub total_players_per_team: u32,
    #[serde(default)]
    pub rules: MatchRules,
    /// 1 or 2
    pub current_inning: u8,
    pub target_score: Option<u32>,
    pub innings1: InningsData,
    pub innings2: InningsData,
    pub match_over: bool,
    pub match_result: Option<String>,
    #[serde(default)]
    pub outcome: Option<MatchOutcome>,
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}

/// Split mutable view over the active innings and both teams.
pub(crate) struct ActiveMut<'a> {
    pub inning: u8,
    pub innings: &'a mut InningsData,
    pub batting: &'a mut Team,
    pub bowling: &'a mut Team,
}

impl MatchState {
    pub fn new() -> Self {
        Self::with_rules(MatchRules::default())
    }

    pub fn with_rules(rules: MatchRules) -> Self {
        Self {
            match_id: uuid::Uuid::new_v4().to_string(),
            home: Team::new(uuid::Uuid::new_v4().to_string(), ""),
            away: Team::new(uuid::Uuid::new_v4().to_string(), ""),
            toss_winner: None,
            toss_choice: None,
            total_overs: rules.overs,
            total_players_per_team: rules.players_per_team,
            rules,
            current_inning: 1,
            target_score: None,
            innings1: InningsData::default(),
            innings2: InningsData::default(),
            match_over: false,
            match_result: None,
            outcome: None,
        }
    }

    pub fn team(&self, side: TeamSide) -> &Team {
        match side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        }
    }

    pub fn team_mut(&mut self, side: TeamSide) -> &mut Team {
        match side {
            TeamSide::Home => &mut self.home,
            TeamSide::Away => &mut self.away,
        }
    }

    pub fn innings(&self, inning: u8) -> &InningsData {
        if inning == 2 {
            &self.innings2
        } else {
            &self.innings1
        }
    }

    pub fn active_innings(&self) -> &InningsData {
        self.innings(self.current_inning)
    }

    pub(crate) fn active_innings_mut(&mut self) -> &mut InningsData {
        if self.current_inning == 2 {
            &mut self.innings2
        } else {
            &mut self.innings1
        }
    }

    pub fn batting_side(&self) -> Option<TeamSide> {
        self.active_innings().batting_side
    }

    pub fn bowling_side(&self) -> Option<TeamSide> {
        self.active_innings().bowling_side
    }

    pub fn batting_team(&self) -> Option<&Team> {
        self.batting_side().map(|side| self.team(side))
    }

    pub fn bowling_team(&self) -> Option<&Team> {
        self.bowling_side().map(|side| self.team(side))
    }

    pub fn striker(&self) -> Option<&Cricketer> {
        let id = self.active_innings().current_striker_id.as_deref()?;
        self.batting_team()?.player(id)
    }

    pub fn non_striker(&self) -> Option<&Cricketer> {
        let id = self.active_innings().current_non_striker_id.as_deref()?;
        self.batting_team()?.player(id)
    }

    pub fn current_bowler(&self) -> Option<&Cricketer> {
        let id = self.active_innings().current_bowler_id.as_deref()?;
        self.bowling_team()?.player(id)
    }

    /// Wickets the batting side can lose: one fewer than its active
    /// (non-retired) players, never below one.
    pub fn max_wickets(&self, batting_side: TeamSide) -> u32 {
        let active = self
            .total_players_per_team
            .saturating_sub(self.team(batting_side).retired_count());
        active.saturating_sub(1).max(1)
    }

    pub(crate) fn active_mut(&mut self) -> Option<ActiveMut<'_>> {
        let inning = self.current_inning;
        let innings = if inning == 2 { &mut self.innings2 } else { &mut self.innings1 };
        let batting_side = innings.batting_side?;
        let (batting, bowling) = match batting_side {
            TeamSide::Home => (&mut self.home, &mut self.away),
            TeamSide::Away => (&mut self.away, &mut self.home),
        };
        Some(ActiveMut { inning, innings, batting, bowling })
    }
}
