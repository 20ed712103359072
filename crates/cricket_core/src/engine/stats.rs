//! Read-only projections of the match state for display.

use serde::{Deserialize, Serialize};

use crate::models::{
    Cricketer, ExtrasBreakdown, InningsData, MatchOutcome, MatchState, BALLS_PER_OVER,
};

/// Runs per over; 0 before the first legal ball.
pub fn run_rate(runs: u32, legal_balls: u32) -> f64 {
    if legal_balls == 0 {
        return 0.0;
    }
    runs as f64 / (legal_balls as f64 / BALLS_PER_OVER as f64)
}

/// Runs per over needed from the balls left. `None` once no balls remain.
pub fn required_run_rate(runs_required: u32, balls_remaining: u32) -> Option<f64> {
    if balls_remaining == 0 {
        return None;
    }
    Some(runs_required as f64 / (balls_remaining as f64 / BALLS_PER_OVER as f64))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatsmanLine {
    pub id: String,
    pub name: String,
    pub runs: u32,
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
    pub strike_rate: f64,
    pub on_strike: bool,
}

impl BatsmanLine {
    fn from_player(player: &Cricketer, on_strike: bool) -> Self {
        let b = &player.batting;
        Self {
            id: player.id.clone(),
            name: player.name.clone(),
            runs: b.runs,
            balls: b.balls,
            fours: b.fours,
            sixes: b.sixes,
            strike_rate: b.strike_rate,
            on_strike,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BowlerLine {
    pub id: String,
    pub name: String,
    pub overs: String,
    pub maidens: u32,
    pub runs: u32,
    pub wickets: u32,
    pub economy: f64,
}

impl BowlerLine {
    fn from_player(player: &Cricketer) -> Self {
        let b = &player.bowling;
        Self {
            id: player.id.clone(),
            name: player.name.clone(),
            overs: b.overs_display(),
            maidens: b.maidens,
            runs: b.runs_conceded,
            wickets: b.wickets,
            economy: b.economy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallOfWicket {
    pub wicket_number: u32,
    pub score: u32,
    pub player_id: String,
    pub player_name: String,
    /// e.g. `3.4`
    pub over: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnershipLine {
    pub player1: String,
    pub player2: String,
    pub runs: u32,
    pub balls: u32,
}

/// Everything a live score screen shows for the active innings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub inning: u8,
    pub batting_team: String,
    pub bowling_team: String,
    /// e.g. `124/3`
    pub score: String,
    pub runs: u32,
    pub wickets: u32,
    pub overs: String,
    pub run_rate: f64,
    pub target: Option<u32>,
    pub runs_required: Option<u32>,
    pub balls_remaining: Option<u32>,
    pub required_run_rate: Option<f64>,
    pub striker: Option<BatsmanLine>,
    pub non_striker: Option<BatsmanLine>,
    pub bowler: Option<BowlerLine>,
    pub this_over: Vec<String>,
    pub fall_of_wickets: Vec<FallOfWicket>,
    pub partnership: Option<PartnershipLine>,
    pub extras: u32,
    pub extras_breakdown: ExtrasBreakdown,
    pub match_over: bool,
    pub result: Option<String>,
    pub outcome: Option<MatchOutcome>,
}

/// Ball labels of the over in progress, or of the last completed over
/// between overs.
pub fn this_over(innings: &InningsData) -> Vec<String> {
    let current = innings.completed_overs;
    let over = if innings.ball_in_current_over == 0 && current > 0 {
        let started = innings.deliveries.iter().any(|d| d.over == current);
        if started {
            current
        } else {
            current - 1
        }
    } else {
        current
    };
    innings
        .deliveries
        .iter()
        .filter(|d| d.over == over)
        .map(|d| d.label())
        .collect()
}

pub fn fall_of_wickets(state: &MatchState, innings: &InningsData) -> Vec<FallOfWicket> {
    let batting = innings.batting_side.map(|side| state.team(side));
    let mut score = 0;
    let mut count = 0;
    let mut fow = Vec::new();
    for d in &innings.deliveries {
        score += d.total_runs;
        if !d.effects.wicket_applied {
            continue;
        }
        count += 1;
        let player_id = d.out_batsman_id.clone().unwrap_or_else(|| d.batsman_id.clone());
        let player_name = batting
            .and_then(|team| team.player(&player_id))
            .map(|p| p.name.clone())
            .unwrap_or_else(|| player_id.clone());
        fow.push(FallOfWicket {
            wicket_number: count,
            score,
            player_id,
            player_name,
            over: format!("{}.{}", d.over, d.ball),
        });
    }
    fow
}

impl MatchState {
    pub fn scoreboard(&self) -> Scoreboard {
        let innings = self.active_innings();
        let batting = self.batting_team();
        let bowling = self.bowling_team();
        let legal_balls = innings.legal_balls();

        let (target, runs_required, balls_remaining, rrr) = if self.current_inning == 2 {
            let remaining = (self.total_overs * BALLS_PER_OVER).saturating_sub(legal_balls);
            let required = self.runs_required();
            (
                self.target_score,
                required,
                Some(remaining),
                required.and_then(|r| required_run_rate(r, remaining)),
            )
        } else {
            (None, None, None, None)
        };

        let partnership = innings.active_partnership().map(|p| {
            let name = |id: &str| {
                batting
                    .and_then(|t| t.player(id))
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| id.to_string())
            };
            PartnershipLine {
                player1: name(&p.player1_id),
                player2: name(&p.player2_id),
                runs: p.runs,
                balls: p.balls,
            }
        });

        Scoreboard {
            inning: self.current_inning,
            batting_team: batting.map(|t| t.name.clone()).unwrap_or_default(),
            bowling_team: bowling.map(|t| t.name.clone()).unwrap_or_default(),
            score: format!("{}/{}", innings.total_runs, innings.wickets),
            runs: innings.total_runs,
            wickets: innings.wickets,
            overs: innings.overs_display(),
            run_rate: run_rate(innings.total_runs, legal_balls),
            target,
            runs_required,
            balls_remaining,
            required_run_rate: rrr,
            striker: self.striker().map(|p| BatsmanLine::from_player(p, true)),
            non_striker: self.non_striker().map(|p| BatsmanLine::from_player(p, false)),
            bowler: self.current_bowler().map(BowlerLine::from_player),
            this_over: this_over(innings),
            fall_of_wickets: fall_of_wickets(self, innings),
            partnership,
            extras: innings.extras,
            extras_breakdown: innings.extras_breakdown.clone(),
            match_over: self.match_over,
            result: self.match_result.clone(),
            outcome: self.outcome,
        }
    }
}
