use serde::{Deserialize, Serialize};

use super::rules::BALLS_PER_OVER;

pub type PlayerId = String;

/// One player's cumulative statistics for the match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cricketer {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub batting: BattingStats,
    #[serde(default)]
    pub bowling: BowlingStats,
    #[serde(default)]
    pub fielding: FieldingStats,
}

impl Cricketer {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            batting: BattingStats::default(),
            bowling: BowlingStats::default(),
            fielding: FieldingStats::default(),
        }
    }

    /// Out or retired players cannot walk back to the crease.
    pub fn can_bat(&self) -> bool {
        !self.batting.is_out && !self.batting.is_retired
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BattingStats {
    pub runs: u32,
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
    pub strike_rate: f64,
    pub is_out: bool,
    pub is_retired: bool,
}

impl BattingStats {
    /// Runs per 100 balls, 0 before the first ball faced.
    pub fn recompute_strike_rate(&mut self) {
        self.strike_rate = if self.balls > 0 {
            self.runs as f64 / self.balls as f64 * 100.0
        } else {
            0.0
        };
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BowlingStats {
    pub overs: u32,
    pub balls_this_over: u32,
    pub runs_conceded: u32,
    pub wickets: u32,
    pub economy: f64,
    pub maidens: u32,
}

impl BowlingStats {
    pub fn total_legal_balls(&self) -> u32 {
        self.overs * BALLS_PER_OVER + self.balls_this_over
    }

    /// Runs conceded per six legal balls, 0 before the first legal ball.
    pub fn recompute_economy(&mut self) {
        let balls = self.total_legal_balls();
        self.economy = if balls > 0 {
            self.runs_conceded as f64 / (balls as f64 / BALLS_PER_OVER as f64)
        } else {
            0.0
        };
    }

    /// Cricket notation, e.g. `3.2` for three overs and two balls.
    pub fn overs_display(&self) -> String {
        format!("{}.{}", self.overs, self.balls_this_over)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FieldingStats {
    pub catches: u32,
    pub runouts: u32,
}
