use serde::{Deserialize, Serialize};

use super::rules::BALLS_PER_OVER;
use super::{DeliveryEvent, PlayerId, TeamSide};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnershipRecord {
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
    pub runs: u32,
    pub balls: u32,
    pub is_active: bool,
}

impl PartnershipRecord {
    pub fn open(player1_id: PlayerId, player2_id: PlayerId) -> Self {
        Self { player1_id, player2_id, runs: 0, balls: 0, is_active: true }
    }

    pub fn involves(&self, player_id: &str) -> bool {
        self.player1_id == player_id || self.player2_id == player_id
    }
}

/// Extras split by kind. `InningsData::extras` is always their sum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ExtrasBreakdown {
    pub wides: u32,
    pub no_balls: u32,
    pub byes: u32,
    pub leg_byes: u32,
}

impl ExtrasBreakdown {
    pub fn total(&self) -> u32 {
        self.wides + self.no_balls + self.byes + self.leg_byes
    }
}

/// One innings' ball-by-ball ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct InningsData {
    /// `None` until the innings is initialized
    pub batting_side: Option<TeamSide>,
    pub bowling_side: Option<TeamSide>,
    pub total_runs: u32,
    pub wickets: u32,
    pub completed_overs: u32,
    pub ball_in_current_over: u8,
    pub extras: u32,
    #[serde(default)]
    pub extras_breakdown: ExtrasBreakdown,
    pub current_striker_id: Option<PlayerId>,
    pub current_non_striker_id: Option<PlayerId>,
    pub current_bowler_id: Option<PlayerId>,
    pub last_over_bowler_id: Option<PlayerId>,
    #[serde(default)]
    pub partnerships: Vec<PartnershipRecord>,
    #[serde(default)]
    pub deliveries: Vec<DeliveryEvent>,
    pub is_completed: bool,
    /// Innings 1 only: overs or wickets exhausted, waiting for `start_innings2`
    pub ready_for_innings2: bool,
    pub is_all_out: bool,
}

impl InningsData {
    /// Blank ledger for the given sides.
    pub fn new(batting_side: TeamSide, bowling_side: TeamSide) -> Self {
        Self {
            batting_side: Some(batting_side),
            bowling_side: Some(bowling_side),
            ..Default::default()
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.batting_side.is_some()
    }

    pub fn legal_balls(&self) -> u32 {
        self.completed_overs * BALLS_PER_OVER + self.ball_in_current_over as u32
    }

    /// Legal deliveries in the ledger. Always equals `legal_balls()`.
    pub fn legal_delivery_count(&self) -> u32 {
        self.deliveries.iter().filter(|d| d.is_legal()).count() as u32
    }

    pub fn overs_display(&self) -> String {
        format!("{}.{}", self.completed_overs, self.ball_in_current_over)
    }

    pub fn active_partnership(&self) -> Option<&PartnershipRecord> {
        self.partnerships.last().filter(|p| p.is_active)
    }

    pub fn is_at_crease(&self, player_id: &str) -> bool {
        self.current_striker_id.as_deref() == Some(player_id)
            || self.current_non_striker_id.as_deref() == Some(player_id)
    }

    pub(crate) fn swap_strike(&mut self) {
        std::mem::swap(&mut self.current_striker_id, &mut self.current_non_striker_id);
    }

    /// Empty whichever crease slot holds `player_id`.
    pub(crate) fn vacate(&mut self, player_id: &str) {
        if self.current_striker_id.as_deref() == Some(player_id) {
            self.current_striker_id = None;
        } else if self.current_non_striker_id.as_deref() == Some(player_id) {
            self.current_non_striker_id = None;
        }
    }
}
