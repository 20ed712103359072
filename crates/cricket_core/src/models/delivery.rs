use serde::{Deserialize, Serialize};

use super::PlayerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraType {
    #[serde(alias = "wd")]
    Wide,
    #[serde(alias = "no-ball", alias = "noball", alias = "nb")]
    NoBall,
    #[serde(alias = "b")]
    Bye,
    #[serde(alias = "leg-bye", alias = "legbye", alias = "lb")]
    LegBye,
}

impl ExtraType {
    /// Wides and no-balls do not count toward the six-ball over.
    #[inline]
    pub fn is_illegal(&self) -> bool {
        matches!(self, ExtraType::Wide | ExtraType::NoBall)
    }

    /// Byes and leg-byes: every run goes to extras.
    #[inline]
    pub fn is_bye(&self) -> bool {
        matches!(self, ExtraType::Bye | ExtraType::LegBye)
    }

    pub fn short_code(&self) -> &'static str {
        match self {
            ExtraType::Wide => "wd",
            ExtraType::NoBall => "nb",
            ExtraType::Bye => "b",
            ExtraType::LegBye => "lb",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WicketType {
    Bowled,
    Caught,
    Lbw,
    #[serde(alias = "runout", alias = "run-out")]
    RunOut,
    Stumped,
    HitWicket,
    Retired,
    ObstructingTheField,
    Other,
}

impl WicketType {
    /// Run outs, retirements and obstruction are not the bowler's wicket.
    pub fn credits_bowler(&self) -> bool {
        !matches!(
            self,
            WicketType::RunOut | WicketType::Retired | WicketType::ObstructingTheField
        )
    }
}

/// A scorer's description of one ball, before it is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DeliveryInput {
    pub runs: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_type: Option<ExtraType>,
    #[serde(default)]
    pub wicket: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wicket_type: Option<WicketType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_batsman_id: Option<PlayerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fielder_id: Option<PlayerId>,
}

impl DeliveryInput {
    pub fn runs(runs: u32) -> Self {
        Self { runs, ..Default::default() }
    }

    pub fn dot() -> Self {
        Self::runs(0)
    }

    pub fn extra(extra: ExtraType, runs: u32) -> Self {
        Self { runs, extra_type: Some(extra), ..Default::default() }
    }

    pub fn wide(runs: u32) -> Self {
        Self::extra(ExtraType::Wide, runs)
    }

    pub fn no_ball(runs: u32) -> Self {
        Self::extra(ExtraType::NoBall, runs)
    }

    pub fn bye(runs: u32) -> Self {
        Self::extra(ExtraType::Bye, runs)
    }

    pub fn leg_bye(runs: u32) -> Self {
        Self::extra(ExtraType::LegBye, runs)
    }

    pub fn with_wicket(mut self, wicket_type: WicketType, out_batsman_id: Option<PlayerId>) -> Self {
        self.wicket = true;
        self.wicket_type = Some(wicket_type);
        self.out_batsman_id = out_batsman_id;
        self
    }

    pub fn with_fielder(mut self, fielder_id: impl Into<PlayerId>) -> Self {
        self.fielder_id = Some(fielder_id.into());
        self
    }

    pub fn is_legal(&self) -> bool {
        !self.extra_type.is_some_and(|e| e.is_illegal())
    }

    /// Physically run (or boundary) runs decide strike rotation.
    pub fn rotates_strike(&self) -> bool {
        self.runs % 2 == 1
    }
}

/// Immutable record of one applied ball.
///
/// `effects` records the state changes the ball caused that cannot be
/// re-derived from the payload alone, so undo can reverse them exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryEvent {
    pub runs: u32,
    pub batsman_runs: u32,
    pub total_runs: u32,
    /// Runs charged to the bowler's personal figures
    pub bowler_runs: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_type: Option<ExtraType>,
    #[serde(default)]
    pub wicket: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wicket_type: Option<WicketType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_batsman_id: Option<PlayerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fielder_id: Option<PlayerId>,
    pub bowler_id: PlayerId,
    /// Striker facing the ball
    pub batsman_id: PlayerId,
    pub non_striker_id: PlayerId,
    /// Completed overs when the ball was bowled
    pub over: u32,
    /// Legal-ball position in the over after this ball (1..=6, or the
    /// current count for wides and no-balls)
    pub ball: u8,
    pub timestamp: i64,
    #[serde(default)]
    pub effects: DeliveryEffects,
}

impl DeliveryEvent {
    pub fn is_legal(&self) -> bool {
        !self.extra_type.is_some_and(|e| e.is_illegal())
    }

    /// Short label for the this-over strip, e.g. `4`, `W`, `1wd`, `nb`.
    pub fn label(&self) -> String {
        let mut label = match self.extra_type {
            Some(ExtraType::Wide) | Some(ExtraType::NoBall) if self.runs == 0 => String::new(),
            _ => self.runs.to_string(),
        };
        if let Some(extra) = self.extra_type {
            label.push_str(extra.short_code());
        }
        if self.wicket {
            if self.runs == 0 && self.extra_type.is_none() {
                label.clear();
            }
            label.push('W');
        }
        label
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DeliveryEffects {
    pub strike_rotated: bool,
    pub over_completed: bool,
    pub bowler_over_completed: bool,
    pub maiden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_last_over_bowler_id: Option<PlayerId>,
    pub opened_partnership: bool,
    pub closed_partnership: bool,
    /// False when the ball won the chase before the wicket was processed
    pub wicket_applied: bool,
    pub ended_match: bool,
    pub previous_ready_for_innings2: bool,
    pub previous_all_out: bool,
}
