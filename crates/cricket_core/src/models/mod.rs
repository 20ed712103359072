pub mod delivery;
pub mod innings;
pub mod match_state;
pub mod player;
pub mod rules;
pub mod team;

pub use delivery::{DeliveryEffects, DeliveryEvent, DeliveryInput, ExtraType, WicketType};
pub use innings::{ExtrasBreakdown, InningsData, PartnershipRecord};
pub use match_state::{Margin, MatchOutcome, MatchState, TossChoice};
pub use player::{BattingStats, BowlingStats, Cricketer, FieldingStats, PlayerId};
pub use rules::{MatchRules, BALLS_PER_OVER, MAX_RUNS_PER_BALL};
pub use team::{Team, TeamSide};

pub(crate) use match_state::ActiveMut;
