//! Scoring engine: every command that mutates a `MatchState`.
//!
//! Commands are inherent methods on `MatchState`, grouped by concern:
//!
//! - `setup`: teams, toss, overs, rosters
//! - `innings`: initialize, transition to the chase, close
//! - `selection`: striker, non-striker, bowler, retirements
//! - `delivery`: one ball in
//! - `undo`: one ball out
//! - `oracle`: innings and match completion
//! - `stats`: read-only scoreboard projections

pub mod delivery;
pub mod innings;
pub mod oracle;
pub mod selection;
pub mod setup;
pub mod stats;
pub mod undo;

pub use delivery::{DeliveryOutcome, RunSplit};
pub use oracle::{decide_outcome, describe_outcome, evaluate, CompletionCheck, CompletionStatus};
pub use setup::batting_first;
pub use stats::{
    required_run_rate, run_rate, BatsmanLine, BowlerLine, FallOfWicket, PartnershipLine,
    Scoreboard,
};
