//! # cricket_core - Ball-by-Ball Cricket Scoring Engine
//!
//! A deterministic state machine for scoring a two-innings limited-overs
//! cricket match. The caller owns one [`MatchState`] and drives it with
//! scoring commands; every accepted ball is appended to an immutable
//! ledger and can be reversed exactly with `undo_last_ball`.
//!
//! ## Features
//! - Setup, innings lifecycle, delivery processing, undo and completion
//!   checks on a single aggregate
//! - Correct run attribution for wides, no-balls, byes and leg-byes
//! - Strike rotation, over accounting, partnerships, maidens, fall of wickets
//! - Serializable state plus a tagged JSON command API for UI hosts
//!
//! ```rust
//! use cricket_core::{DeliveryInput, MatchState, TeamSide};
//!
//! let mut state = MatchState::new();
//! state.initialize_innings(TeamSide::Home, TeamSide::Away).unwrap();
//! state.set_current_striker("h1", Some("Asha")).unwrap();
//! state.set_current_non_striker("h2", Some("Bina")).unwrap();
//! state.set_bowler("a1", Some("Dev")).unwrap();
//!
//! state.score_ball(DeliveryInput::runs(4)).unwrap();
//! state.score_ball(DeliveryInput::wide(0)).unwrap();
//! assert_eq!(state.scoreboard().score, "5/0");
//!
//! state.undo_last_ball();
//! assert_eq!(state.innings1.total_runs, 4);
//! ```

pub mod api;
pub mod engine;
pub mod error;
pub mod models;

pub use api::{
    apply_command, dispatch_command_json, new_match_json, Command, CommandOutcome,
    ScoringRequest, ScoringResponse, SCHEMA_VERSION,
};
pub use engine::{
    batting_first, decide_outcome, describe_outcome, evaluate, CompletionCheck, CompletionStatus,
    DeliveryOutcome, RunSplit, Scoreboard,
};
pub use error::{Result, ScoringError};
pub use models::{
    Cricketer, DeliveryEvent, DeliveryInput, ExtraType, InningsData, Margin, MatchOutcome,
    MatchRules, MatchState, Team, TeamSide, TossChoice, WicketType, BALLS_PER_OVER,
    MAX_RUNS_PER_BALL,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
