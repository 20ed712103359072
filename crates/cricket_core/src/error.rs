use thiserror::Error;

use crate::models::PlayerId;

/// Domain errors returned by every scoring command.
///
/// A command that returns one of these has not touched the state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoringError {
    #[error("Not ready: {reason}")]
    NotReady { reason: String },

    #[error("Match is already over")]
    MatchOver,

    #[error("Innings is complete and awaiting the transition to innings 2")]
    InningsAwaitingTransition,

    #[error("Bowler {bowler_id} is not eligible: {reason}")]
    BowlerIneligible { bowler_id: PlayerId, reason: String },

    #[error("Unknown player: {player_id}")]
    UnknownPlayer { player_id: PlayerId },

    #[error("Player {player_id} is not at the crease")]
    InvalidDismissal { player_id: PlayerId },

    #[error("Invalid delivery: {0}")]
    InvalidDelivery(String),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Invalid match setup: {0}")]
    InvalidSetup(String),

    #[error("Invalid innings transition: {0}")]
    InvalidTransition(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl ScoringError {
    pub(crate) fn not_ready(reason: impl Into<String>) -> Self {
        ScoringError::NotReady { reason: reason.into() }
    }

    /// Rule violations should re-prompt the scorer rather than abort the session.
    pub fn is_rule_violation(&self) -> bool {
        matches!(self, ScoringError::BowlerIneligible { .. })
    }
}

impl From<serde_json::Error> for ScoringError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            ScoringError::Deserialization(err.to_string())
        } else {
            ScoringError::Serialization(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, ScoringError>;
