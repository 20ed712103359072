//! Match format configuration.
//!
//! ```rust
//! use cricket_core::models::MatchRules;
//!
//! let t20 = MatchRules::t20();
//! assert_eq!(t20.max_overs_per_bowler, Some(4));
//!
//! let custom = MatchRules::from_yaml_str("overs: 12\n").unwrap();
//! assert_eq!(custom.overs, 12);
//! ```

use serde::{Deserialize, Serialize};

/// Legal deliveries per over. Fixed by the laws; not configurable.
pub const BALLS_PER_OVER: u32 = 6;

/// Most runs a scorer can enter for a single ball, overthrows included.
pub const MAX_RUNS_PER_BALL: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchRules {
    /// Overs per innings
    pub overs: u32,
    pub players_per_team: u32,
    /// `None` means any bowler may bowl every over except consecutive ones
    pub max_overs_per_bowler: Option<u32>,
    /// Penalty run for a wide, added to extras
    pub wide_penalty: u32,
    /// Penalty run for a no-ball, added to extras and charged to the bowler
    pub no_ball_penalty: u32,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self::t20()
    }
}

impl MatchRules {
    pub fn t20() -> Self {
        Self {
            overs: 20,
            players_per_team: 11,
            max_overs_per_bowler: Some(4),
            wide_penalty: 1,
            no_ball_penalty: 1,
        }
    }

    pub fn odi() -> Self {
        Self { overs: 50, max_overs_per_bowler: Some(10), ..Self::t20() }
    }

    pub fn t10() -> Self {
        Self { overs: 10, max_overs_per_bowler: Some(2), ..Self::t20() }
    }

    /// One fifth of the overs per bowler, rounded up.
    pub fn custom(overs: u32) -> Self {
        Self {
            overs,
            max_overs_per_bowler: Some(overs.div_ceil(5).max(1)),
            ..Self::t20()
        }
    }

    /// No per-bowler cap; used for friendly and practice matches.
    pub fn unlimited(overs: u32) -> Self {
        Self { overs, max_overs_per_bowler: None, ..Self::t20() }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    pub fn to_yaml_string(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(MatchRules::default(), MatchRules::t20());
        assert_eq!(MatchRules::odi().overs, 50);
        assert_eq!(MatchRules::t10().max_overs_per_bowler, Some(2));
    }

    #[test]
    fn test_custom_rounds_up() {
        assert_eq!(MatchRules::custom(12).max_overs_per_bowler, Some(3));
        assert_eq!(MatchRules::custom(1).max_overs_per_bowler, Some(1));
        assert_eq!(MatchRules::custom(20).max_overs_per_bowler, Some(4));
    }

    #[test]
    fn test_yaml_fills_defaults() {
        let rules = MatchRules::from_yaml_str("overs: 5\nmax_overs_per_bowler: null\n").unwrap();
        assert_eq!(rules.overs, 5);
        assert_eq!(rules.players_per_team, 11);
        assert_eq!(rules.max_overs_per_bowler, None);
        assert_eq!(rules.wide_penalty, 1);

        let yaml = rules.to_yaml_string().unwrap();
        assert_eq!(MatchRules::from_yaml_str(&yaml).unwrap(), rules);
    }
}
