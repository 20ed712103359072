// String-in, string-out boundary for UI hosts.
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::commands::{apply_command, Command, CommandOutcome};
use crate::engine::Scoreboard;
use crate::models::{MatchRules, MatchState};

pub const SCHEMA_VERSION: u8 = 1;

/// Command envelope. A bare command object (no `schema_version`) is also
/// accepted by `dispatch_command_json`.
#[derive(Debug, Deserialize)]
pub struct ScoringRequest {
    pub schema_version: u8,
    pub command: Command,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RequestBody {
    Envelope(ScoringRequest),
    Bare(Command),
}

/// Reply to every dispatched command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringResponse {
    pub schema_version: u8,
    pub success: bool,
    pub state: MatchState,
    pub scoreboard: Scoreboard,
    pub outcome: Option<CommandOutcome>,
    pub error_message: Option<String>,
    /// Rejected as a rule violation; re-prompt rather than abort
    #[serde(default)]
    pub rule_violation: bool,
}

impl ScoringResponse {
    fn new(state: MatchState) -> Self {
        let scoreboard = state.scoreboard();
        Self {
            schema_version: SCHEMA_VERSION,
            success: true,
            state,
            scoreboard,
            outcome: None,
            error_message: None,
            rule_violation: false,
        }
    }
}

/// Fresh match state as JSON, with rules from an optional YAML document.
pub fn new_match_json(rules_yaml: Option<&str>) -> Result<String, String> {
    let rules = match rules_yaml {
        Some(yaml) => {
            MatchRules::from_yaml_str(yaml).map_err(|e| format!("Invalid rules YAML: {}", e))?
        }
        None => MatchRules::default(),
    };
    let response = ScoringResponse::new(MatchState::with_rules(rules));
    serde_json::to_string(&response).map_err(|e| format!("Serialization error: {}", e))
}

/// Apply one command to a serialized state.
///
/// Malformed input is an `Err`. A command the engine rejects comes back
/// as `success: false` with the state unchanged.
pub fn dispatch_command_json(state_json: &str, command_json: &str) -> Result<String, String> {
    let mut state: MatchState =
        serde_json::from_str(state_json).map_err(|e| format!("Invalid state JSON: {}", e))?;

    let command = match serde_json::from_str(command_json)
        .map_err(|e| format!("Invalid JSON request: {}", e))?
    {
        RequestBody::Envelope(request) => {
            if request.schema_version != SCHEMA_VERSION {
                return Err(format!("Unsupported schema version: {}", request.schema_version));
            }
            request.command
        }
        RequestBody::Bare(command) => command,
    };

    let response = match apply_command(&mut state, command) {
        Ok(outcome) => ScoringResponse { outcome: Some(outcome), ..ScoringResponse::new(state) },
        Err(err) => {
            warn!(error = %err, "command rejected");
            ScoringResponse {
                success: false,
                error_message: Some(err.to_string()),
                rule_violation: err.is_rule_violation(),
                ..ScoringResponse::new(state)
            }
        }
    };

    serde_json::to_string(&response).map_err(|e| format!("Serialization error: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn state_of(response: &str) -> String {
        let value: Value = serde_json::from_str(response).unwrap();
        value["state"].to_string()
    }

    fn run(state: String, commands: &[&str]) -> String {
        commands.iter().fold(state, |state, cmd| {
            let response = dispatch_command_json(&state, cmd).unwrap();
            let value: Value = serde_json::from_str(&response).unwrap();
            assert_eq!(value["success"], true, "{cmd} failed: {}", value["error_message"]);
            value["state"].to_string()
        })
    }

    #[test]
    fn test_new_match_json_rules() {
        let response = new_match_json(Some("overs: 5\nmax_overs_per_bowler: 1\n")).unwrap();
        let value: Value = serde_json::from_str(&response).unwrap();
        assert_eq!(value["state"]["rules"]["overs"], 5);
        assert_eq!(value["scoreboard"]["score"], "0/0");

        assert!(new_match_json(Some("overs: [1")).is_err());
    }

    #[test]
    fn test_dispatch_scores_ball() {
        let state = state_of(&new_match_json(None).unwrap());
        let state = run(
            state,
            &[
                r#"{"type":"initialize_innings","batting":"home","bowling":"away"}"#,
                r#"{"type":"set_current_striker","player_id":"h1","name":"Asha"}"#,
                r#"{"type":"set_current_non_striker","player_id":"h2","name":"Bina"}"#,
                r#"{"schema_version":1,"command":{"type":"set_bowler","player_id":"a1","name":"Dev"}}"#,
            ],
        );

        let response = dispatch_command_json(&state, r#"{"type":"score_ball","runs":4}"#).unwrap();
        let value: Value = serde_json::from_str(&response).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["scoreboard"]["score"], "4/0");
        assert_eq!(value["scoreboard"]["this_over"][0], "4");
        assert_eq!(value["outcome"]["kind"], "delivery");
    }

    #[test]
    fn test_dispatch_rejection_keeps_state() {
        let state = state_of(&new_match_json(None).unwrap());
        let response = dispatch_command_json(&state, r#"{"type":"score_ball","runs":1}"#).unwrap();
        let value: Value = serde_json::from_str(&response).unwrap();
        assert_eq!(value["success"], false);
        assert!(value["error_message"].as_str().unwrap().contains("Not ready"));
        assert_eq!(value["state"].to_string(), state);
    }

    #[test]
    fn test_dispatch_rejects_oversized_runs() {
        let state = state_of(&new_match_json(None).unwrap());
        let state = run(
            state,
            &[
                r#"{"type":"initialize_innings","batting":"home","bowling":"away"}"#,
                r#"{"type":"set_current_striker","player_id":"h1","name":"Asha"}"#,
                r#"{"type":"set_current_non_striker","player_id":"h2","name":"Bina"}"#,
                r#"{"type":"set_bowler","player_id":"a1","name":"Dev"}"#,
            ],
        );

        let ball = r#"{"type":"score_ball","extra_type":"no_ball","runs":4294967295}"#;
        let response = dispatch_command_json(&state, ball).unwrap();
        let value: Value = serde_json::from_str(&response).unwrap();
        assert_eq!(value["success"], false);
        assert!(value["error_message"].as_str().unwrap().contains("Invalid delivery"));
        assert_eq!(value["state"].to_string(), state);
    }

    #[test]
    fn test_dispatch_malformed_input() {
        let state = state_of(&new_match_json(None).unwrap());
        assert!(dispatch_command_json("{", r#"{"type":"swap_batsmen"}"#).is_err());
        assert!(dispatch_command_json(&state, r#"{"type":"bogus"}"#).is_err());
        let wrong_version = r#"{"schema_version":9,"command":{"type":"swap_batsmen"}}"#;
        assert!(dispatch_command_json(&state, wrong_version)
            .unwrap_err()
            .contains("schema version"));
    }
}
