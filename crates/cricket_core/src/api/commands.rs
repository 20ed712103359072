//! Serializable scoring commands, one variant per engine operation.
//!
//! A UI or script sends these as JSON objects tagged by `type`:
//!
//! ```json
//! {"type": "score_ball", "runs": 1, "extra_type": "wide"}
//! {"type": "set_bowler", "player_id": "a4", "name": "Rashid"}
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::{CompletionStatus, DeliveryOutcome};
use crate::error::Result;
use crate::models::{Cricketer, DeliveryEvent, DeliveryInput, MatchState, TeamSide, TossChoice};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    SetTeamName {
        side: TeamSide,
        name: String,
    },
    SetTossWinner {
        side: TeamSide,
    },
    SetTossChoice {
        choice: TossChoice,
    },
    SetTotalOvers {
        overs: u32,
    },
    SetPlayersPerTeam {
        players: u32,
    },
    AddPlayer {
        side: TeamSide,
        player_id: String,
        name: String,
    },
    /// Validate setup and open innings 1 from the toss.
    BeginMatch,
    InitializeInnings {
        batting: TeamSide,
        bowling: TeamSide,
    },
    SetCurrentStriker {
        player_id: String,
        #[serde(default)]
        name: Option<String>,
    },
    SetCurrentNonStriker {
        player_id: String,
        #[serde(default)]
        name: Option<String>,
    },
    SetBowler {
        player_id: String,
        #[serde(default)]
        name: Option<String>,
    },
    ScoreBall(DeliveryInput),
    UndoLastBall,
    SwapBatsmen,
    RetireBatsman {
        player_id: String,
    },
    CheckInningsCompletion,
    StartInnings2,
    EndInnings,
    SetTargetScore {
        value: u32,
    },
}

/// What a command did, for the caller to react to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommandOutcome {
    Applied,
    Delivery(DeliveryOutcome),
    Undone { event: Option<DeliveryEvent> },
    Completion(CompletionStatus),
}

/// Run one command against the state.
///
/// On error the state is unchanged.
pub fn apply_command(state: &mut MatchState, command: Command) -> Result<CommandOutcome> {
    debug!(?command, "applying command");
    let outcome = match command {
        Command::SetTeamName { side, name } => {
            state.set_team_name(side, &name)?;
            CommandOutcome::Applied
        }
        Command::SetTossWinner { side } => {
            state.set_toss_winner(side);
            CommandOutcome::Applied
        }
        Command::SetTossChoice { choice } => {
            state.set_toss_choice(choice);
            CommandOutcome::Applied
        }
        Command::SetTotalOvers { overs } => {
            state.set_total_overs(overs)?;
            CommandOutcome::Applied
        }
        Command::SetPlayersPerTeam { players } => {
            state.set_players_per_team(players)?;
            CommandOutcome::Applied
        }
        Command::AddPlayer { side, player_id, name } => {
            state.add_player(side, Cricketer::new(player_id, name))?;
            CommandOutcome::Applied
        }
        Command::BeginMatch => {
            state.begin_match()?;
            CommandOutcome::Applied
        }
        Command::InitializeInnings { batting, bowling } => {
            state.initialize_innings(batting, bowling)?;
            CommandOutcome::Applied
        }
        Command::SetCurrentStriker { player_id, name } => {
            state.set_current_striker(&player_id, name.as_deref())?;
            CommandOutcome::Applied
        }
        Command::SetCurrentNonStriker { player_id, name } => {
            state.set_current_non_striker(&player_id, name.as_deref())?;
            CommandOutcome::Applied
        }
        Command::SetBowler { player_id, name } => {
            state.set_bowler(&player_id, name.as_deref())?;
            CommandOutcome::Applied
        }
        Command::ScoreBall(input) => CommandOutcome::Delivery(state.score_ball(input)?),
        Command::UndoLastBall => CommandOutcome::Undone { event: state.undo_last_ball() },
        Command::SwapBatsmen => {
            state.swap_batsmen()?;
            CommandOutcome::Applied
        }
        Command::RetireBatsman { player_id } => {
            state.retire_batsman(&player_id)?;
            CommandOutcome::Applied
        }
        Command::CheckInningsCompletion => {
            CommandOutcome::Completion(state.check_innings_completion())
        }
        Command::StartInnings2 => {
            state.start_innings2()?;
            CommandOutcome::Applied
        }
        Command::EndInnings => CommandOutcome::Completion(state.end_innings()?),
        Command::SetTargetScore { value } => {
            state.set_target_score(value);
            CommandOutcome::Applied
        }
    };
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScoringError;
    use crate::models::ExtraType;

    #[test]
    fn test_parse_tagged_commands() {
        let cmd: Command =
            serde_json::from_str(r#"{"type":"score_ball","runs":1,"extra_type":"wide"}"#).unwrap();
        assert_eq!(cmd, Command::ScoreBall(DeliveryInput::wide(1)));

        let cmd: Command =
            serde_json::from_str(r#"{"type":"score_ball","runs":2,"extra_type":"no-ball"}"#)
                .unwrap();
        match cmd {
            Command::ScoreBall(input) => assert_eq!(input.extra_type, Some(ExtraType::NoBall)),
            other => panic!("unexpected {other:?}"),
        }

        let cmd: Command =
            serde_json::from_str(r#"{"type":"set_bowler","player_id":"a4"}"#).unwrap();
        assert_eq!(cmd, Command::SetBowler { player_id: "a4".into(), name: None });

        let cmd: Command = serde_json::from_str(r#"{"type":"undo_last_ball"}"#).unwrap();
        assert_eq!(cmd, Command::UndoLastBall);

        assert!(serde_json::from_str::<Command>(r#"{"type":"declare"}"#).is_err());
    }

    #[test]
    fn test_apply_sequence() {
        let mut state = MatchState::new();
        let script = vec![
            Command::SetTeamName { side: TeamSide::Home, name: "Lions".into() },
            Command::SetTeamName { side: TeamSide::Away, name: "Tigers".into() },
            Command::SetTossWinner { side: TeamSide::Away },
            Command::SetTossChoice { choice: TossChoice::Bowl },
            Command::SetTotalOvers { overs: 5 },
            Command::BeginMatch,
            Command::SetCurrentStriker { player_id: "h1".into(), name: Some("Asha".into()) },
            Command::SetCurrentNonStriker { player_id: "h2".into(), name: Some("Bina".into()) },
            Command::SetBowler { player_id: "a1".into(), name: Some("Dev".into()) },
        ];
        for cmd in script {
            assert_eq!(apply_command(&mut state, cmd).unwrap(), CommandOutcome::Applied);
        }
        assert_eq!(state.batting_side(), Some(TeamSide::Home));

        let outcome = apply_command(&mut state, Command::ScoreBall(DeliveryInput::runs(3))).unwrap();
        match outcome {
            CommandOutcome::Delivery(d) => assert!(d.strike_rotated),
            other => panic!("unexpected {other:?}"),
        }

        let undone = apply_command(&mut state, Command::UndoLastBall).unwrap();
        assert!(matches!(undone, CommandOutcome::Undone { event: Some(_) }));
        assert_eq!(state.innings1.total_runs, 0);
    }

    #[test]
    fn test_rejected_command_leaves_state() {
        let mut state = MatchState::new();
        let before = state.clone();
        let err = apply_command(&mut state, Command::ScoreBall(DeliveryInput::runs(4))).unwrap_err();
        assert!(matches!(err, ScoringError::NotReady { .. }));
        assert_eq!(state, before);
    }
}
