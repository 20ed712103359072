//! Match script replay
//!
//! A script is a JSON document holding optional rules and an ordered list
//! of scoring commands. Replaying it through the engine yields the final
//! `MatchState` plus any commands the engine rejected.

use anyhow::{Context, Result};
use cricket_core::engine::Scoreboard;
use cricket_core::{apply_command, Command, MatchRules, MatchState, TeamSide, TossChoice};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchScript {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<MatchRules>,
    pub commands: Vec<Command>,
}

/// A command the engine refused; the scorer would have been re-prompted.
#[derive(Debug, Clone, Serialize)]
pub struct RejectedCommand {
    /// Zero-based position in the script
    pub index: usize,
    pub command: Command,
    pub error: String,
    pub rule_violation: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub applied: usize,
    pub rejected: Vec<RejectedCommand>,
    pub state: MatchState,
}

pub fn load_script(path: &Path) -> Result<MatchScript> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read script: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Invalid match script: {}", path.display()))
}

pub fn load_rules(path: &Path) -> Result<MatchRules> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read rules: {}", path.display()))?;
    MatchRules::from_yaml_str(&text)
        .with_context(|| format!("Invalid rules YAML: {}", path.display()))
}

/// Replay every command in order.
///
/// `rules` overrides the script's own rules. With `strict`, the first
/// rejected command aborts the replay.
pub fn replay(script: MatchScript, rules: Option<MatchRules>, strict: bool) -> Result<ReplayReport> {
    let rules = rules.or(script.rules).unwrap_or_default();
    let mut state = MatchState::with_rules(rules);
    let mut applied = 0;
    let mut rejected = Vec::new();

    for (index, command) in script.commands.into_iter().enumerate() {
        match apply_command(&mut state, command.clone()) {
            Ok(_) => applied += 1,
            Err(err) => {
                if strict {
                    return Err(err).with_context(|| format!("Command #{index} rejected: {command:?}"));
                }
                warn!(index, error = %err, "command rejected");
                rejected.push(RejectedCommand {
                    index,
                    command,
                    rule_violation: err.is_rule_violation(),
                    error: err.to_string(),
                });
            }
        }
    }

    info!(applied, rejected = rejected.len(), "replay finished");
    Ok(ReplayReport { applied, rejected, state })
}

/// A starter script: a short match set up and ready for the first ball.
pub fn template(overs: u32) -> MatchScript {
    let mut commands = vec![
        Command::SetTeamName { side: TeamSide::Home, name: "Home XI".into() },
        Command::SetTeamName { side: TeamSide::Away, name: "Away XI".into() },
        Command::SetTossWinner { side: TeamSide::Home },
        Command::SetTossChoice { choice: TossChoice::Bat },
        Command::SetTotalOvers { overs },
    ];
    for i in 1..=11 {
        commands.push(Command::AddPlayer {
            side: TeamSide::Home,
            player_id: format!("h{i}"),
            name: format!("Home Player {i}"),
        });
        commands.push(Command::AddPlayer {
            side: TeamSide::Away,
            player_id: format!("a{i}"),
            name: format!("Away Player {i}"),
        });
    }
    commands.extend([
        Command::BeginMatch,
        Command::SetCurrentStriker { player_id: "h1".into(), name: None },
        Command::SetCurrentNonStriker { player_id: "h2".into(), name: None },
        Command::SetBowler { player_id: "a1".into(), name: None },
    ]);
    MatchScript { rules: Some(MatchRules::custom(overs)), commands }
}

pub fn write_template(path: &Path, overs: u32) -> Result<()> {
    let json = serde_json::to_string_pretty(&template(overs))?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Plain-text scorecard summary.
pub fn render_scoreboard(board: &Scoreboard) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} ({} ov)  RR {:.2}",
        board.batting_team, board.score, board.overs, board.run_rate
    );
    if let (Some(target), Some(need), Some(balls)) =
        (board.target, board.runs_required, board.balls_remaining)
    {
        let _ = write!(out, "Target {target}, need {need} from {balls} balls");
        if let Some(rrr) = board.required_run_rate {
            let _ = write!(out, " (RRR {rrr:.2})");
        }
        out.push('\n');
    }
    for batsman in [&board.striker, &board.non_striker].into_iter().flatten() {
        let mark = if batsman.on_strike { '*' } else { ' ' };
        let _ = writeln!(out, "{mark} {} {} ({})", batsman.name, batsman.runs, batsman.balls);
    }
    if let Some(bowler) = &board.bowler {
        let _ = writeln!(
            out,
            "  {} {}-{}-{}-{}",
            bowler.name, bowler.overs, bowler.maidens, bowler.runs, bowler.wickets
        );
    }
    if !board.this_over.is_empty() {
        let _ = writeln!(out, "This over: {}", board.this_over.join(" "));
    }
    if !board.fall_of_wickets.is_empty() {
        let fow: Vec<String> = board
            .fall_of_wickets
            .iter()
            .map(|f| format!("{}-{} ({}, {})", f.score, f.wicket_number, f.player_name, f.over))
            .collect();
        let _ = writeln!(out, "FoW: {}", fow.join(", "));
    }
    if let Some(p) = &board.partnership {
        let _ = writeln!(out, "Partnership: {} ({})", p.runs, p.balls);
    }
    let e = &board.extras_breakdown;
    let _ = writeln!(
        out,
        "Extras: {} (wd {}, nb {}, b {}, lb {})",
        board.extras, e.wides, e.no_balls, e.byes, e.leg_byes
    );
    if let Some(result) = &board.result {
        let _ = writeln!(out, "Result: {result}");
    }
    out
}
