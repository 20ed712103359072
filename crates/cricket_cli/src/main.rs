//! cricket_score CLI
//!
//! Replays a JSON match script through the scoring engine.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cricket_score")]
#[command(version, about = "Replay a ball-by-ball cricket match script", long_about = None)]
struct Cli {
    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a match script and print the result
    Score {
        /// Match script (JSON)
        #[arg(long)]
        script: PathBuf,

        /// Rules file (YAML), overrides the script's rules
        #[arg(long)]
        rules: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Abort on the first rejected command
        #[arg(long, default_value = "false")]
        strict: bool,
    },

    /// Write a starter script
    Init {
        #[arg(long)]
        out: PathBuf,

        #[arg(long, default_value = "20")]
        overs: u32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Scorecard summary
    Text,
    /// Scoreboard projection as JSON
    Json,
    /// Full match state as JSON
    State,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Score { script, rules, format, strict } => {
            let rules = rules.as_deref().map(cricket_cli::load_rules).transpose()?;
            let script = cricket_cli::load_script(&script)?;
            let report = cricket_cli::replay(script, rules, strict)?;

            match format {
                OutputFormat::Text => {
                    print!("{}", cricket_cli::render_scoreboard(&report.state.scoreboard()));
                    for rejected in &report.rejected {
                        eprintln!("rejected #{}: {}", rejected.index, rejected.error);
                    }
                }
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&report.state.scoreboard())?);
                }
                OutputFormat::State => {
                    println!("{}", serde_json::to_string_pretty(&report.state)?);
                }
            }
        }

        Commands::Init { out, overs } => {
            cricket_cli::write_template(&out, overs)?;
            println!("Script template written to {}", out.display());
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
