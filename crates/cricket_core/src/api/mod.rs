pub mod commands;
pub mod json_api;

pub use commands::{apply_command, Command, CommandOutcome};
pub use json_api::{
    dispatch_command_json, new_match_json, ScoringRequest, ScoringResponse, SCHEMA_VERSION,
};
