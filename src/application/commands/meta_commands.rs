// src/application/commands/meta_commands.rs
//
// Registry and database info commands

use super::parser::USAGE;
use super::CommandOutput;
use crate::application::state::AppState;
use crate::domain::{EntityKind, REGISTRY};
use crate::error::AppResult;

pub fn help() -> CommandOutput {
    let width = USAGE.iter().map(|(usage, _)| usage.len()).max().unwrap_or(0);
    let lines: Vec<String> = USAGE
        .iter()
        .map(|(usage, summary)| format!("  {:<width$}  {}", usage, summary, width = width))
        .collect();

    CommandOutput::Message(format!("Commands:\n{}", lines.join("\n")))
}

pub fn kinds() -> CommandOutput {
    CommandOutput::Kinds(REGISTRY.iter().collect())
}

pub fn fields(kind: &str) -> AppResult<CommandOutput> {
    Ok(CommandOutput::Fields(EntityKind::parse(kind)?.descriptor()))
}

pub fn stats(state: &AppState) -> AppResult<CommandOutput> {
    Ok(CommandOutput::Stats(state.hotel_service.stats()?))
}
