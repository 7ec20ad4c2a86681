// src/application/commands/mod.rs
//
// Command dispatch
//
// Maps a parsed Command to its handler. Handlers return data; printing
// is left to the view.

pub mod meta_commands;
pub mod parser;
pub mod record_commands;

pub use parser::{tokenize, Command, USAGE};

use crate::application::state::AppState;
use crate::db::DatabaseStats;
use crate::domain::{EntityDescriptor, Record};
use crate::error::AppResult;

/// What a command produced
#[derive(Debug)]
pub enum CommandOutput {
    Records(Vec<Record>),
    Message(String),
    Stats(DatabaseStats),
    Kinds(Vec<&'static EntityDescriptor>),
    Fields(&'static EntityDescriptor),
    Quit,
}

pub fn execute(state: &AppState, command: &Command) -> AppResult<CommandOutput> {
    match command {
        Command::Help => Ok(meta_commands::help()),
        Command::Kinds => Ok(meta_commands::kinds()),
        Command::Fields { kind } => meta_commands::fields(kind),
        Command::Stats => meta_commands::stats(state),
        Command::Quit => Ok(CommandOutput::Quit),
        Command::List { kind } => record_commands::list(state, kind),
        Command::Get { kind, key } => record_commands::get(state, kind, key),
        Command::Range {
            kind,
            field,
            low,
            high,
            order_by,
        } => record_commands::range(state, kind, field, *low, *high, order_by),
        Command::Search {
            kind,
            field,
            order_by,
            pattern,
        } => record_commands::search(state, kind, field, order_by, pattern),
        Command::Add { kind, fields } => record_commands::add(state, kind, fields),
        Command::Update {
            kind,
            key,
            field,
            value,
        } => record_commands::update(state, kind, key, field, value),
        Command::Delete { kind, key } => record_commands::delete(state, kind, key),
        Command::Generate { kind, count } => record_commands::generate(state, kind, *count),
    }
}
