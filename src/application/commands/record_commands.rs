// src/application/commands/record_commands.rs
//
// Record Command Handlers
//
// RULES:
// - Accept parsed arguments
// - Call the hotel service
// - Return CommandOutput
// - Never contain business logic

use super::CommandOutput;
use crate::application::state::AppState;
use crate::domain::{EntityKind, Record};
use crate::error::AppResult;
use crate::services::DeleteOutcome;

pub fn list(state: &AppState, kind: &str) -> AppResult<CommandOutput> {
    let records = state.hotel_service.fetch_all(kind)?;
    Ok(CommandOutput::Records(records))
}

pub fn get(state: &AppState, kind: &str, key: &str) -> AppResult<CommandOutput> {
    let record = state.hotel_service.fetch_one(kind, key)?;
    Ok(CommandOutput::Records(record.into_iter().collect()))
}

pub fn range(
    state: &AppState,
    kind: &str,
    field: &str,
    low: i64,
    high: i64,
    order_by: &str,
) -> AppResult<CommandOutput> {
    let records = state
        .hotel_service
        .fetch_in_range(kind, field, low, high, order_by)?;
    Ok(CommandOutput::Records(records))
}

pub fn search(
    state: &AppState,
    kind: &str,
    field: &str,
    order_by: &str,
    pattern: &str,
) -> AppResult<CommandOutput> {
    let records = state
        .hotel_service
        .fetch_by_pattern(kind, field, pattern, order_by)?;
    Ok(CommandOutput::Records(records))
}

pub fn add(state: &AppState, kind: &str, fields: &[(String, String)]) -> AppResult<CommandOutput> {
    let kind = EntityKind::parse(kind)?;
    let record = Record::from_fields(kind, fields)?;
    state.hotel_service.insert(&record)?;

    Ok(CommandOutput::Message(format!(
        "{} {} added",
        kind.title(),
        record.key()
    )))
}

pub fn update(
    state: &AppState,
    kind: &str,
    key: &str,
    field: &str,
    value: &str,
) -> AppResult<CommandOutput> {
    let record = state.hotel_service.update_field(kind, key, field, value)?;
    Ok(CommandOutput::Records(vec![record]))
}

pub fn delete(state: &AppState, kind: &str, key: &str) -> AppResult<CommandOutput> {
    let title = EntityKind::parse(kind)?.title();
    let message = match state.hotel_service.delete(kind, key)? {
        DeleteOutcome::Deleted => format!("{} {} deleted", title, key),
        DeleteOutcome::Missing => format!("No {} with key {}; nothing deleted", title, key),
    };
    Ok(CommandOutput::Message(message))
}

pub fn generate(state: &AppState, kind: &str, count: usize) -> AppResult<CommandOutput> {
    let records = state.hotel_service.generate(kind, count)?;

    let message = match (records.first(), records.last()) {
        (Some(first), Some(last)) => format!(
            "Generated {} {} record(s), keys {} .. {}",
            records.len(),
            first.kind().title(),
            first.key(),
            last.key()
        ),
        _ => "Generated 0 records".to_string(),
    };
    Ok(CommandOutput::Message(message))
}
