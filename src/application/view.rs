// src/application/view.rs
//
// Rendering of command output as text blocks or JSON

use serde_json::json;

use super::commands::CommandOutput;
use super::error_handling::ErrorResponse;
use super::state::OutputFormat;
use crate::db::DatabaseStats;
use crate::domain::{EntityDescriptor, FieldType, Record};
use crate::error::AppResult;

pub const EMPTY_SET: &str = "No data available to display.";

/// Render command output. `Quit` renders as nothing.
pub fn render(output: &CommandOutput, format: OutputFormat) -> AppResult<String> {
    match format {
        OutputFormat::Text => Ok(render_text(output)),
        OutputFormat::Json => render_json(output),
    }
}

pub fn render_error(error: &ErrorResponse, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => error.to_string(),
        OutputFormat::Json => {
            serde_json::to_string_pretty(error).unwrap_or_else(|_| error.to_string())
        }
    }
}

fn render_text(output: &CommandOutput) -> String {
    match output {
        CommandOutput::Records(records) => render_records(records),
        CommandOutput::Message(message) => message.clone(),
        CommandOutput::Stats(stats) => render_stats(stats),
        CommandOutput::Kinds(descriptors) => descriptors
            .iter()
            .map(|d| format!("{:<14} {}", d.kind.name(), d.title))
            .collect::<Vec<_>>()
            .join("\n"),
        CommandOutput::Fields(descriptor) => render_fields(descriptor),
        CommandOutput::Quit => String::new(),
    }
}

fn render_json(output: &CommandOutput) -> AppResult<String> {
    let value = match output {
        CommandOutput::Records(records) => serde_json::to_value(records)?,
        CommandOutput::Message(message) => json!({ "message": message }),
        CommandOutput::Stats(stats) => serde_json::to_value(stats)?,
        CommandOutput::Kinds(descriptors) => serde_json::to_value(descriptors)?,
        CommandOutput::Fields(descriptor) => serde_json::to_value(descriptor)?,
        CommandOutput::Quit => return Ok(String::new()),
    };
    Ok(serde_json::to_string_pretty(&value)?)
}

/// One block per record, `Label: value` per line, blank line between
/// blocks.
pub fn render_records(records: &[Record]) -> String {
    if records.is_empty() {
        return EMPTY_SET.to_string();
    }

    records
        .iter()
        .map(render_record)
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn render_record(record: &Record) -> String {
    record
        .fields()
        .iter()
        .map(|(field, value)| format!("{}: {}", field.label, value))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_stats(stats: &DatabaseStats) -> String {
    let mut lines = vec![format!(
        "Database size: {} bytes ({} pages of {} bytes)",
        stats.size_bytes, stats.page_count, stats.page_size
    )];
    lines.extend(
        stats
            .tables
            .iter()
            .map(|t| format!("{}: {} row(s)", t.kind.title(), t.rows)),
    );
    lines.join("\n")
}

fn render_fields(descriptor: &EntityDescriptor) -> String {
    let mut lines = vec![format!("{} ({})", descriptor.title, descriptor.table)];
    lines.extend(descriptor.fields.iter().map(|field| {
        let mut flags = vec![match field.field_type {
            FieldType::Integer => "integer",
            FieldType::Text => "text",
            FieldType::Timestamp => "timestamp",
        }];
        if field.key {
            flags.push("key");
        }
        if field.nullable {
            flags.push("optional");
        }
        if !field.mutable {
            flags.push("read-only");
        }
        format!("  {:<14} {:<16} {}", field.name, field.label, flags.join(", "))
    }));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EntityKind, Room, RoomType, ServiceOrder, User};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_empty_set() {
        assert_eq!(render_records(&[]), EMPTY_SET);
        assert_eq!(
            render(&CommandOutput::Records(Vec::new()), OutputFormat::Text).unwrap(),
            "No data available to display."
        );
    }

    #[test]
    fn test_record_blocks() {
        let records = vec![
            Record::RoomType(RoomType::new(1, "Standard", Some(100))),
            Record::RoomType(RoomType::new(2, "Suite", None)),
        ];

        assert_eq!(
            render_records(&records),
            "Room Type ID: 1\nType Name: Standard\nPrice: 100\n\n\
             Room Type ID: 2\nType Name: Suite\nPrice: none"
        );
    }

    #[test]
    fn test_timestamps_and_null_occupant() {
        let mut room = Room::new(1, 101, 1);
        room.check_in = Some(Utc.with_ymd_and_hms(2024, 3, 1, 14, 0, 0).unwrap());

        let text = render_record(&Record::Room(room));
        assert!(text.contains("Check-in Date: 2024-03-01 14:00:00 UTC"));
        assert!(text.contains("Check-out Date: none"));
    }

    #[test]
    fn test_json_records() {
        let output = CommandOutput::Records(vec![Record::User(User::new(1, "Ann", "380"))]);
        let json = render(&output, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["kind"], "user");
        assert_eq!(value[0]["name"], "Ann");
    }

    #[test]
    fn test_json_service_order_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let output = CommandOutput::Records(vec![Record::ServiceOrder(ServiceOrder::new(1, 2, at))]);
        let json = render(&output, OutputFormat::Json).unwrap();
        assert!(json.contains("2024-05-01T09:30:00Z"));
    }

    #[test]
    fn test_fields_listing() {
        let text = render_text(&CommandOutput::Fields(EntityKind::Room.descriptor()));
        assert!(text.starts_with("Room (rooms)"));
        assert!(text.contains("room_id"));
        assert!(text.contains("integer, key, read-only"));
        assert!(text.contains("timestamp, optional"));
    }
}
