// src/application/shell.rs
//
// Interactive shell
//
// Reads commands line by line until EOF or `quit`. A failing command
// prints its error and the loop continues.

use std::io::{BufRead, Write};

use super::commands::{execute, Command, CommandOutput};
use super::error_handling::ErrorResponse;
use super::state::AppState;
use super::view::{render, render_error};
use crate::domain::EntityKind;
use crate::error::{AppError, AppResult};

pub const PROMPT: &str = "hoteldb> ";

/// Result of running one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Output(String),
    Failed(String),
    Quit,
}

/// Execute and render one command
pub fn respond(state: &AppState, command: &Command) -> Reply {
    let rendered = execute(state, command).and_then(|output| match output {
        CommandOutput::Quit => Ok(None),
        output => render(&output, state.format).map(Some),
    });

    match rendered {
        Ok(Some(text)) => Reply::Output(text),
        Ok(None) => Reply::Quit,
        Err(e) => Reply::Failed(render_error(&ErrorResponse::from_app_error(e), state.format)),
    }
}

pub fn run<R: BufRead, W: Write>(state: &AppState, input: R, output: &mut W) -> AppResult<()> {
    let mut lines = input.lines();
    log::debug!("Shell started");

    loop {
        write!(output, "{}", PROMPT)?;
        output.flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => {
                writeln!(output)?;
                break;
            }
        };

        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                print_error(state, output, e)?;
                continue;
            }
        };

        let command = match command {
            Command::Add { kind, fields } if fields.is_empty() => {
                match prompt_fields(&kind, &mut lines, output) {
                    Ok(Some(fields)) => Command::Add { kind, fields },
                    Ok(None) => break,
                    Err(e) => {
                        print_error(state, output, e)?;
                        continue;
                    }
                }
            }
            other => other,
        };

        match respond(state, &command) {
            Reply::Output(text) => writeln!(output, "{}", text)?,
            Reply::Failed(text) => writeln!(output, "{}", text)?,
            Reply::Quit => break,
        }
    }

    log::debug!("Shell finished");
    Ok(())
}

fn print_error<W: Write>(state: &AppState, output: &mut W, error: AppError) -> AppResult<()> {
    let response = ErrorResponse::from_app_error(error);
    writeln!(output, "{}", render_error(&response, state.format))?;
    Ok(())
}

/// Ask for every field of `kind` in declaration order. Blank answers
/// leave optional fields unset. Returns `None` when input ends.
fn prompt_fields<I, W>(
    kind: &str,
    lines: &mut I,
    output: &mut W,
) -> AppResult<Option<Vec<(String, String)>>>
where
    I: Iterator<Item = std::io::Result<String>>,
    W: Write,
{
    let descriptor = EntityKind::parse(kind)?.descriptor();
    let mut fields = Vec::with_capacity(descriptor.fields.len());

    for field in descriptor.fields {
        let hint = if field.nullable { ", optional" } else { "" };
        write!(output, "{} ({}{}): ", field.label, field.name, hint)?;
        output.flush()?;

        let answer = match lines.next() {
            Some(line) => line?,
            None => return Ok(None),
        };
        let answer = answer.trim();

        if answer.is_empty() && field.nullable {
            continue;
        }
        fields.push((field.name.to_string(), answer.to_string()));
    }

    Ok(Some(fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::state::OutputFormat;
    use crate::db::{create_memory_pool, initialize_database, with_connection};
    use crate::services::HotelService;
    use std::io::Cursor;
    use std::sync::Arc;

    fn state(format: OutputFormat) -> AppState {
        let pool = create_memory_pool().unwrap();
        with_connection(&pool, |conn| initialize_database(conn)).unwrap();
        AppState::new(Arc::new(HotelService::new(Arc::new(pool))), format)
    }

    fn session(state: &AppState, script: &str) -> String {
        let mut output = Vec::new();
        run(state, Cursor::new(script), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_session_scenario() {
        let state = state(OutputFormat::Text);
        let transcript = session(
            &state,
            "add roomtype room_type_id=1 label=Standard base_price=100\n\
             add room room_id=1 room_number=101 room_type_id=1\n\
             list room\n\
             quit\n\
             list room\n",
        );

        assert!(transcript.contains("Room type 1 added"));
        assert!(transcript.contains(
            "Room ID: 1\nRoom Number: 101\nRoom Type ID: 1\nUser ID: none\n\
             Check-in Date: none\nCheck-out Date: none"
        ));
        // Nothing after quit runs.
        assert_eq!(transcript.matches("Room ID: 1").count(), 1);
    }

    #[test]
    fn test_errors_do_not_end_the_session() {
        let state = state(OutputFormat::Text);
        let transcript = session(&state, "list spaceship\nfrobnicate\n\nlist user\n");

        assert!(transcript.contains("Error (invalid input): Unknown entity kind: spaceship"));
        assert!(transcript.contains("unknown command 'frobnicate'"));
        assert!(transcript.contains("No data available to display."));
    }

    #[test]
    fn test_add_prompts_for_fields() {
        let state = state(OutputFormat::Text);
        let transcript = session(
            &state,
            "add roomtype\n3\nDeluxe\n\nget roomtype 3\n",
        );

        assert!(transcript.contains("Room Type ID (room_type_id): "));
        assert!(transcript.contains("Price (base_price, optional): "));
        assert!(transcript.contains("Room type 3 added"));
        assert!(transcript.contains("Type Name: Deluxe\nPrice: none"));
    }

    #[test]
    fn test_prompt_stops_at_end_of_input() {
        let state = state(OutputFormat::Text);
        session(&state, "add user\n1\nAnn\n");
        assert!(state.hotel_service.fetch_all("user").unwrap().is_empty());
    }

    #[test]
    fn test_json_replies() {
        let state = state(OutputFormat::Json);

        let reply = respond(&state, &Command::Delete {
            kind: "user".to_string(),
            key: "4".to_string(),
        });
        match reply {
            Reply::Output(text) => assert!(text.contains("\"message\"")),
            other => panic!("unexpected {:?}", other),
        }

        let reply = respond(&state, &Command::Generate {
            kind: "room".to_string(),
            count: 2,
        });
        match reply {
            Reply::Failed(text) => assert!(text.contains("\"error_type\": \"precondition\"")),
            other => panic!("unexpected {:?}", other),
        }

        assert_eq!(respond(&state, &Command::Quit), Reply::Quit);
    }
}
