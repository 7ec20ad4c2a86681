// src/application/commands/parser.rs
//
// Shell line → Command
//
// Tokens are separated by whitespace; a double-quoted run is one token
// (quotes removed). Argument counts and numbers are checked here, names
// are resolved later by the service layer.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Kinds,
    Fields {
        kind: String,
    },
    Stats,
    Quit,
    List {
        kind: String,
    },
    Get {
        kind: String,
        key: String,
    },
    Range {
        kind: String,
        field: String,
        low: i64,
        high: i64,
        order_by: String,
    },
    Search {
        kind: String,
        field: String,
        order_by: String,
        pattern: String,
    },
    /// Empty `fields` means the shell should prompt for each field
    Add {
        kind: String,
        fields: Vec<(String, String)>,
    },
    Update {
        kind: String,
        key: String,
        field: String,
        value: String,
    },
    Delete {
        kind: String,
        key: String,
    },
    Generate {
        kind: String,
        count: usize,
    },
}

pub const USAGE: &[(&str, &str)] = &[
    ("help", "show this help"),
    ("kinds", "list entity kinds"),
    ("fields <kind>", "list the fields of a kind"),
    ("stats", "database size and row counts"),
    ("list <kind>", "show every record of a kind"),
    ("get <kind> <key>", "show one record"),
    (
        "range <kind> <field> <low> <high> <order_field>",
        "records with low <= field <= high",
    ),
    (
        "search <kind> <field> <order_field> <text...>",
        "records whose field contains text (any case)",
    ),
    ("add <kind> [field=value ...]", "insert a record (prompts when no fields are given)"),
    ("update <kind> <key> <field> <value...>", "change one field"),
    ("delete <kind> <key>", "remove a record"),
    ("generate <kind> <count>", "insert random records"),
    ("quit | exit", "leave the shell"),
];

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#""([^"]*)"|(\S+)"#).expect("token pattern is valid"))
}

/// Split a line into tokens, honouring double quotes
pub fn tokenize(line: &str) -> Vec<String> {
    token_pattern()
        .captures_iter(line)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
        .collect()
}

impl Command {
    /// Parse one shell line. Blank lines yield `None`.
    pub fn parse(line: &str) -> AppResult<Option<Command>> {
        let tokens = tokenize(line);
        match tokens.split_first() {
            Some((name, args)) => Self::from_tokens(name, args).map(Some),
            None => Ok(None),
        }
    }

    /// Parse a command already split into words (CLI arguments)
    pub fn from_args(args: &[String]) -> AppResult<Option<Command>> {
        match args.split_first() {
            Some((name, rest)) => Self::from_tokens(name, rest).map(Some),
            None => Ok(None),
        }
    }

    fn from_tokens(name: &str, args: &[String]) -> AppResult<Command> {
        let name = name.to_lowercase();
        let command = match (name.as_str(), args) {
            ("help" | "?", []) => Command::Help,
            ("kinds", []) => Command::Kinds,
            ("fields", [kind]) => Command::Fields { kind: kind.clone() },
            ("stats", []) => Command::Stats,
            ("quit" | "exit", []) => Command::Quit,
            ("list", [kind]) => Command::List { kind: kind.clone() },
            ("get", [kind, key]) => Command::Get {
                kind: kind.clone(),
                key: key.clone(),
            },
            ("range", [kind, field, low, high, order_by]) => Command::Range {
                kind: kind.clone(),
                field: field.clone(),
                low: parse_number(field, low)?,
                high: parse_number(field, high)?,
                order_by: order_by.clone(),
            },
            ("search", [kind, field, order_by, text @ ..]) if !text.is_empty() => {
                Command::Search {
                    kind: kind.clone(),
                    field: field.clone(),
                    order_by: order_by.clone(),
                    pattern: text.join(" "),
                }
            }
            ("add", [kind, pairs @ ..]) => Command::Add {
                kind: kind.clone(),
                fields: pairs
                    .iter()
                    .map(|pair| parse_assignment(pair))
                    .collect::<AppResult<Vec<_>>>()?,
            },
            ("update", [kind, key, field, value @ ..]) if !value.is_empty() => Command::Update {
                kind: kind.clone(),
                key: key.clone(),
                field: field.clone(),
                value: value.join(" "),
            },
            ("delete", [kind, key]) => Command::Delete {
                kind: kind.clone(),
                key: key.clone(),
            },
            ("generate", [kind, count]) => Command::Generate {
                kind: kind.clone(),
                count: count
                    .parse()
                    .map_err(|_| AppError::invalid_value("count", count.as_str(), "expected a non-negative integer"))?,
            },
            _ => return Err(usage_error(&name)),
        };
        Ok(command)
    }
}

fn parse_number(field: &str, raw: &str) -> AppResult<i64> {
    raw.parse()
        .map_err(|_| AppError::invalid_value(field, raw, "expected an integer"))
}

fn parse_assignment(pair: &str) -> AppResult<(String, String)> {
    pair.split_once('=')
        .map(|(field, value)| (field.trim().to_string(), value.to_string()))
        .filter(|(field, _)| !field.is_empty())
        .ok_or_else(|| AppError::InvalidCommand(format!("expected field=value, got '{}'", pair)))
}

fn usage_error(name: &str) -> AppError {
    match USAGE
        .iter()
        .find(|(usage, _)| usage.split_whitespace().next() == Some(name))
    {
        Some((usage, _)) => AppError::InvalidCommand(format!("usage: {}", usage)),
        None => AppError::InvalidCommand(format!("unknown command '{}'; type 'help'", name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        Command::parse(line).unwrap().unwrap()
    }

    #[test]
    fn test_tokenize_quotes() {
        assert_eq!(
            tokenize(r#"get order "1,2,2024-05-01 09:30:00"  "#),
            vec!["get", "order", "1,2,2024-05-01 09:30:00"]
        );
        assert_eq!(tokenize(r#"a "" b"#), vec!["a", "", "b"]);
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_blank_line_is_no_command() {
        assert_eq!(Command::parse("").unwrap(), None);
    }

    #[test]
    fn test_parse_queries() {
        assert_eq!(
            parse("range Room room_id 1 10 room_number"),
            Command::Range {
                kind: "Room".to_string(),
                field: "room_id".to_string(),
                low: 1,
                high: 10,
                order_by: "room_number".to_string(),
            }
        );
        assert_eq!(
            parse("search user name user_id Ol ena"),
            Command::Search {
                kind: "user".to_string(),
                field: "name".to_string(),
                order_by: "user_id".to_string(),
                pattern: "Ol ena".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_mutations() {
        assert_eq!(
            parse(r#"add user user_id=1 "name=Olena K" phone_number=380501112233"#),
            Command::Add {
                kind: "user".to_string(),
                fields: vec![
                    ("user_id".to_string(), "1".to_string()),
                    ("name".to_string(), "Olena K".to_string()),
                    ("phone_number".to_string(), "380501112233".to_string()),
                ],
            }
        );
        assert_eq!(
            parse("add room"),
            Command::Add {
                kind: "room".to_string(),
                fields: Vec::new(),
            }
        );
        assert_eq!(
            parse("update Room 1 check_in 2024-03-01 14:00:00"),
            Command::Update {
                kind: "Room".to_string(),
                key: "1".to_string(),
                field: "check_in".to_string(),
                value: "2024-03-01 14:00:00".to_string(),
            }
        );
        assert_eq!(
            parse("GENERATE users 5"),
            Command::Generate {
                kind: "users".to_string(),
                count: 5,
            }
        );
    }

    #[test]
    fn test_usage_errors() {
        assert!(matches!(
            Command::parse("range Room room_id 1"),
            Err(AppError::InvalidCommand(msg)) if msg.starts_with("usage: range")
        ));
        assert!(matches!(
            Command::parse("fly away"),
            Err(AppError::InvalidCommand(msg)) if msg.contains("unknown command 'fly'")
        ));
        assert!(matches!(
            Command::parse("generate user -3"),
            Err(AppError::InvalidValue { .. })
        ));
        assert!(matches!(
            Command::parse("range Room room_id low 10 room_id"),
            Err(AppError::InvalidValue { .. })
        ));
        assert!(matches!(
            Command::parse("add user name"),
            Err(AppError::InvalidCommand(_))
        ));
    }

    #[test]
    fn test_from_args() {
        let args: Vec<String> = vec!["list".into(), "rooms".into()];
        assert_eq!(
            Command::from_args(&args).unwrap(),
            Some(Command::List {
                kind: "rooms".to_string()
            })
        );
    }
}
