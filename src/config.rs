// src/config.rs
//
// Process configuration
//
// Precedence, lowest first: built-in defaults, `.env` (loaded by the
// binary), environment variables, command-line overrides.

use std::path::PathBuf;

use crate::error::{AppError, AppResult};

pub const DATABASE_ENV: &str = "HOTELDB_DATABASE";
pub const POOL_SIZE_ENV: &str = "HOTELDB_POOL_SIZE";

/// Spelling that selects a private in-memory database
pub const MEMORY_DATABASE: &str = ":memory:";

const DEFAULT_POOL_SIZE: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    File(PathBuf),
    Memory,
}

impl DatabaseLocation {
    pub fn parse(raw: &str) -> AppResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(AppError::Config("database location is empty".to_string()));
        }
        if raw == MEMORY_DATABASE {
            return Ok(DatabaseLocation::Memory);
        }
        let path = raw.strip_prefix("sqlite://").unwrap_or(raw);
        Ok(DatabaseLocation::File(PathBuf::from(path)))
    }
}

impl std::fmt::Display for DatabaseLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatabaseLocation::File(path) => write!(f, "{}", path.display()),
            DatabaseLocation::Memory => write!(f, "{}", MEMORY_DATABASE),
        }
    }
}

/// Values given on the command line; they win over the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub database: Option<String>,
    pub pool_size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub location: DatabaseLocation,
    pub pool_size: u32,
}

impl DatabaseConfig {
    pub fn memory() -> Self {
        Self {
            location: DatabaseLocation::Memory,
            pool_size: 1,
        }
    }

    /// Resolve configuration from the process environment
    pub fn from_env(overrides: &Overrides) -> AppResult<Self> {
        Self::resolve(|key| std::env::var(key).ok(), overrides)
    }

    /// Resolve configuration from an arbitrary variable lookup
    pub fn resolve<F>(lookup: F, overrides: &Overrides) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let location = match overrides.database.clone().or_else(|| lookup(DATABASE_ENV)) {
            Some(raw) => DatabaseLocation::parse(&raw)?,
            None => DatabaseLocation::File(crate::db::get_database_path()?),
        };

        let pool_size = match overrides.pool_size {
            Some(size) => size,
            None => match lookup(POOL_SIZE_ENV) {
                Some(raw) => raw.trim().parse::<u32>().map_err(|e| {
                    AppError::Config(format!("{} must be a positive integer: {}", POOL_SIZE_ENV, e))
                })?,
                None => DEFAULT_POOL_SIZE,
            },
        };

        if pool_size == 0 {
            return Err(AppError::Config(format!("{} must be at least 1", POOL_SIZE_ENV)));
        }

        // An in-memory database lives in one connection; a larger pool
        // would hand out unrelated empty databases.
        let pool_size = match location {
            DatabaseLocation::Memory => 1,
            DatabaseLocation::File(_) => pool_size,
        };

        Ok(Self {
            location,
            pool_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_environment_values() {
        let config = DatabaseConfig::resolve(
            lookup(&[(DATABASE_ENV, "/tmp/hotel.db"), (POOL_SIZE_ENV, "8")]),
            &Overrides::default(),
        )
        .unwrap();

        assert_eq!(config.location, DatabaseLocation::File(PathBuf::from("/tmp/hotel.db")));
        assert_eq!(config.pool_size, 8);
    }

    #[test]
    fn test_overrides_win() {
        let overrides = Overrides {
            database: Some(":memory:".to_string()),
            pool_size: Some(3),
        };
        let config =
            DatabaseConfig::resolve(lookup(&[(DATABASE_ENV, "/tmp/hotel.db")]), &overrides).unwrap();

        assert_eq!(config.location, DatabaseLocation::Memory);
        assert_eq!(config.pool_size, 1);
    }

    #[test]
    fn test_sqlite_url_prefix_is_stripped() {
        assert_eq!(
            DatabaseLocation::parse("sqlite://data/hotel.db").unwrap(),
            DatabaseLocation::File(PathBuf::from("data/hotel.db"))
        );
    }

    #[test]
    fn test_invalid_pool_size() {
        let result = DatabaseConfig::resolve(
            lookup(&[(DATABASE_ENV, ":memory:"), (POOL_SIZE_ENV, "0")]),
            &Overrides::default(),
        );
        assert!(matches!(result, Err(AppError::Config(_))));

        let result = DatabaseConfig::resolve(
            lookup(&[(DATABASE_ENV, ":memory:"), (POOL_SIZE_ENV, "many")]),
            &Overrides::default(),
        );
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
