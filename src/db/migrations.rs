// src/db/migrations.rs
//
// Database schema initialization
//
// PRINCIPLES:
// - Explicit schema versions
// - No automatic migrations
// - Clear error messages
// - Idempotent operations

use rusqlite::Connection;
use serde::Serialize;

use crate::domain::EntityKind;
use crate::error::{AppError, AppResult};

/// Current schema version
const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema
///
/// Fresh databases get the full schema; an existing database must already
/// be at the current version. Safe to call multiple times.
pub fn initialize_database(conn: &Connection) -> AppResult<()> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        apply_initial_schema(conn)?;
        set_schema_version(conn, CURRENT_SCHEMA_VERSION)?;
        log::info!("created schema version {}", CURRENT_SCHEMA_VERSION);
    } else if current_version < CURRENT_SCHEMA_VERSION {
        return Err(AppError::Config(format!(
            "Schema version {} is outdated. Expected {}. Manual migration required.",
            current_version, CURRENT_SCHEMA_VERSION
        )));
    } else if current_version > CURRENT_SCHEMA_VERSION {
        return Err(AppError::Config(format!(
            "Schema version {} is newer than supported {}. Update the application.",
            current_version, CURRENT_SCHEMA_VERSION
        )));
    } else {
        log::debug!("schema version {} already present", current_version);
    }

    Ok(())
}

/// Get current schema version
/// Returns 0 if schema_version table doesn't exist (fresh database)
fn get_schema_version(conn: &Connection) -> AppResult<i32> {
    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;

    if !table_exists {
        return Ok(0);
    }

    let version: Option<i32> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;

    Ok(version.unwrap_or(0))
}

fn set_schema_version(conn: &Connection, version: i32) -> AppResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?1, datetime('now'))",
        [version],
    )?;

    Ok(())
}

fn apply_initial_schema(conn: &Connection) -> AppResult<()> {
    let schema = include_str!("../../schema.sql");

    conn.execute_batch(schema)
        .map_err(|e| AppError::Config(format!("Failed to apply initial schema: {}", e)))?;

    Ok(())
}

/// Verify database integrity
///
/// Runs SQLite's integrity check and the foreign key check.
pub fn verify_database_integrity(conn: &Connection) -> AppResult<()> {
    let result: String = conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;

    if result != "ok" {
        return Err(AppError::Config(format!(
            "Database integrity check failed: {}",
            result
        )));
    }

    let mut stmt = conn.prepare("PRAGMA foreign_key_check")?;
    let dangling = stmt.query_map([], |row| row.get::<_, String>(0))?.count();
    if dangling > 0 {
        return Err(AppError::ConstraintViolation(format!(
            "{} row(s) reference missing records",
            dangling
        )));
    }

    Ok(())
}

/// Row count for one entity kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableCount {
    pub kind: EntityKind,
    pub rows: i64,
}

/// Database size and per-kind row counts
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseStats {
    pub size_bytes: i64,
    pub page_count: i64,
    pub page_size: i64,
    pub tables: Vec<TableCount>,
}

impl DatabaseStats {
    pub fn rows(&self, kind: EntityKind) -> i64 {
        self.tables
            .iter()
            .find(|t| t.kind == kind)
            .map(|t| t.rows)
            .unwrap_or(0)
    }
}

/// Get database statistics
pub fn get_database_stats(conn: &Connection) -> AppResult<DatabaseStats> {
    let page_count: i64 = conn.query_row("PRAGMA page_count", [], |row| row.get(0))?;
    let page_size: i64 = conn.query_row("PRAGMA page_size", [], |row| row.get(0))?;

    let tables = EntityKind::ALL
        .iter()
        .map(|&kind| {
            let sql = format!("SELECT COUNT(*) FROM {}", kind.descriptor().table);
            let rows: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
            Ok(TableCount { kind, rows })
        })
        .collect::<AppResult<Vec<_>>>()?;

    Ok(DatabaseStats {
        size_bytes: page_count * page_size,
        page_count,
        page_size,
        tables,
    })
}
