// src/db/connection.rs
//
// Database connection management
//
// PRINCIPLES:
// - Explicit connection pooling
// - No hidden connection creation
// - Clear error propagation
// - Every connection gets the same pragmas and SQL functions

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;
use std::path::PathBuf;

use crate::config::{DatabaseConfig, DatabaseLocation};
use crate::error::{AppError, AppResult};

/// Type alias for connection pool
pub type ConnectionPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled connection
pub type PooledConn = PooledConnection<SqliteConnectionManager>;

/// Default database file path
///
/// Path structure: {APP_DATA}/hoteldb/hoteldb.db
pub fn get_database_path() -> AppResult<PathBuf> {
    let app_data_dir = dirs::data_dir()
        .ok_or_else(|| AppError::Config("Could not determine app data directory".to_string()))?;

    Ok(app_data_dir.join("hoteldb").join("hoteldb.db"))
}

/// Create a connection pool
///
/// Per-connection setup:
/// - Foreign keys enabled (RESTRICT on delete relies on it)
/// - WAL journal for file databases
/// - Busy timeout set to avoid immediate errors
/// - `casefold()` registered for case-insensitive search
pub fn create_connection_pool(config: &DatabaseConfig) -> AppResult<ConnectionPool> {
    let manager = match &config.location {
        DatabaseLocation::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            SqliteConnectionManager::file(path).with_init(|conn| {
                conn.execute_batch(
                    "PRAGMA journal_mode = WAL;
                     PRAGMA synchronous = NORMAL;",
                )?;
                configure_connection(conn)
            })
        }
        DatabaseLocation::Memory => SqliteConnectionManager::memory().with_init(configure_connection),
    };

    let pool_size = match config.location {
        DatabaseLocation::Memory => 1,
        DatabaseLocation::File(_) => config.pool_size.max(1),
    };

    let pool = Pool::builder()
        .max_size(pool_size)
        .build(manager)
        .map_err(|e| AppError::Pool(format!("Failed to create connection pool: {}", e)))?;

    log::debug!(
        "connection pool ready for {} ({} connection(s))",
        config.location,
        pool_size
    );

    Ok(pool)
}

/// Single-connection in-memory pool, used by tests and `:memory:`
pub fn create_memory_pool() -> AppResult<ConnectionPool> {
    create_connection_pool(&DatabaseConfig::memory())
}

/// Get a connection from the pool
///
/// This is a convenience wrapper that provides better error messages.
pub fn get_connection(pool: &ConnectionPool) -> AppResult<PooledConn> {
    pool.get()
        .map_err(|e| AppError::Pool(format!("Failed to get database connection: {}", e)))
}

fn configure_connection(conn: &mut Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = 5000;",
    )?;

    conn.create_scalar_function(
        "casefold",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        },
    )
}
