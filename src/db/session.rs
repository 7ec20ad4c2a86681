// src/db/session.rs
//
// Scoped sessions
//
// Each data operation checks out its own connection for the duration of
// one closure. Writes run inside a transaction that commits only when
// the closure returns Ok; any error drops the transaction, which rolls
// it back, so a failed call never leaves an open transaction behind.

use rusqlite::{Connection, Transaction};

use super::connection::{get_connection, ConnectionPool};
use crate::error::AppResult;

/// Run a read-only closure on a pooled connection
pub fn with_connection<T, F>(pool: &ConnectionPool, f: F) -> AppResult<T>
where
    F: FnOnce(&Connection) -> AppResult<T>,
{
    let conn = get_connection(pool)?;
    f(&conn)
}

/// Run a closure inside a transaction, committing on success
pub fn with_transaction<T, F>(pool: &ConnectionPool, f: F) -> AppResult<T>
where
    F: FnOnce(&Transaction<'_>) -> AppResult<T>,
{
    let mut conn = get_connection(pool)?;
    let tx = conn.transaction()?;
    let value = f(&tx)?;
    tx.commit()?;
    Ok(value)
}
