// src/db/mod.rs
//
// Database module
//
// Provides:
// - Connection pooling
// - Schema initialization
// - Scoped connections and transactions
// - Database utilities

pub mod connection;
pub mod migrations;
pub mod session;

pub use connection::{
    create_connection_pool, create_memory_pool, get_connection, get_database_path,
    ConnectionPool, PooledConn,
};

pub use migrations::{
    get_database_stats, initialize_database, verify_database_integrity, DatabaseStats, TableCount,
};

pub use session::{with_connection, with_transaction};
