#![allow(dead_code)]
use crate::config::TableNames;
use crate::db::{DbPool, schema};
use crate::errors::{Error, Result};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

pub(crate) fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")),
        )
        .with_test_writer() // Crucial for `cargo test` output
        .try_init(); // Use try_init to avoid panic if already initialized
}

// Fresh in-memory database with the default table names, schema created.
pub(crate) async fn setup_test_db() -> Result<(DbPool, TableNames)> {
    let conn = Connection::open_in_memory()
        .map_err(|e| Error::Database(format!("Test DB: Failed to open in-memory: {}", e)))?;
    let tables = TableNames::default();
    schema::create_tables(&conn, &tables)?;
    Ok((Arc::new(Mutex::new(conn)), tables))
}

// Row count of an arbitrary table, for verification after deletes/clears.
pub(crate) fn count_rows(conn: &Connection, table: &str) -> Result<i64> {
    let count = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
        row.get(0)
    })?;
    Ok(count)
}

// Current value of the shared sequence without advancing it.
pub(crate) fn current_sequence_value(conn: &Connection, tables: &TableNames) -> Result<i64> {
    let value = conn.query_row(
        &format!("SELECT value FROM {}", tables.sequence),
        [],
        |row| row.get(0),
    )?;
    Ok(value)
}
