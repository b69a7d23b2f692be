use crate::config::TableNames;
use crate::db::schema::create_tables;
use crate::errors::{Error, Result};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument};

/// Shared handle to the underlying connection; one unit of work is a lock
/// acquisition plus (for writes) an explicit transaction.
pub type DbPool = Arc<Mutex<Connection>>;

#[instrument(skip(tables))]
pub async fn init_db(db_path: &str, tables: &TableNames) -> Result<DbPool> {
    debug!("Initializing database connection to: {}", db_path);
    let conn = Connection::open(db_path)
        .map_err(|e| Error::Database(format!("Failed to open database at {}: {}", db_path, e)))?;

    conn.execute("PRAGMA foreign_keys = ON;", [])
        .map_err(|e| Error::Database(format!("Failed to enable foreign keys: {}", e)))?;

    info!("Database connection opened. Ensuring tables are created...");
    create_tables(&conn, tables)?;

    Ok(Arc::new(Mutex::new(conn)))
}
