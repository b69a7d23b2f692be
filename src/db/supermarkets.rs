use crate::config::TableNames;
use crate::db::DbPool;
use crate::errors::{Error, Result};
use crate::models::Supermarket;
use rusqlite::{OptionalExtension, params};
use tracing::{debug, info, instrument};

/// Inserts a supermarket and echoes it back as a value object.
///
/// The name is the primary key; inserting a duplicate fails with a database
/// error. The returned object is built from the argument, not re-read from the
/// row.
///
/// # Errors
///
/// Returns `Error::Database` if the lock cannot be acquired, and
/// `Error::Rusqlite` on constraint violations or any other statement failure.
#[instrument(skip(pool, tables))]
pub async fn add_supermarket(
    pool: &DbPool,
    tables: &TableNames,
    name: &str,
) -> Result<Supermarket> {
    let mut conn = pool.lock().map_err(|_| {
        Error::Database("Failed to acquire DB lock for adding supermarket".to_string())
    })?;
    let tx = conn.transaction()?;
    let inserted = tx.execute(
        &format!("INSERT INTO {} (name) VALUES (?1)", tables.supermarket),
        params![name],
    )?;
    tx.commit()?;
    info!("Inserted supermarket '{}': {} row(s)", name, inserted);
    Ok(Supermarket {
        name: name.to_string(),
    })
}

/// Deletes a supermarket by name, returning the number of rows affected.
///
/// Deleting a nonexistent name is not an error; the count is simply 0.
#[instrument(skip(pool, tables))]
pub async fn delete_supermarket_by_name(
    pool: &DbPool,
    tables: &TableNames,
    name: &str,
) -> Result<usize> {
    let mut conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let tx = conn.transaction()?;
    let rows_affected = tx.execute(
        &format!("DELETE FROM {} WHERE name = ?1", tables.supermarket),
        params![name],
    )?;
    tx.commit()?;
    info!(
        "Attempted to delete supermarket by name '{}', rows affected: {}",
        name, rows_affected
    );
    Ok(rows_affected)
}

/// Fetches a supermarket by its unique name, `None` if not found.
#[instrument(skip(pool, tables))]
pub async fn get_supermarket_by_name(
    pool: &DbPool,
    tables: &TableNames,
    name: &str,
) -> Result<Option<Supermarket>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT name FROM {} WHERE name = ?1",
        tables.supermarket
    ))?;
    let result = stmt
        .query_row(params![name], |row| {
            Ok(Supermarket { name: row.get(0)? })
        })
        .optional()?;
    debug!("Supermarket lookup by name '{}': {}", name, result.is_some());
    Ok(result)
}

/// Lists every supermarket, ordered by name.
#[instrument(skip(pool, tables))]
pub async fn list_supermarkets(pool: &DbPool, tables: &TableNames) -> Result<Vec<Supermarket>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT name FROM {} ORDER BY name ASC",
        tables.supermarket
    ))?;
    let rows = stmt.query_map([], |row| Ok(Supermarket { name: row.get(0)? }))?;

    let mut supermarkets = Vec::new();
    for row in rows {
        supermarkets
            .push(row.map_err(|e| Error::Database(format!("Failed to map supermarket row: {}", e)))?);
    }
    debug!("Fetched {} supermarkets.", supermarkets.len());
    Ok(supermarkets)
}
