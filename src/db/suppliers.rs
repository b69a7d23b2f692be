use crate::config::TableNames;
use crate::db::DbPool;
use crate::db::sequence::next_id;
use crate::errors::{Error, Result};
use crate::models::Supplier;
use rusqlite::{Row, params};
use tracing::{debug, info, instrument};

fn supplier_from_row(row: &Row<'_>) -> rusqlite::Result<Supplier> {
    Ok(Supplier {
        nit: row.get(0)?,
        name: row.get(1)?,
        rating: row.get(2)?,
    })
}

/// Inserts a supplier with a freshly generated nit and echoes it back.
#[instrument(skip(pool, tables))]
pub async fn add_supplier(
    pool: &DbPool,
    tables: &TableNames,
    name: &str,
    rating: i64,
) -> Result<Supplier> {
    let mut conn = pool.lock().map_err(|_| {
        Error::Database("Failed to acquire DB lock for adding supplier".to_string())
    })?;
    let tx = conn.transaction()?;
    let nit = next_id(&tx, tables)?;
    let inserted = tx.execute(
        &format!(
            "INSERT INTO {} (nit, name, rating) VALUES (?1, ?2, ?3)",
            tables.supplier
        ),
        params![nit, name, rating],
    )?;
    tx.commit()?;
    info!(
        "Inserted supplier '{}' (nit {}): {} row(s)",
        name, nit, inserted
    );
    Ok(Supplier {
        nit,
        name: name.to_string(),
        rating,
    })
}

/// Deletes every supplier with the given (non-unique) name.
#[instrument(skip(pool, tables))]
pub async fn delete_suppliers_by_name(
    pool: &DbPool,
    tables: &TableNames,
    name: &str,
) -> Result<usize> {
    let mut conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let tx = conn.transaction()?;
    let rows_affected = tx.execute(
        &format!("DELETE FROM {} WHERE name = ?1", tables.supplier),
        params![name],
    )?;
    tx.commit()?;
    info!("Deleted suppliers named '{}': {} row(s)", name, rows_affected);
    Ok(rows_affected)
}

/// Deletes a supplier by nit, returning the number of rows affected.
#[instrument(skip(pool, tables))]
pub async fn delete_supplier_by_nit(pool: &DbPool, tables: &TableNames, nit: i64) -> Result<usize> {
    let mut conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let tx = conn.transaction()?;
    let rows_affected = tx.execute(
        &format!("DELETE FROM {} WHERE nit = ?1", tables.supplier),
        params![nit],
    )?;
    tx.commit()?;
    info!("Deleted supplier nit {}: {} row(s)", nit, rows_affected);
    Ok(rows_affected)
}

/// Lists every supplier with the given name (names are not unique).
#[instrument(skip(pool, tables))]
pub async fn list_suppliers_by_name(
    pool: &DbPool,
    tables: &TableNames,
    name: &str,
) -> Result<Vec<Supplier>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT nit, name, rating FROM {} WHERE name = ?1 ORDER BY nit ASC",
        tables.supplier
    ))?;
    let rows = stmt.query_map(params![name], |row| supplier_from_row(row))?;
    let suppliers = rows
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| Error::Database(format!("Failed to map supplier row: {}", e)))?;
    debug!("Fetched {} suppliers named '{}'.", suppliers.len(), name);
    Ok(suppliers)
}

/// Lists every supplier.
#[instrument(skip(pool, tables))]
pub async fn list_suppliers(pool: &DbPool, tables: &TableNames) -> Result<Vec<Supplier>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT nit, name, rating FROM {} ORDER BY nit ASC",
        tables.supplier
    ))?;
    let rows = stmt.query_map([], |row| supplier_from_row(row))?;
    let suppliers = rows
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| Error::Database(format!("Failed to map supplier row: {}", e)))?;
    Ok(suppliers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::{init_test_tracing, setup_test_db};
    use crate::errors::Result;

    #[tokio::test]
    async fn test_supplier_lifecycle() -> Result<()> {
        init_test_tracing();
        let (pool, tables) = setup_test_db().await?;

        // Create: the returned object echoes the arguments
        let supplier = add_supplier(&pool, &tables, "Acme", 5).await?;
        assert!(supplier.nit > 0);
        assert_eq!(supplier.name, "Acme");
        assert_eq!(supplier.rating, 5);

        // Delete by the generated nit: exactly one row
        assert_eq!(delete_supplier_by_nit(&pool, &tables, supplier.nit).await?, 1);

        // Subsequent lookups find nothing
        assert!(list_suppliers_by_name(&pool, &tables, "Acme").await?.is_empty());
        assert_eq!(delete_supplier_by_nit(&pool, &tables, supplier.nit).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_suppliers_by_name_non_unique() -> Result<()> {
        init_test_tracing();
        let (pool, tables) = setup_test_db().await?;

        add_supplier(&pool, &tables, "Dupe", 1).await?;
        add_supplier(&pool, &tables, "Dupe", 2).await?;
        add_supplier(&pool, &tables, "Keep", 3).await?;

        assert_eq!(delete_suppliers_by_name(&pool, &tables, "Dupe").await?, 2);
        let remaining = list_suppliers(&pool, &tables).await?;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "Keep");
        Ok(())
    }
}
