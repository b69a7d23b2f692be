use crate::config::TableNames;
use crate::db::{DbPool, RESTOCK_DELTA};
use crate::db::sequence::next_id;
use crate::errors::{Error, Result};
use crate::models::Warehouse;
use rusqlite::{OptionalExtension, Row, params};
use tracing::{debug, info, instrument};

fn warehouse_from_row(row: &Row<'_>) -> rusqlite::Result<Warehouse> {
    Ok(Warehouse {
        id: row.get(0)?,
        volume_capacity: row.get(1)?,
        weight_capacity: row.get(2)?,
        stock: row.get(3)?,
        product_id: row.get(4)?,
        branch_id: row.get(5)?,
    })
}

const WAREHOUSE_COLUMNS: &str =
    "id, volume_capacity, weight_capacity, stock, product_id, branch_id";

/// Inserts a warehouse with a freshly generated id and echoes it back.
#[instrument(skip(pool, tables))]
pub async fn add_warehouse(
    pool: &DbPool,
    tables: &TableNames,
    volume_capacity: f64,
    weight_capacity: f64,
    stock: i64,
    product_id: i64,
    branch_id: i64,
) -> Result<Warehouse> {
    let mut conn = pool.lock().map_err(|_| {
        Error::Database("Failed to acquire DB lock for adding warehouse".to_string())
    })?;
    let tx = conn.transaction()?;
    let id = next_id(&tx, tables)?;
    let inserted = tx.execute(
        &format!(
            "INSERT INTO {} ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            tables.warehouse, WAREHOUSE_COLUMNS
        ),
        params![id, volume_capacity, weight_capacity, stock, product_id, branch_id],
    )?;
    tx.commit()?;
    info!("Inserted warehouse id {}: {} row(s)", id, inserted);
    Ok(Warehouse {
        id,
        volume_capacity,
        weight_capacity,
        stock,
        product_id,
        branch_id,
    })
}

/// Deletes a warehouse by id, returning the number of rows affected.
#[instrument(skip(pool, tables))]
pub async fn delete_warehouse_by_id(pool: &DbPool, tables: &TableNames, id: i64) -> Result<usize> {
    let mut conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let tx = conn.transaction()?;
    let rows_affected = tx.execute(
        &format!("DELETE FROM {} WHERE id = ?1", tables.warehouse),
        params![id],
    )?;
    tx.commit()?;
    info!("Deleted warehouse id {}: {} row(s)", id, rows_affected);
    Ok(rows_affected)
}

/// Fetches a warehouse by id, `None` if not found.
#[instrument(skip(pool, tables))]
pub async fn get_warehouse_by_id(
    pool: &DbPool,
    tables: &TableNames,
    id: i64,
) -> Result<Option<Warehouse>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {} FROM {} WHERE id = ?1",
        WAREHOUSE_COLUMNS, tables.warehouse
    ))?;
    let result = stmt
        .query_row(params![id], |row| warehouse_from_row(row))
        .optional()?;
    debug!("Warehouse lookup by id {}: {}", id, result.is_some());
    Ok(result)
}

/// Lists the warehouses of a branch.
#[instrument(skip(pool, tables))]
pub async fn list_warehouses_by_branch(
    pool: &DbPool,
    tables: &TableNames,
    branch_id: i64,
) -> Result<Vec<Warehouse>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {} FROM {} WHERE branch_id = ?1 ORDER BY id ASC",
        WAREHOUSE_COLUMNS, tables.warehouse
    ))?;
    let rows = stmt.query_map(params![branch_id], |row| warehouse_from_row(row))?;
    let warehouses = rows
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| Error::Database(format!("Failed to map warehouse row: {}", e)))?;
    debug!(
        "Fetched {} warehouses for branch {}.",
        warehouses.len(),
        branch_id
    );
    Ok(warehouses)
}

/// Lists every warehouse.
#[instrument(skip(pool, tables))]
pub async fn list_warehouses(pool: &DbPool, tables: &TableNames) -> Result<Vec<Warehouse>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {} FROM {} ORDER BY id ASC",
        WAREHOUSE_COLUMNS, tables.warehouse
    ))?;
    let rows = stmt.query_map([], |row| warehouse_from_row(row))?;
    let warehouses = rows
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| Error::Database(format!("Failed to map warehouse row: {}", e)))?;
    Ok(warehouses)
}

/// Adds the fixed restock delta (10 units) to one warehouse's stock.
///
/// Isolated UPDATE: no transaction beyond the statement, no capacity check.
/// Returns the number of rows affected (0 when the id does not exist).
#[instrument(skip(pool, tables))]
pub async fn restock_warehouse(pool: &DbPool, tables: &TableNames, id: i64) -> Result<usize> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let rows_affected = conn.execute(
        &format!(
            "UPDATE {} SET stock = stock + {} WHERE id = ?1",
            tables.warehouse, RESTOCK_DELTA
        ),
        params![id],
    )?;
    info!("Restocked warehouse id {}: {} row(s)", id, rows_affected);
    Ok(rows_affected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::{init_test_tracing, setup_test_db};
    use crate::errors::Result;

    #[tokio::test]
    async fn test_add_get_delete_warehouse() -> Result<()> {
        init_test_tracing();
        let (pool, tables) = setup_test_db().await?;

        let wh = add_warehouse(&pool, &tables, 120.5, 4000.0, 35, 7, 3).await?;
        assert!(wh.id > 0);
        assert_eq!(wh.volume_capacity, 120.5);
        assert_eq!(wh.weight_capacity, 4000.0);
        assert_eq!(wh.stock, 35);
        assert_eq!(wh.product_id, 7);
        assert_eq!(wh.branch_id, 3);

        assert_eq!(get_warehouse_by_id(&pool, &tables, wh.id).await?, Some(wh.clone()));

        assert_eq!(delete_warehouse_by_id(&pool, &tables, wh.id).await?, 1);
        assert_eq!(delete_warehouse_by_id(&pool, &tables, wh.id).await?, 0);
        assert!(get_warehouse_by_id(&pool, &tables, wh.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_restock_adds_exactly_ten_to_one_row() -> Result<()> {
        init_test_tracing();
        let (pool, tables) = setup_test_db().await?;

        let a = add_warehouse(&pool, &tables, 10.0, 10.0, 5, 1, 1).await?;
        let b = add_warehouse(&pool, &tables, 10.0, 10.0, 50, 1, 1).await?;

        assert_eq!(restock_warehouse(&pool, &tables, a.id).await?, 1);

        let a_after = get_warehouse_by_id(&pool, &tables, a.id).await?.unwrap();
        let b_after = get_warehouse_by_id(&pool, &tables, b.id).await?.unwrap();
        assert_eq!(a_after.stock, 15);
        assert_eq!(b_after.stock, 50, "Only the targeted row changes");

        // Nonexistent id: no rows affected, no error
        assert_eq!(restock_warehouse(&pool, &tables, 999_999).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_warehouses_by_branch() -> Result<()> {
        init_test_tracing();
        let (pool, tables) = setup_test_db().await?;

        add_warehouse(&pool, &tables, 1.0, 1.0, 1, 1, 10).await?;
        add_warehouse(&pool, &tables, 2.0, 2.0, 2, 2, 10).await?;
        add_warehouse(&pool, &tables, 3.0, 3.0, 3, 3, 20).await?;

        assert_eq!(list_warehouses_by_branch(&pool, &tables, 10).await?.len(), 2);
        assert_eq!(list_warehouses_by_branch(&pool, &tables, 20).await?.len(), 1);
        assert!(list_warehouses_by_branch(&pool, &tables, 30).await?.is_empty());
        assert_eq!(list_warehouses(&pool, &tables).await?.len(), 3);
        Ok(())
    }
}
