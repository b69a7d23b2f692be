use crate::config::TableNames;
use crate::db::{DbPool, RESTOCK_DELTA};
use crate::db::sequence::next_id;
use crate::errors::{Error, Result};
use crate::models::Shelf;
use rusqlite::{OptionalExtension, Row, params};
use tracing::{debug, info, instrument};

fn shelf_from_row(row: &Row<'_>) -> rusqlite::Result<Shelf> {
    Ok(Shelf {
        id: row.get(0)?,
        volume_capacity: row.get(1)?,
        weight_capacity: row.get(2)?,
        stock: row.get(3)?,
        product_id: row.get(4)?,
        branch_id: row.get(5)?,
        restock_threshold: row.get(6)?,
    })
}

const SHELF_COLUMNS: &str =
    "id, volume_capacity, weight_capacity, stock, product_id, branch_id, restock_threshold";

/// Inserts a shelf with a freshly generated id and echoes it back.
///
/// The restock threshold is stored but never consulted by any mutating
/// operation; enforcement is left to the caller.
#[instrument(skip(pool, tables))]
pub async fn add_shelf(
    pool: &DbPool,
    tables: &TableNames,
    volume_capacity: f64,
    weight_capacity: f64,
    stock: i64,
    product_id: i64,
    branch_id: i64,
    restock_threshold: i64,
) -> Result<Shelf> {
    let mut conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock for adding shelf".to_string()))?;
    let tx = conn.transaction()?;
    let id = next_id(&tx, tables)?;
    let inserted = tx.execute(
        &format!(
            "INSERT INTO {} ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            tables.shelf, SHELF_COLUMNS
        ),
        params![
            id,
            volume_capacity,
            weight_capacity,
            stock,
            product_id,
            branch_id,
            restock_threshold
        ],
    )?;
    tx.commit()?;
    info!("Inserted shelf id {}: {} row(s)", id, inserted);
    Ok(Shelf {
        id,
        volume_capacity,
        weight_capacity,
        stock,
        product_id,
        branch_id,
        restock_threshold,
    })
}

/// Deletes a shelf by id, returning the number of rows affected.
#[instrument(skip(pool, tables))]
pub async fn delete_shelf_by_id(pool: &DbPool, tables: &TableNames, id: i64) -> Result<usize> {
    let mut conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let tx = conn.transaction()?;
    let rows_affected = tx.execute(
        &format!("DELETE FROM {} WHERE id = ?1", tables.shelf),
        params![id],
    )?;
    tx.commit()?;
    info!("Deleted shelf id {}: {} row(s)", id, rows_affected);
    Ok(rows_affected)
}

/// Fetches a shelf by id, `None` if not found.
#[instrument(skip(pool, tables))]
pub async fn get_shelf_by_id(pool: &DbPool, tables: &TableNames, id: i64) -> Result<Option<Shelf>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {} FROM {} WHERE id = ?1",
        SHELF_COLUMNS, tables.shelf
    ))?;
    let result = stmt
        .query_row(params![id], |row| shelf_from_row(row))
        .optional()?;
    debug!("Shelf lookup by id {}: {}", id, result.is_some());
    Ok(result)
}

/// Lists the shelves of a branch.
#[instrument(skip(pool, tables))]
pub async fn list_shelves_by_branch(
    pool: &DbPool,
    tables: &TableNames,
    branch_id: i64,
) -> Result<Vec<Shelf>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {} FROM {} WHERE branch_id = ?1 ORDER BY id ASC",
        SHELF_COLUMNS, tables.shelf
    ))?;
    let rows = stmt.query_map(params![branch_id], |row| shelf_from_row(row))?;
    let shelves = rows
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| Error::Database(format!("Failed to map shelf row: {}", e)))?;
    debug!("Fetched {} shelves for branch {}.", shelves.len(), branch_id);
    Ok(shelves)
}

/// Lists every shelf.
#[instrument(skip(pool, tables))]
pub async fn list_shelves(pool: &DbPool, tables: &TableNames) -> Result<Vec<Shelf>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {} FROM {} ORDER BY id ASC",
        SHELF_COLUMNS, tables.shelf
    ))?;
    let rows = stmt.query_map([], |row| shelf_from_row(row))?;
    let shelves = rows
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| Error::Database(format!("Failed to map shelf row: {}", e)))?;
    Ok(shelves)
}

/// Adds the fixed restock delta (10 units) to one shelf's stock.
///
/// No relation to the shelf's restock threshold is enforced here.
#[instrument(skip(pool, tables))]
pub async fn restock_shelf(pool: &DbPool, tables: &TableNames, id: i64) -> Result<usize> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let rows_affected = conn.execute(
        &format!(
            "UPDATE {} SET stock = stock + {} WHERE id = ?1",
            tables.shelf, RESTOCK_DELTA
        ),
        params![id],
    )?;
    info!("Restocked shelf id {}: {} row(s)", id, rows_affected);
    Ok(rows_affected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::{init_test_tracing, setup_test_db};
    use crate::errors::Result;

    #[tokio::test]
    async fn test_add_shelf_echoes_arguments() -> Result<()> {
        init_test_tracing();
        let (pool, tables) = setup_test_db().await?;

        let shelf = add_shelf(&pool, &tables, 4.5, 200.0, 12, 9, 2, 5).await?;
        assert!(shelf.id > 0);
        assert_eq!(shelf.volume_capacity, 4.5);
        assert_eq!(shelf.weight_capacity, 200.0);
        assert_eq!(shelf.stock, 12);
        assert_eq!(shelf.product_id, 9);
        assert_eq!(shelf.branch_id, 2);
        assert_eq!(shelf.restock_threshold, 5);

        assert_eq!(get_shelf_by_id(&pool, &tables, shelf.id).await?, Some(shelf));
        Ok(())
    }

    #[tokio::test]
    async fn test_restock_shelf_ignores_threshold() -> Result<()> {
        init_test_tracing();
        let (pool, tables) = setup_test_db().await?;

        // Stock already above threshold: restock still applies blindly
        let shelf = add_shelf(&pool, &tables, 1.0, 1.0, 100, 1, 1, 5).await?;
        assert_eq!(restock_shelf(&pool, &tables, shelf.id).await?, 1);
        let after = get_shelf_by_id(&pool, &tables, shelf.id).await?.unwrap();
        assert_eq!(after.stock, 110);

        assert_eq!(restock_shelf(&pool, &tables, shelf.id + 1).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_and_list_shelves() -> Result<()> {
        init_test_tracing();
        let (pool, tables) = setup_test_db().await?;

        let s1 = add_shelf(&pool, &tables, 1.0, 1.0, 1, 1, 7, 1).await?;
        add_shelf(&pool, &tables, 2.0, 2.0, 2, 2, 7, 2).await?;

        assert_eq!(list_shelves_by_branch(&pool, &tables, 7).await?.len(), 2);
        assert_eq!(delete_shelf_by_id(&pool, &tables, s1.id).await?, 1);
        assert_eq!(list_shelves(&pool, &tables).await?.len(), 1);
        assert_eq!(delete_shelf_by_id(&pool, &tables, s1.id).await?, 0);
        Ok(())
    }
}
