use crate::config::TableNames;
use crate::db::DbPool;
use crate::errors::{Error, Result};
use crate::models::Sell;
use rusqlite::params;
use tracing::{debug, info, instrument};

/// Inserts a sells relation (branch carries product) and echoes it back.
#[instrument(skip(pool, tables))]
pub async fn add_sell(
    pool: &DbPool,
    tables: &TableNames,
    branch_id: i64,
    product_id: i64,
    reorder_level: i64,
    unit_price: f64,
    unit_of_measure_price: f64,
) -> Result<Sell> {
    let mut conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock for adding sell".to_string()))?;
    let tx = conn.transaction()?;
    let inserted = tx.execute(
        &format!(
            "INSERT INTO {} (branch_id, product_id, reorder_level, unit_price, unit_of_measure_price)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            tables.sells
        ),
        params![
            branch_id,
            product_id,
            reorder_level,
            unit_price,
            unit_of_measure_price
        ],
    )?;
    tx.commit()?;
    info!(
        "Inserted sell [{}, {}]: {} row(s)",
        branch_id, product_id, inserted
    );
    Ok(Sell {
        branch_id,
        product_id,
        reorder_level,
        unit_price,
        unit_of_measure_price,
    })
}

/// Deletes a sells relation by its composite key, returning the rows affected.
#[instrument(skip(pool, tables))]
pub async fn delete_sell(
    pool: &DbPool,
    tables: &TableNames,
    branch_id: i64,
    product_id: i64,
) -> Result<usize> {
    let mut conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let tx = conn.transaction()?;
    let rows_affected = tx.execute(
        &format!(
            "DELETE FROM {} WHERE branch_id = ?1 AND product_id = ?2",
            tables.sells
        ),
        params![branch_id, product_id],
    )?;
    tx.commit()?;
    info!(
        "Deleted sell [{}, {}]: {} row(s)",
        branch_id, product_id, rows_affected
    );
    Ok(rows_affected)
}

/// Deletes every sells relation of a branch.
#[instrument(skip(pool, tables))]
pub async fn delete_sells_by_branch(
    pool: &DbPool,
    tables: &TableNames,
    branch_id: i64,
) -> Result<usize> {
    let mut conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let tx = conn.transaction()?;
    let rows_affected = tx.execute(
        &format!("DELETE FROM {} WHERE branch_id = ?1", tables.sells),
        params![branch_id],
    )?;
    tx.commit()?;
    info!(
        "Deleted sells for branch {}: {} row(s)",
        branch_id, rows_affected
    );
    Ok(rows_affected)
}

/// Deletes every sells relation of a product.
#[instrument(skip(pool, tables))]
pub async fn delete_sells_by_product(
    pool: &DbPool,
    tables: &TableNames,
    product_id: i64,
) -> Result<usize> {
    let mut conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let tx = conn.transaction()?;
    let rows_affected = tx.execute(
        &format!("DELETE FROM {} WHERE product_id = ?1", tables.sells),
        params![product_id],
    )?;
    tx.commit()?;
    info!(
        "Deleted sells for product {}: {} row(s)",
        product_id, rows_affected
    );
    Ok(rows_affected)
}

/// Lists every sells relation.
#[instrument(skip(pool, tables))]
pub async fn list_sells(pool: &DbPool, tables: &TableNames) -> Result<Vec<Sell>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT branch_id, product_id, reorder_level, unit_price, unit_of_measure_price
         FROM {} ORDER BY branch_id, product_id",
        tables.sells
    ))?;
    let rows = stmt.query_map([], |row| {
        Ok(Sell {
            branch_id: row.get(0)?,
            product_id: row.get(1)?,
            reorder_level: row.get(2)?,
            unit_price: row.get(3)?,
            unit_of_measure_price: row.get(4)?,
        })
    })?;
    let sells = rows
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| Error::Database(format!("Failed to map sell row: {}", e)))?;
    debug!("Fetched {} sells.", sells.len());
    Ok(sells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::{init_test_tracing, setup_test_db};
    use crate::errors::Result;

    #[tokio::test]
    async fn test_add_sell_echoes_and_enforces_pair_key() -> Result<()> {
        init_test_tracing();
        let (pool, tables) = setup_test_db().await?;

        let sell = add_sell(&pool, &tables, 1, 10, 3, 2.5, 2.5).await?;
        assert_eq!(sell.branch_id, 1);
        assert_eq!(sell.product_id, 10);
        assert_eq!(sell.reorder_level, 3);

        assert!(add_sell(&pool, &tables, 1, 10, 9, 9.9, 9.9).await.is_err());
        assert_eq!(list_sells(&pool, &tables).await?, vec![sell]);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_sells_variants() -> Result<()> {
        init_test_tracing();
        let (pool, tables) = setup_test_db().await?;

        add_sell(&pool, &tables, 1, 10, 1, 1.0, 1.0).await?;
        add_sell(&pool, &tables, 1, 11, 1, 1.0, 1.0).await?;
        add_sell(&pool, &tables, 2, 10, 1, 1.0, 1.0).await?;
        add_sell(&pool, &tables, 2, 12, 1, 1.0, 1.0).await?;

        assert_eq!(delete_sell(&pool, &tables, 1, 10).await?, 1);
        assert_eq!(delete_sell(&pool, &tables, 1, 10).await?, 0);
        assert_eq!(delete_sells_by_branch(&pool, &tables, 2).await?, 2);
        assert_eq!(delete_sells_by_product(&pool, &tables, 11).await?, 1);
        assert!(list_sells(&pool, &tables).await?.is_empty());
        Ok(())
    }
}
