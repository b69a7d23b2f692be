use crate::config::TableNames;
use crate::db::DbPool;
use crate::errors::{Error, Result};
use crate::models::Offer;
use rusqlite::params;
use tracing::{debug, info, instrument};

/// Inserts an offer (supplier offers product at unit cost) and echoes it back.
///
/// The composite key needs no generated id; inserting the same pair twice fails
/// on the primary key.
#[instrument(skip(pool, tables))]
pub async fn add_offer(
    pool: &DbPool,
    tables: &TableNames,
    product_id: i64,
    supplier_id: i64,
    cost: f64,
) -> Result<Offer> {
    let mut conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock for adding offer".to_string()))?;
    let tx = conn.transaction()?;
    let inserted = tx.execute(
        &format!(
            "INSERT INTO {} (product_id, supplier_id, cost) VALUES (?1, ?2, ?3)",
            tables.offers
        ),
        params![product_id, supplier_id, cost],
    )?;
    tx.commit()?;
    info!(
        "Inserted offer [{}, {}]: {} row(s)",
        product_id, supplier_id, inserted
    );
    Ok(Offer {
        product_id,
        supplier_id,
        cost,
    })
}

/// Deletes an offer by its composite key, returning the number of rows affected.
#[instrument(skip(pool, tables))]
pub async fn delete_offer(
    pool: &DbPool,
    tables: &TableNames,
    product_id: i64,
    supplier_id: i64,
) -> Result<usize> {
    let mut conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let tx = conn.transaction()?;
    let rows_affected = tx.execute(
        &format!(
            "DELETE FROM {} WHERE product_id = ?1 AND supplier_id = ?2",
            tables.offers
        ),
        params![product_id, supplier_id],
    )?;
    tx.commit()?;
    info!(
        "Deleted offer [{}, {}]: {} row(s)",
        product_id, supplier_id, rows_affected
    );
    Ok(rows_affected)
}

/// Lists every offer.
#[instrument(skip(pool, tables))]
pub async fn list_offers(pool: &DbPool, tables: &TableNames) -> Result<Vec<Offer>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT product_id, supplier_id, cost FROM {} ORDER BY product_id, supplier_id",
        tables.offers
    ))?;
    let rows = stmt.query_map([], |row| {
        Ok(Offer {
            product_id: row.get(0)?,
            supplier_id: row.get(1)?,
            cost: row.get(2)?,
        })
    })?;
    let offers = rows
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| Error::Database(format!("Failed to map offer row: {}", e)))?;
    debug!("Fetched {} offers.", offers.len());
    Ok(offers)
}

/// Returns (supplier id, number of products offered) pairs, one per supplier
/// that has at least one offer.
#[instrument(skip(pool, tables))]
pub async fn suppliers_with_offer_counts(
    pool: &DbPool,
    tables: &TableNames,
) -> Result<Vec<(i64, i64)>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT supplier_id, COUNT(*) AS num_products
         FROM {}
         GROUP BY supplier_id
         ORDER BY supplier_id ASC",
        tables.offers
    ))?;
    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| Error::Database(format!("Failed to map offer count row: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::{init_test_tracing, setup_test_db};
    use crate::errors::Result;

    #[tokio::test]
    async fn test_add_delete_offer() -> Result<()> {
        init_test_tracing();
        let (pool, tables) = setup_test_db().await?;

        let offer = add_offer(&pool, &tables, 1, 100, 9.5).await?;
        assert_eq!(offer.product_id, 1);
        assert_eq!(offer.supplier_id, 100);
        assert_eq!(offer.cost, 9.5);

        // Composite key is unique
        assert!(add_offer(&pool, &tables, 1, 100, 8.0).await.is_err());

        assert_eq!(delete_offer(&pool, &tables, 1, 100).await?, 1);
        assert_eq!(delete_offer(&pool, &tables, 1, 100).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_suppliers_with_offer_counts() -> Result<()> {
        init_test_tracing();
        let (pool, tables) = setup_test_db().await?;

        add_offer(&pool, &tables, 1, 100, 1.0).await?;
        add_offer(&pool, &tables, 2, 100, 2.0).await?;
        add_offer(&pool, &tables, 3, 100, 3.0).await?;
        add_offer(&pool, &tables, 1, 200, 4.0).await?;

        let counts = suppliers_with_offer_counts(&pool, &tables).await?;
        assert_eq!(counts, vec![(100, 3), (200, 1)]);

        assert_eq!(list_offers(&pool, &tables).await?.len(), 4);
        Ok(())
    }
}
