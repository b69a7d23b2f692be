use crate::config::TableNames;
use crate::db::DbPool;
use crate::db::sequence::next_id;
use crate::errors::{Error, Result};
use crate::models::Product;
use rusqlite::{Row, params};
use tracing::{debug, info, instrument};

pub(crate) fn product_from_row(row: &Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        brand: row.get(2)?,
        presentation: row.get(3)?,
        barcode: row.get(4)?,
        unit_of_measure: row.get(5)?,
        category: row.get(6)?,
        subtype: row.get(7)?,
    })
}

pub(crate) const PRODUCT_COLUMNS: &str =
    "id, name, brand, presentation, barcode, unit_of_measure, category, subtype";

/// Arguments describing a product to insert.
#[derive(Debug, Clone, Copy)]
pub struct NewProductArgs<'a> {
    pub name: &'a str,
    pub brand: &'a str,
    pub presentation: &'a str,
    pub barcode: &'a str,
    pub unit_of_measure: &'a str,
    pub category: &'a str,
    pub subtype: &'a str,
}

// Shared with the promotion composite insert, which creates its synthetic
// product inside the caller's transaction.
pub(crate) fn insert_product(
    tx: &rusqlite::Connection,
    tables: &TableNames,
    id: i64,
    args: &NewProductArgs<'_>,
) -> Result<usize> {
    let inserted = tx.execute(
        &format!(
            "INSERT INTO {} ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            tables.product, PRODUCT_COLUMNS
        ),
        params![
            id,
            args.name,
            args.brand,
            args.presentation,
            args.barcode,
            args.unit_of_measure,
            args.category,
            args.subtype
        ],
    )?;
    Ok(inserted)
}

/// Inserts a product with a freshly generated id and echoes it back.
#[instrument(skip(pool, tables, args))]
pub async fn add_product(
    pool: &DbPool,
    tables: &TableNames,
    args: &NewProductArgs<'_>,
) -> Result<Product> {
    let mut conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock for adding product".to_string()))?;
    let tx = conn.transaction()?;
    let id = next_id(&tx, tables)?;
    let inserted = insert_product(&tx, tables, id, args)?;
    tx.commit()?;
    info!(
        "Inserted product '{}' (id {}): {} row(s)",
        args.name, id, inserted
    );
    Ok(Product {
        id,
        name: args.name.to_string(),
        brand: args.brand.to_string(),
        presentation: args.presentation.to_string(),
        barcode: args.barcode.to_string(),
        unit_of_measure: args.unit_of_measure.to_string(),
        category: args.category.to_string(),
        subtype: args.subtype.to_string(),
    })
}

/// Deletes every product with the given (non-unique) name.
#[instrument(skip(pool, tables))]
pub async fn delete_products_by_name(
    pool: &DbPool,
    tables: &TableNames,
    name: &str,
) -> Result<usize> {
    let mut conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let tx = conn.transaction()?;
    let rows_affected = tx.execute(
        &format!("DELETE FROM {} WHERE name = ?1", tables.product),
        params![name],
    )?;
    tx.commit()?;
    info!("Deleted products named '{}': {} row(s)", name, rows_affected);
    Ok(rows_affected)
}

/// Deletes a product by id, returning the number of rows affected.
#[instrument(skip(pool, tables))]
pub async fn delete_product_by_id(pool: &DbPool, tables: &TableNames, id: i64) -> Result<usize> {
    let mut conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let tx = conn.transaction()?;
    let rows_affected = tx.execute(
        &format!("DELETE FROM {} WHERE id = ?1", tables.product),
        params![id],
    )?;
    tx.commit()?;
    info!("Deleted product id {}: {} row(s)", id, rows_affected);
    Ok(rows_affected)
}

/// Lists every product with the given name (names are not unique).
#[instrument(skip(pool, tables))]
pub async fn list_products_by_name(
    pool: &DbPool,
    tables: &TableNames,
    name: &str,
) -> Result<Vec<Product>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {} FROM {} WHERE name = ?1 ORDER BY id ASC",
        PRODUCT_COLUMNS, tables.product
    ))?;
    let rows = stmt.query_map(params![name], |row| product_from_row(row))?;
    let products = rows
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| Error::Database(format!("Failed to map product row: {}", e)))?;
    debug!("Fetched {} products named '{}'.", products.len(), name);
    Ok(products)
}

/// Lists every product.
#[instrument(skip(pool, tables))]
pub async fn list_products(pool: &DbPool, tables: &TableNames) -> Result<Vec<Product>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {} FROM {} ORDER BY id ASC",
        PRODUCT_COLUMNS, tables.product
    ))?;
    let rows = stmt.query_map([], |row| product_from_row(row))?;
    let products = rows
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| Error::Database(format!("Failed to map product row: {}", e)))?;
    debug!("Fetched {} products.", products.len());
    Ok(products)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::{init_test_tracing, setup_test_db};
    use crate::errors::Result;

    fn milk() -> NewProductArgs<'static> {
        NewProductArgs {
            name: "Milk",
            brand: "Alpina",
            presentation: "1L carton",
            barcode: "7701234567890",
            unit_of_measure: "liter",
            category: "perishables",
            subtype: "dairy",
        }
    }

    #[tokio::test]
    async fn test_add_product_echoes_arguments() -> Result<()> {
        init_test_tracing();
        let (pool, tables) = setup_test_db().await?;

        let product = add_product(&pool, &tables, &milk()).await?;
        assert!(product.id > 0);
        assert_eq!(product.name, "Milk");
        assert_eq!(product.brand, "Alpina");
        assert_eq!(product.presentation, "1L carton");
        assert_eq!(product.barcode, "7701234567890");
        assert_eq!(product.unit_of_measure, "liter");
        assert_eq!(product.category, "perishables");
        assert_eq!(product.subtype, "dairy");

        let by_name = list_products_by_name(&pool, &tables, "Milk").await?;
        assert_eq!(by_name, vec![product]);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_product_by_id_and_by_name() -> Result<()> {
        init_test_tracing();
        let (pool, tables) = setup_test_db().await?;

        let p1 = add_product(&pool, &tables, &milk()).await?;
        let p2 = add_product(&pool, &tables, &milk()).await?;
        assert_ne!(p1.id, p2.id);

        assert_eq!(delete_product_by_id(&pool, &tables, p1.id).await?, 1);
        // Non-unique name delete takes out the rest
        assert_eq!(delete_products_by_name(&pool, &tables, "Milk").await?, 1);
        assert_eq!(delete_products_by_name(&pool, &tables, "Milk").await?, 0);
        assert!(list_products(&pool, &tables).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_sequence_ids_unique_across_entity_types() -> Result<()> {
        init_test_tracing();
        let (pool, tables) = setup_test_db().await?;

        let mut ids = Vec::new();
        for _ in 0..3 {
            ids.push(add_product(&pool, &tables, &milk()).await?.id);
            ids.push(
                crate::db::add_branch(&pool, &tables, "B", "C", "A", "S", 1, "M")
                    .await?
                    .id,
            );
            ids.push(
                crate::db::add_client(&pool, &tables, "C", "c@x.co", "person", "addr")
                    .await?
                    .id,
            );
        }
        let unique: std::collections::HashSet<_> = ids.iter().copied().collect();
        assert_eq!(
            unique.len(),
            ids.len(),
            "Shared sequence must never repeat a value"
        );
        Ok(())
    }
}
