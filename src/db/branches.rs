use crate::config::TableNames;
use crate::db::DbPool;
use crate::db::sequence::next_id;
use crate::errors::{Error, Result};
use crate::models::Branch;
use rusqlite::{OptionalExtension, Row, params};
use tracing::{debug, info, instrument};

fn branch_from_row(row: &Row<'_>) -> rusqlite::Result<Branch> {
    Ok(Branch {
        id: row.get(0)?,
        name: row.get(1)?,
        city: row.get(2)?,
        address: row.get(3)?,
        market_segment: row.get(4)?,
        floor_area: row.get(5)?,
        supermarket: row.get(6)?,
    })
}

const BRANCH_COLUMNS: &str = "id, name, city, address, market_segment, floor_area, supermarket";

/// Inserts a branch with a freshly generated id and echoes it back.
///
/// The owning supermarket is a soft reference by name; it is not validated
/// against the supermarket table.
#[instrument(skip(pool, tables))]
pub async fn add_branch(
    pool: &DbPool,
    tables: &TableNames,
    name: &str,
    city: &str,
    address: &str,
    market_segment: &str,
    floor_area: i64,
    supermarket: &str,
) -> Result<Branch> {
    let mut conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock for adding branch".to_string()))?;
    let tx = conn.transaction()?;
    let id = next_id(&tx, tables)?;
    let inserted = tx.execute(
        &format!(
            "INSERT INTO {} ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            tables.branch, BRANCH_COLUMNS
        ),
        params![id, name, city, address, market_segment, floor_area, supermarket],
    )?;
    tx.commit()?;
    info!("Inserted branch '{}' (id {}): {} row(s)", name, id, inserted);
    Ok(Branch {
        id,
        name: name.to_string(),
        city: city.to_string(),
        address: address.to_string(),
        market_segment: market_segment.to_string(),
        floor_area,
        supermarket: supermarket.to_string(),
    })
}

/// Deletes a branch by id, returning the number of rows affected.
#[instrument(skip(pool, tables))]
pub async fn delete_branch_by_id(pool: &DbPool, tables: &TableNames, id: i64) -> Result<usize> {
    let mut conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let tx = conn.transaction()?;
    let rows_affected = tx.execute(
        &format!("DELETE FROM {} WHERE id = ?1", tables.branch),
        params![id],
    )?;
    tx.commit()?;
    info!("Deleted branch id {}: {} row(s)", id, rows_affected);
    Ok(rows_affected)
}

/// Deletes every branch with the given (non-unique) name.
#[instrument(skip(pool, tables))]
pub async fn delete_branches_by_name(
    pool: &DbPool,
    tables: &TableNames,
    name: &str,
) -> Result<usize> {
    let mut conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let tx = conn.transaction()?;
    let rows_affected = tx.execute(
        &format!("DELETE FROM {} WHERE name = ?1", tables.branch),
        params![name],
    )?;
    tx.commit()?;
    info!("Deleted branches named '{}': {} row(s)", name, rows_affected);
    Ok(rows_affected)
}

/// Fetches a branch by id, `None` if not found.
#[instrument(skip(pool, tables))]
pub async fn get_branch_by_id(
    pool: &DbPool,
    tables: &TableNames,
    id: i64,
) -> Result<Option<Branch>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {} FROM {} WHERE id = ?1",
        BRANCH_COLUMNS, tables.branch
    ))?;
    let result = stmt
        .query_row(params![id], |row| branch_from_row(row))
        .optional()?;
    debug!("Branch lookup by id {}: {}", id, result.is_some());
    Ok(result)
}

/// Lists the branches owned by a supermarket (referenced by name).
#[instrument(skip(pool, tables))]
pub async fn list_branches_by_supermarket(
    pool: &DbPool,
    tables: &TableNames,
    supermarket: &str,
) -> Result<Vec<Branch>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {} FROM {} WHERE supermarket = ?1 ORDER BY id ASC",
        BRANCH_COLUMNS, tables.branch
    ))?;
    let rows = stmt.query_map(params![supermarket], |row| branch_from_row(row))?;
    let branches = rows
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| Error::Database(format!("Failed to map branch row: {}", e)))?;
    debug!(
        "Fetched {} branches for supermarket '{}'.",
        branches.len(),
        supermarket
    );
    Ok(branches)
}

/// Lists every branch.
#[instrument(skip(pool, tables))]
pub async fn list_branches(pool: &DbPool, tables: &TableNames) -> Result<Vec<Branch>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {} FROM {} ORDER BY id ASC",
        BRANCH_COLUMNS, tables.branch
    ))?;
    let rows = stmt.query_map([], |row| branch_from_row(row))?;
    let branches = rows
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| Error::Database(format!("Failed to map branch row: {}", e)))?;
    debug!("Fetched {} branches.", branches.len());
    Ok(branches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::{init_test_tracing, setup_test_db};
    use crate::errors::Result;

    #[tokio::test]
    async fn test_add_branch_echoes_arguments() -> Result<()> {
        init_test_tracing();
        let (pool, tables) = setup_test_db().await?;

        let branch = add_branch(
            &pool,
            &tables,
            "Downtown",
            "Bogota",
            "Calle 1 #2-3",
            "families",
            1200,
            "Andes Market",
        )
        .await?;

        assert!(branch.id > 0);
        assert_eq!(branch.name, "Downtown");
        assert_eq!(branch.city, "Bogota");
        assert_eq!(branch.address, "Calle 1 #2-3");
        assert_eq!(branch.market_segment, "families");
        assert_eq!(branch.floor_area, 1200);
        assert_eq!(branch.supermarket, "Andes Market");

        // The stored row round-trips to the same object
        let fetched = get_branch_by_id(&pool, &tables, branch.id).await?;
        assert_eq!(fetched, Some(branch));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_branch_by_id_and_name() -> Result<()> {
        init_test_tracing();
        let (pool, tables) = setup_test_db().await?;

        let b1 = add_branch(&pool, &tables, "North", "Cali", "Av 5", "premium", 800, "A").await?;
        add_branch(&pool, &tables, "North", "Cali", "Av 9", "premium", 900, "A").await?;

        assert_eq!(delete_branch_by_id(&pool, &tables, b1.id).await?, 1);
        assert_eq!(delete_branch_by_id(&pool, &tables, b1.id).await?, 0);

        // Name is non-unique: deletes the remaining one
        assert_eq!(delete_branches_by_name(&pool, &tables, "North").await?, 1);
        assert_eq!(delete_branches_by_name(&pool, &tables, "North").await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_branches_by_supermarket() -> Result<()> {
        init_test_tracing();
        let (pool, tables) = setup_test_db().await?;

        add_branch(&pool, &tables, "S1", "Bogota", "a", "seg", 10, "Alpha").await?;
        add_branch(&pool, &tables, "S2", "Bogota", "b", "seg", 20, "Alpha").await?;
        add_branch(&pool, &tables, "S3", "Bogota", "c", "seg", 30, "Beta").await?;

        let alpha = list_branches_by_supermarket(&pool, &tables, "Alpha").await?;
        assert_eq!(alpha.len(), 2);
        assert!(alpha.iter().all(|b| b.supermarket == "Alpha"));

        assert!(
            list_branches_by_supermarket(&pool, &tables, "Gamma")
                .await?
                .is_empty()
        );
        assert_eq!(list_branches(&pool, &tables).await?.len(), 3);
        Ok(())
    }
}
