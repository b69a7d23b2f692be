use crate::config::TableNames;
use crate::db::DbPool;
use crate::db::sequence::next_id;
use crate::errors::{Error, Result};
use crate::models::Client;
use rusqlite::{OptionalExtension, Row, params};
use tracing::{debug, info, instrument};

fn client_from_row(row: &Row<'_>) -> rusqlite::Result<Client> {
    Ok(Client {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        client_type: row.get(3)?,
        address: row.get(4)?,
    })
}

const CLIENT_COLUMNS: &str = "id, name, email, client_type, address";

/// Inserts a client with a freshly generated id and echoes it back.
#[instrument(skip(pool, tables))]
pub async fn add_client(
    pool: &DbPool,
    tables: &TableNames,
    name: &str,
    email: &str,
    client_type: &str,
    address: &str,
) -> Result<Client> {
    let mut conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock for adding client".to_string()))?;
    let tx = conn.transaction()?;
    let id = next_id(&tx, tables)?;
    let inserted = tx.execute(
        &format!(
            "INSERT INTO {} ({}) VALUES (?1, ?2, ?3, ?4, ?5)",
            tables.client, CLIENT_COLUMNS
        ),
        params![id, name, email, client_type, address],
    )?;
    tx.commit()?;
    info!("Inserted client '{}' (id {}): {} row(s)", name, id, inserted);
    Ok(Client {
        id,
        name: name.to_string(),
        email: email.to_string(),
        client_type: client_type.to_string(),
        address: address.to_string(),
    })
}

/// Deletes a client by id, returning the number of rows affected.
#[instrument(skip(pool, tables))]
pub async fn delete_client_by_id(pool: &DbPool, tables: &TableNames, id: i64) -> Result<usize> {
    let mut conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let tx = conn.transaction()?;
    let rows_affected = tx.execute(
        &format!("DELETE FROM {} WHERE id = ?1", tables.client),
        params![id],
    )?;
    tx.commit()?;
    info!("Deleted client id {}: {} row(s)", id, rows_affected);
    Ok(rows_affected)
}

/// Deletes every client with the given (non-unique) name.
#[instrument(skip(pool, tables))]
pub async fn delete_clients_by_name(
    pool: &DbPool,
    tables: &TableNames,
    name: &str,
) -> Result<usize> {
    let mut conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let tx = conn.transaction()?;
    let rows_affected = tx.execute(
        &format!("DELETE FROM {} WHERE name = ?1", tables.client),
        params![name],
    )?;
    tx.commit()?;
    info!("Deleted clients named '{}': {} row(s)", name, rows_affected);
    Ok(rows_affected)
}

/// Fetches a client by id, `None` if not found.
#[instrument(skip(pool, tables))]
pub async fn get_client_by_id(
    pool: &DbPool,
    tables: &TableNames,
    id: i64,
) -> Result<Option<Client>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {} FROM {} WHERE id = ?1",
        CLIENT_COLUMNS, tables.client
    ))?;
    let result = stmt
        .query_row(params![id], |row| client_from_row(row))
        .optional()?;
    debug!("Client lookup by id {}: {}", id, result.is_some());
    Ok(result)
}

/// Lists every client with the given name (names are not unique).
#[instrument(skip(pool, tables))]
pub async fn list_clients_by_name(
    pool: &DbPool,
    tables: &TableNames,
    name: &str,
) -> Result<Vec<Client>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {} FROM {} WHERE name = ?1 ORDER BY id ASC",
        CLIENT_COLUMNS, tables.client
    ))?;
    let rows = stmt.query_map(params![name], |row| client_from_row(row))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| Error::Database(format!("Failed to map client row: {}", e)))
}

/// Lists every client of the given type ("person" or "company").
#[instrument(skip(pool, tables))]
pub async fn list_clients_by_type(
    pool: &DbPool,
    tables: &TableNames,
    client_type: &str,
) -> Result<Vec<Client>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {} FROM {} WHERE client_type = ?1 ORDER BY id ASC",
        CLIENT_COLUMNS, tables.client
    ))?;
    let rows = stmt.query_map(params![client_type], |row| client_from_row(row))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| Error::Database(format!("Failed to map client row: {}", e)))
}

/// Lists every client.
#[instrument(skip(pool, tables))]
pub async fn list_clients(pool: &DbPool, tables: &TableNames) -> Result<Vec<Client>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {} FROM {} ORDER BY id ASC",
        CLIENT_COLUMNS, tables.client
    ))?;
    let rows = stmt.query_map([], |row| client_from_row(row))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| Error::Database(format!("Failed to map client row: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::{init_test_tracing, setup_test_db};
    use crate::errors::Result;

    #[tokio::test]
    async fn test_add_client_echoes_arguments() -> Result<()> {
        init_test_tracing();
        let (pool, tables) = setup_test_db().await?;

        let client = add_client(
            &pool,
            &tables,
            "Maria Lopez",
            "maria@example.com",
            "person",
            "Cra 10 #20-30",
        )
        .await?;
        assert!(client.id > 0);
        assert_eq!(client.name, "Maria Lopez");
        assert_eq!(client.email, "maria@example.com");
        assert_eq!(client.client_type, "person");
        assert_eq!(client.address, "Cra 10 #20-30");

        assert_eq!(
            get_client_by_id(&pool, &tables, client.id).await?,
            Some(client)
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_client_filters_and_deletes() -> Result<()> {
        init_test_tracing();
        let (pool, tables) = setup_test_db().await?;

        let c1 = add_client(&pool, &tables, "Acme Corp", "it@acme.co", "company", "a").await?;
        add_client(&pool, &tables, "Acme Corp", "hr@acme.co", "company", "b").await?;
        add_client(&pool, &tables, "Juan", "j@x.co", "person", "c").await?;

        assert_eq!(list_clients(&pool, &tables).await?.len(), 3);
        assert_eq!(
            list_clients_by_name(&pool, &tables, "Acme Corp").await?.len(),
            2
        );
        assert_eq!(
            list_clients_by_type(&pool, &tables, "company").await?.len(),
            2
        );
        assert_eq!(list_clients_by_type(&pool, &tables, "person").await?.len(), 1);

        assert_eq!(delete_client_by_id(&pool, &tables, c1.id).await?, 1);
        assert_eq!(delete_clients_by_name(&pool, &tables, "Acme Corp").await?, 1);
        assert_eq!(delete_clients_by_name(&pool, &tables, "Acme Corp").await?, 0);
        assert_eq!(delete_client_by_id(&pool, &tables, 987_654).await?, 0);
        Ok(())
    }
}
