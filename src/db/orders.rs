//! Purchase orders and their sub-order lines.
//!
//! An order is always created together with exactly one sub-order sharing the
//! same generated id. Both inserts run in a single transaction, so a failure in
//! either leaves no trace of the other.

use crate::config::TableNames;
use crate::db::DbPool;
use crate::db::sequence::next_id;
use crate::errors::{Error, Result};
use crate::models::{ORDER_DELIVERED, Order, SubOrder};
use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, Row, params};
use tracing::{debug, info, instrument};

fn order_from_row(row: &Row<'_>) -> rusqlite::Result<Order> {
    Ok(Order {
        id: row.get(0)?,
        supplier_id: row.get(1)?,
        branch_id: row.get(2)?,
        delivery_date: row.get(3)?,
        status: row.get(4)?,
        quantity: row.get(5)?,
        rating: row.get(6)?,
        total_cost: row.get(7)?,
    })
}

fn suborder_from_row(row: &Row<'_>) -> rusqlite::Result<SubOrder> {
    Ok(SubOrder {
        order_id: row.get(0)?,
        product_id: row.get(1)?,
        quantity: row.get(2)?,
        cost: row.get(3)?,
    })
}

const ORDER_COLUMNS: &str =
    "id, supplier_id, branch_id, delivery_date, status, quantity, rating, total_cost";
const SUBORDER_COLUMNS: &str = "order_id, product_id, quantity, cost";

/// Arguments for the composite order + sub-order insert.
#[derive(Debug, Clone)]
pub struct NewOrderArgs<'a> {
    pub supplier_id: i64,
    pub branch_id: i64,
    pub delivery_date: DateTime<Utc>,
    pub status: &'a str,
    pub quantity: i64,
    pub rating: i64,
    pub total_cost: f64,
    /// Product of the single sub-order line
    pub product_id: i64,
    pub sub_quantity: i64,
    pub sub_cost: f64,
}

/// Inserts an order and its sub-order line atomically, sharing one generated id.
///
/// Both rows are written inside one transaction: if the second insert fails the
/// first is rolled back, so no orphaned sub-order can remain.
#[instrument(skip(pool, tables, args))]
pub async fn add_order(
    pool: &DbPool,
    tables: &TableNames,
    args: &NewOrderArgs<'_>,
) -> Result<Order> {
    let mut conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock for adding order".to_string()))?;
    let tx = conn.transaction()?;
    let id = next_id(&tx, tables)?;
    let sub_inserted = tx.execute(
        &format!(
            "INSERT INTO {} ({}) VALUES (?1, ?2, ?3, ?4)",
            tables.suborder, SUBORDER_COLUMNS
        ),
        params![id, args.product_id, args.sub_quantity, args.sub_cost],
    )?;
    let inserted = tx.execute(
        &format!(
            "INSERT INTO {} ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            tables.order, ORDER_COLUMNS
        ),
        params![
            id,
            args.supplier_id,
            args.branch_id,
            args.delivery_date,
            args.status,
            args.quantity,
            args.rating,
            args.total_cost
        ],
    )?;
    tx.commit()?;
    info!(
        "Inserted order id {}: {} order row(s), {} sub-order row(s)",
        id, inserted, sub_inserted
    );
    Ok(Order {
        id,
        supplier_id: args.supplier_id,
        branch_id: args.branch_id,
        delivery_date: args.delivery_date,
        status: args.status.to_string(),
        quantity: args.quantity,
        rating: args.rating,
        total_cost: args.total_cost,
    })
}

/// Inserts a standalone sub-order line with its own generated id.
#[instrument(skip(pool, tables))]
pub async fn add_suborder(
    pool: &DbPool,
    tables: &TableNames,
    product_id: i64,
    quantity: i64,
    cost: f64,
) -> Result<SubOrder> {
    let mut conn = pool.lock().map_err(|_| {
        Error::Database("Failed to acquire DB lock for adding sub-order".to_string())
    })?;
    let tx = conn.transaction()?;
    let order_id = next_id(&tx, tables)?;
    let inserted = tx.execute(
        &format!(
            "INSERT INTO {} ({}) VALUES (?1, ?2, ?3, ?4)",
            tables.suborder, SUBORDER_COLUMNS
        ),
        params![order_id, product_id, quantity, cost],
    )?;
    tx.commit()?;
    info!("Inserted sub-order id {}: {} row(s)", order_id, inserted);
    Ok(SubOrder {
        order_id,
        product_id,
        quantity,
        cost,
    })
}

/// Deletes an order by id, returning the number of rows affected.
#[instrument(skip(pool, tables))]
pub async fn delete_order_by_id(pool: &DbPool, tables: &TableNames, id: i64) -> Result<usize> {
    let mut conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let tx = conn.transaction()?;
    let rows_affected = tx.execute(
        &format!("DELETE FROM {} WHERE id = ?1", tables.order),
        params![id],
    )?;
    tx.commit()?;
    info!("Deleted order id {}: {} row(s)", id, rows_affected);
    Ok(rows_affected)
}

/// Deletes the sub-order line of an order.
#[instrument(skip(pool, tables))]
pub async fn delete_suborder_by_order(
    pool: &DbPool,
    tables: &TableNames,
    order_id: i64,
) -> Result<usize> {
    let mut conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let tx = conn.transaction()?;
    let rows_affected = tx.execute(
        &format!("DELETE FROM {} WHERE order_id = ?1", tables.suborder),
        params![order_id],
    )?;
    tx.commit()?;
    info!(
        "Deleted sub-order for order {}: {} row(s)",
        order_id, rows_affected
    );
    Ok(rows_affected)
}

/// Deletes every order whose status is the delivered label, returning the count.
#[instrument(skip(pool, tables))]
pub async fn delete_delivered_orders(pool: &DbPool, tables: &TableNames) -> Result<usize> {
    let mut conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let tx = conn.transaction()?;
    let rows_affected = tx.execute(
        &format!("DELETE FROM {} WHERE status = ?1", tables.order),
        params![ORDER_DELIVERED],
    )?;
    tx.commit()?;
    info!("Deleted delivered orders: {} row(s)", rows_affected);
    Ok(rows_affected)
}

/// Fetches an order by id, `None` if not found.
#[instrument(skip(pool, tables))]
pub async fn get_order_by_id(pool: &DbPool, tables: &TableNames, id: i64) -> Result<Option<Order>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {} FROM {} WHERE id = ?1",
        ORDER_COLUMNS, tables.order
    ))?;
    let result = stmt
        .query_row(params![id], |row| order_from_row(row))
        .optional()?;
    debug!("Order lookup by id {}: {}", id, result.is_some());
    Ok(result)
}

/// Fetches the sub-order line of an order, `None` if not found.
#[instrument(skip(pool, tables))]
pub async fn get_suborder_by_order(
    pool: &DbPool,
    tables: &TableNames,
    order_id: i64,
) -> Result<Option<SubOrder>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {} FROM {} WHERE order_id = ?1",
        SUBORDER_COLUMNS, tables.suborder
    ))?;
    let result = stmt
        .query_row(params![order_id], |row| suborder_from_row(row))
        .optional()?;
    Ok(result)
}

macro_rules! list_orders_where {
    ($conn:expr, $tables:expr, $clause:expr, $params:expr) => {{
        let mut stmt = $conn.prepare_cached(&format!(
            "SELECT {} FROM {} WHERE {} ORDER BY id ASC",
            ORDER_COLUMNS, $tables.order, $clause
        ))?;
        let rows = stmt.query_map($params, |row| order_from_row(row))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| Error::Database(format!("Failed to map order row: {}", e)))
    }};
}

/// Lists the orders placed by a branch.
#[instrument(skip(pool, tables))]
pub async fn list_orders_by_branch(
    pool: &DbPool,
    tables: &TableNames,
    branch_id: i64,
) -> Result<Vec<Order>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    list_orders_where!(conn, tables, "branch_id = ?1", params![branch_id])
}

/// Lists the orders placed with a supplier.
#[instrument(skip(pool, tables))]
pub async fn list_orders_by_supplier(
    pool: &DbPool,
    tables: &TableNames,
    supplier_id: i64,
) -> Result<Vec<Order>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    list_orders_where!(conn, tables, "supplier_id = ?1", params![supplier_id])
}

/// Lists the orders placed by a branch with a supplier.
#[instrument(skip(pool, tables))]
pub async fn list_orders_by_supplier_and_branch(
    pool: &DbPool,
    tables: &TableNames,
    supplier_id: i64,
    branch_id: i64,
) -> Result<Vec<Order>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    list_orders_where!(
        conn,
        tables,
        "supplier_id = ?1 AND branch_id = ?2",
        params![supplier_id, branch_id]
    )
}

/// Lists the orders with a given rating.
#[instrument(skip(pool, tables))]
pub async fn list_orders_by_rating(
    pool: &DbPool,
    tables: &TableNames,
    rating: i64,
) -> Result<Vec<Order>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    list_orders_where!(conn, tables, "rating = ?1", params![rating])
}

/// Lists the orders with a given delivery timestamp.
#[instrument(skip(pool, tables))]
pub async fn list_orders_by_delivery_date(
    pool: &DbPool,
    tables: &TableNames,
    delivery_date: DateTime<Utc>,
) -> Result<Vec<Order>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    list_orders_where!(conn, tables, "delivery_date = ?1", params![delivery_date])
}

/// Lists every order.
#[instrument(skip(pool, tables))]
pub async fn list_orders(pool: &DbPool, tables: &TableNames) -> Result<Vec<Order>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {} FROM {} ORDER BY id ASC",
        ORDER_COLUMNS, tables.order
    ))?;
    let rows = stmt.query_map([], |row| order_from_row(row))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| Error::Database(format!("Failed to map order row: {}", e)))
}

/// Lists the sub-order lines for a product.
#[instrument(skip(pool, tables))]
pub async fn list_suborders_by_product(
    pool: &DbPool,
    tables: &TableNames,
    product_id: i64,
) -> Result<Vec<SubOrder>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {} FROM {} WHERE product_id = ?1 ORDER BY order_id ASC",
        SUBORDER_COLUMNS, tables.suborder
    ))?;
    let rows = stmt.query_map(params![product_id], |row| suborder_from_row(row))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| Error::Database(format!("Failed to map sub-order row: {}", e)))
}

/// Lists every sub-order line.
#[instrument(skip(pool, tables))]
pub async fn list_suborders(pool: &DbPool, tables: &TableNames) -> Result<Vec<SubOrder>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {} FROM {} ORDER BY order_id ASC",
        SUBORDER_COLUMNS, tables.suborder
    ))?;
    let rows = stmt.query_map([], |row| suborder_from_row(row))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| Error::Database(format!("Failed to map sub-order row: {}", e)))
}

/// Sets the status label of an order, returning the number of rows affected.
#[instrument(skip(pool, tables))]
pub async fn set_order_status(
    pool: &DbPool,
    tables: &TableNames,
    id: i64,
    status: &str,
) -> Result<usize> {
    let mut conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let tx = conn.transaction()?;
    let rows_affected = tx.execute(
        &format!("UPDATE {} SET status = ?1 WHERE id = ?2", tables.order),
        params![status, id],
    )?;
    tx.commit()?;
    info!(
        "Set status '{}' on order {}: {} row(s)",
        status, id, rows_affected
    );
    Ok(rows_affected)
}

/// Sets the rating of an order, returning the number of rows affected.
#[instrument(skip(pool, tables))]
pub async fn set_order_rating(
    pool: &DbPool,
    tables: &TableNames,
    id: i64,
    rating: i64,
) -> Result<usize> {
    let mut conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let tx = conn.transaction()?;
    let rows_affected = tx.execute(
        &format!("UPDATE {} SET rating = ?1 WHERE id = ?2", tables.order),
        params![rating, id],
    )?;
    tx.commit()?;
    info!(
        "Set rating {} on order {}: {} row(s)",
        rating, id, rows_affected
    );
    Ok(rows_affected)
}
