use crate::config::TableNames;
use crate::errors::{Error, Result};
use rusqlite::Connection;
use tracing::{debug, info, instrument};

/// Creates the sequence and the 14 entity tables if they do not exist, and seeds
/// the sequence with its single row.
///
/// Table names are interpolated from the configured mapping; the column layout is
/// fixed. INVOICE and SALE exist in the schema only - no operation in the domain
/// layer writes to them yet.
#[instrument(skip(conn, tables))]
pub(crate) fn create_tables(conn: &Connection, tables: &TableNames) -> Result<()> {
    debug!("Executing CREATE TABLE statements if tables do not exist.");
    conn.execute_batch(&format!(
        "BEGIN;

        CREATE TABLE IF NOT EXISTS {sequence} (
            value INTEGER NOT NULL
        );
        INSERT INTO {sequence} (value)
            SELECT 0 WHERE NOT EXISTS (SELECT 1 FROM {sequence});

        CREATE TABLE IF NOT EXISTS {supermarket} (
            name TEXT PRIMARY KEY
        );

        CREATE TABLE IF NOT EXISTS {branch} (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            city TEXT NOT NULL,
            address TEXT NOT NULL,
            market_segment TEXT NOT NULL,
            floor_area INTEGER NOT NULL,
            supermarket TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS {product} (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            brand TEXT NOT NULL,
            presentation TEXT NOT NULL,
            barcode TEXT NOT NULL,
            unit_of_measure TEXT NOT NULL,
            category TEXT NOT NULL,
            subtype TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS {warehouse} (
            id INTEGER PRIMARY KEY,
            volume_capacity REAL NOT NULL,
            weight_capacity REAL NOT NULL,
            stock INTEGER NOT NULL,
            product_id INTEGER NOT NULL,
            branch_id INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS {shelf} (
            id INTEGER PRIMARY KEY,
            volume_capacity REAL NOT NULL,
            weight_capacity REAL NOT NULL,
            stock INTEGER NOT NULL,
            product_id INTEGER NOT NULL,
            branch_id INTEGER NOT NULL,
            restock_threshold INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS {sells} (
            branch_id INTEGER NOT NULL,
            product_id INTEGER NOT NULL,
            reorder_level INTEGER NOT NULL,
            unit_price REAL NOT NULL,
            unit_of_measure_price REAL NOT NULL,
            PRIMARY KEY (branch_id, product_id)
        );

        CREATE TABLE IF NOT EXISTS {supplier} (
            nit INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            rating INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS {order} (
            id INTEGER PRIMARY KEY,
            supplier_id INTEGER NOT NULL,
            branch_id INTEGER NOT NULL,
            delivery_date TEXT NOT NULL,
            status TEXT NOT NULL,
            quantity INTEGER NOT NULL,
            rating INTEGER NOT NULL,
            total_cost REAL NOT NULL
        );

        CREATE TABLE IF NOT EXISTS {suborder} (
            order_id INTEGER PRIMARY KEY,
            product_id INTEGER NOT NULL,
            quantity INTEGER NOT NULL,
            cost REAL NOT NULL
        );

        CREATE TABLE IF NOT EXISTS {offers} (
            product_id INTEGER NOT NULL,
            supplier_id INTEGER NOT NULL,
            cost REAL NOT NULL,
            PRIMARY KEY (product_id, supplier_id)
        );

        CREATE TABLE IF NOT EXISTS {client} (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            client_type TEXT NOT NULL,
            address TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS {invoice} (
            number INTEGER PRIMARY KEY,
            invoice_date TEXT NOT NULL,
            total REAL NOT NULL,
            client_id INTEGER NOT NULL,
            branch_id INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS {promotion} (
            id INTEGER PRIMARY KEY,
            price REAL NOT NULL,
            description TEXT NOT NULL,
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            available_units INTEGER NOT NULL,
            product_id INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS {sale} (
            product_id INTEGER NOT NULL,
            quantity INTEGER NOT NULL,
            invoice_number INTEGER NOT NULL,
            cost REAL NOT NULL,
            promotion_id INTEGER
        );

        COMMIT;",
        sequence = tables.sequence,
        supermarket = tables.supermarket,
        branch = tables.branch,
        product = tables.product,
        warehouse = tables.warehouse,
        shelf = tables.shelf,
        sells = tables.sells,
        supplier = tables.supplier,
        order = tables.order,
        suborder = tables.suborder,
        offers = tables.offers,
        client = tables.client,
        invoice = tables.invoice,
        promotion = tables.promotion,
        sale = tables.sale,
    ))
    .map_err(|e| Error::Database(format!("Failed to create tables: {}", e)))?;
    info!("Database tables ensured.");
    Ok(())
}
