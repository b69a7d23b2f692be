use crate::config::TableNames;
use crate::db::DbPool;
use crate::db::products::{NewProductArgs, insert_product};
use crate::db::sequence::next_id;
use crate::errors::{Error, Result};
use crate::models::Promotion;
use chrono::{DateTime, Utc};
use rusqlite::params;
use tracing::{info, instrument};

/// Arguments describing a promotion and the synthetic product it wraps.
#[derive(Debug, Clone, Copy)]
pub struct NewPromotionArgs<'a> {
    pub product: NewProductArgs<'a>,
    pub price: f64,
    pub description: &'a str,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub available_units: i64,
}

/// Inserts a promotion together with its synthetic product and echoes the
/// promotion back.
///
/// Both rows and both generated ids come from a single transaction: a failure
/// inserting the promotion rolls the product back too, so no orphan product can
/// survive.
#[instrument(skip(pool, tables, args))]
pub async fn add_promotion(
    pool: &DbPool,
    tables: &TableNames,
    args: &NewPromotionArgs<'_>,
) -> Result<Promotion> {
    let mut conn = pool.lock().map_err(|_| {
        Error::Database("Failed to acquire DB lock for adding promotion".to_string())
    })?;
    let tx = conn.transaction()?;
    let product_id = next_id(&tx, tables)?;
    insert_product(&tx, tables, product_id, &args.product)?;
    let id = next_id(&tx, tables)?;
    let inserted = tx.execute(
        &format!(
            "INSERT INTO {} (id, price, description, start_date, end_date, available_units, product_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            tables.promotion
        ),
        params![
            id,
            args.price,
            args.description,
            args.start_date,
            args.end_date,
            args.available_units,
            product_id
        ],
    )?;
    tx.commit()?;
    info!(
        "Inserted promotion '{}' (id {}, product id {}): {} row(s)",
        args.description, id, product_id, inserted
    );
    Ok(Promotion {
        id,
        price: args.price,
        description: args.description.to_string(),
        start_date: args.start_date,
        end_date: args.end_date,
        available_units: args.available_units,
        product_id,
    })
}
