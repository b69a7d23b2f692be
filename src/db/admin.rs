use crate::config::TableNames;
use crate::db::DbPool;
use crate::errors::{Error, Result};
use tracing::{info, instrument};

/// Deletes every row of the 14 entity tables inside one transaction and returns
/// the per-table deletion counts, in the deletion order below.
///
/// Children go before parents so the wipe never trips a reference. The sequence
/// table is left untouched; ids keep climbing across wipes.
#[instrument(skip(pool, tables))]
pub async fn clear_all(pool: &DbPool, tables: &TableNames) -> Result<[usize; 14]> {
    let mut conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock for clearing data".to_string()))?;
    let tx = conn.transaction()?;
    let order: [&str; 14] = [
        &tables.sale,
        &tables.promotion,
        &tables.invoice,
        &tables.client,
        &tables.offers,
        &tables.suborder,
        &tables.order,
        &tables.supplier,
        &tables.sells,
        &tables.shelf,
        &tables.warehouse,
        &tables.product,
        &tables.branch,
        &tables.supermarket,
    ];
    let mut counts = [0usize; 14];
    for (slot, table) in counts.iter_mut().zip(order) {
        *slot = tx.execute(&format!("DELETE FROM {table}"), [])?;
    }
    tx.commit()?;
    info!("Cleared all entity tables: {:?} row(s)", counts);
    Ok(counts)
}
