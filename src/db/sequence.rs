//! Shared identifier sequence.
//!
//! Every generated id in the schema comes from one sequence, so ids are globally
//! unique across entity types but not contiguous per entity. The original backend
//! exposed a native sequence object (`SELECT seq.nextval FROM DUAL`); on SQLite
//! the same contract is a single-row counter table bumped with `RETURNING`.

use crate::config::TableNames;
use crate::errors::Result;
use rusqlite::Connection;
use tracing::trace;

/// Returns the next value of the shared sequence.
///
/// Must be called with the caller's transaction already open: a failure here
/// propagates and aborts that transaction, and the increment itself is rolled
/// back with it.
pub(crate) fn next_id(conn: &Connection, tables: &TableNames) -> Result<i64> {
    let id: i64 = conn.query_row(
        &format!(
            "UPDATE {} SET value = value + 1 RETURNING value",
            tables.sequence
        ),
        [],
        |row| row.get(0),
    )?;
    trace!("Generated sequence value: {}", id);
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::{init_test_tracing, setup_test_db};
    use crate::errors::Result;

    #[tokio::test]
    async fn test_sequence_is_monotonic() -> Result<()> {
        init_test_tracing();
        let (pool, tables) = setup_test_db().await?;
        let conn = pool.lock().unwrap();

        let first = next_id(&conn, &tables)?;
        let second = next_id(&conn, &tables)?;
        let third = next_id(&conn, &tables)?;
        assert!(second > first);
        assert!(third > second);
        Ok(())
    }

    #[tokio::test]
    async fn test_sequence_increment_rolls_back_with_transaction() -> Result<()> {
        init_test_tracing();
        let (pool, tables) = setup_test_db().await?;
        let mut conn = pool.lock().unwrap();

        let before = next_id(&conn, &tables)?;
        {
            let tx = conn.transaction()?;
            let inside = next_id(&tx, &tables)?;
            assert_eq!(inside, before + 1);
            // Dropped without commit: the increment is undone
        }
        let after = next_id(&conn, &tables)?;
        assert_eq!(after, before + 1);
        Ok(())
    }
}
