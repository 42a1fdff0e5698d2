//! `BEGIN IMMEDIATE` transactions.
//!
//! IMMEDIATE takes SQLite's write lock up front, so the reads inside a
//! read-modify-write see the latest committed state and no other connection,
//! in this process or another, can commit in between.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use mnemos_core::errors::MnemosResult;

use crate::map_sqlite_err;

/// Run `f` inside an immediate transaction. Commits on `Ok`, rolls back on `Err`.
pub fn with_immediate_tx<T, F>(conn: &Connection, label: &str, f: F) -> MnemosResult<T>
where
    F: FnOnce(&Connection) -> MnemosResult<T>,
{
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)
        .map_err(|e| map_sqlite_err(&format!("{label} begin"), e))?;

    match f(&tx) {
        Ok(value) => {
            tx.commit()
                .map_err(|e| map_sqlite_err(&format!("{label} commit"), e))?;
            Ok(value)
        }
        Err(e) => {
            let _ = tx.rollback();
            Err(e)
        }
    }
}
