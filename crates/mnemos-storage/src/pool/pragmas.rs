//! PRAGMA configuration applied to every SQLite connection.
//!
//! busy_timeout first so the WAL switch waits out other openers, then WAL
//! mode, NORMAL sync, foreign_keys ON.

use rusqlite::Connection;

use mnemos_core::errors::MnemosResult;

use crate::map_sqlite_err;

/// Apply all pragmas to a read-write connection.
pub fn apply_pragmas(conn: &Connection, busy_timeout_ms: u32) -> MnemosResult<()> {
    conn.execute_batch(&format!(
        "
        PRAGMA busy_timeout = {busy_timeout_ms};
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA cache_size = -16000;
        PRAGMA foreign_keys = ON;
        "
    ))
    .map_err(|e| map_sqlite_err("apply_pragmas", e))
}

/// Pragmas for read-only pool connections.
pub fn apply_read_pragmas(conn: &Connection, busy_timeout_ms: u32) -> MnemosResult<()> {
    conn.execute_batch(&format!(
        "
        PRAGMA busy_timeout = {busy_timeout_ms};
        PRAGMA query_only = ON;
        "
    ))
    .map_err(|e| map_sqlite_err("apply_read_pragmas", e))
}

/// Verify that WAL mode is active on a connection.
pub fn verify_wal_mode(conn: &Connection) -> MnemosResult<bool> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(|e| map_sqlite_err("verify_wal_mode", e))?;
    Ok(mode.eq_ignore_ascii_case("wal"))
}
