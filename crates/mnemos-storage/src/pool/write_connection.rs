//! Single write connection behind a mutex. Writes within one process are
//! serialized here; across processes SQLite's write lock does the same.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use mnemos_core::errors::MnemosResult;

use super::pragmas::apply_pragmas;
use crate::{map_sqlite_err, to_storage_err};

pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    pub fn open(path: &Path, busy_timeout_ms: u32) -> MnemosResult<Self> {
        let conn = Connection::open(path).map_err(|e| map_sqlite_err("open writer", e))?;
        apply_pragmas(&conn, busy_timeout_ms)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> MnemosResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| map_sqlite_err("open in-memory writer", e))?;
        apply_pragmas(&conn, 0)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the write lock and execute a closure with the connection.
    pub fn with_conn<F, T>(&self, f: F) -> MnemosResult<T>
    where
        F: FnOnce(&Connection) -> MnemosResult<T>,
    {
        let guard = self
            .conn
            .lock()
            .map_err(|e| to_storage_err(format!("writer lock poisoned: {e}")))?;
        f(&guard)
    }
}
