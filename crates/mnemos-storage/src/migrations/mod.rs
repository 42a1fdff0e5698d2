//! Versioned schema migrations. Each version runs once, inside its own
//! transaction, and is recorded in `schema_version`.

mod v001_memories;
mod v002_memory_links;

use rusqlite::{params, Connection};
use tracing::info;

use mnemos_core::errors::{MnemosError, MnemosResult, StorageError};

use crate::map_sqlite_err;
use crate::tx::with_immediate_tx;

type Migration = fn(&Connection) -> MnemosResult<()>;

const MIGRATIONS: &[(u32, &str, Migration)] = &[
    (1, "memories", v001_memories::migrate),
    (2, "memory_links", v002_memory_links::migrate),
];

/// Latest schema version this build knows about.
pub const LATEST_VERSION: u32 = 2;

/// Apply every migration newer than the recorded schema version.
pub fn run_migrations(conn: &Connection) -> MnemosResult<u32> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version     INTEGER PRIMARY KEY,
            applied_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );",
    )
    .map_err(|e| map_sqlite_err("create schema_version", e))?;

    let mut applied = 0;
    for &(version, name, migrate) in MIGRATIONS {
        with_immediate_tx(conn, "migration", |conn| {
            // Re-checked under the write lock: another process may have migrated first.
            if current_version(conn)? >= version {
                return Ok(());
            }
            migrate(conn).map_err(|e| {
                MnemosError::StorageError(StorageError::MigrationFailed {
                    version,
                    reason: e.to_string(),
                })
            })?;
            conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![version],
            )
            .map_err(|e| map_sqlite_err("record schema_version", e))?;
            info!(version, name, "applied migration");
            applied += 1;
            Ok(())
        })?;
    }
    Ok(applied)
}

/// Highest applied version, 0 for a fresh database.
pub fn current_version(conn: &Connection) -> MnemosResult<u32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .map_err(|e| map_sqlite_err("read schema_version", e))
}
