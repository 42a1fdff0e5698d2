//! # mnemos-storage
//!
//! SQLite persistence: one serialized writer, a read pool for file-backed
//! databases, versioned migrations, and `BEGIN IMMEDIATE` transactions for
//! every read-modify-write.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;
pub mod tx;

pub use engine::StorageEngine;

use mnemos_core::errors::{MnemosError, StorageError};
use rusqlite::ErrorCode;

/// Wrap a message as a storage error.
pub fn to_storage_err(message: String) -> MnemosError {
    MnemosError::StorageError(StorageError::SqliteError { message })
}

/// Map a rusqlite error, turning lock contention into `ConflictError`.
pub fn map_sqlite_err(context: &str, e: rusqlite::Error) -> MnemosError {
    match &e {
        rusqlite::Error::SqliteFailure(err, _)
            if matches!(err.code, ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) =>
        {
            MnemosError::conflict(format!("{context}: {e}"))
        }
        _ => to_storage_err(format!("{context}: {e}")),
    }
}
