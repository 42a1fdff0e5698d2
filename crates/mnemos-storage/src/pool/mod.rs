//! Connection pool: one write connection plus optional read connections.

pub mod pragmas;
pub mod read_pool;
pub mod write_connection;

use std::path::{Path, PathBuf};

use mnemos_core::errors::MnemosResult;

pub use read_pool::ReadPool;
pub use write_connection::WriteConnection;

/// Owns the single writer and, for file-backed databases, the read pool.
pub struct ConnectionPool {
    pub writer: WriteConnection,
    /// `None` in memory: a second in-memory connection would be a separate database.
    pub readers: Option<ReadPool>,
    pub db_path: Option<PathBuf>,
}

impl ConnectionPool {
    /// Open a connection pool for the given database file.
    pub fn open(path: &Path, read_pool_size: usize, busy_timeout_ms: u32) -> MnemosResult<Self> {
        let writer = WriteConnection::open(path, busy_timeout_ms)?;
        let readers = ReadPool::open(path, read_pool_size, busy_timeout_ms)?;
        Ok(Self {
            writer,
            readers: Some(readers),
            db_path: Some(path.to_path_buf()),
        })
    }

    /// Open a private in-memory database with no read pool.
    pub fn open_in_memory() -> MnemosResult<Self> {
        Ok(Self {
            writer: WriteConnection::open_in_memory()?,
            readers: None,
            db_path: None,
        })
    }
}
