//! StorageEngine: owns the connection pool, runs migrations on open, and
//! implements IMemoryStorage + ILinkStorage.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tracing::info;

use mnemos_core::config::StorageConfig;
use mnemos_core::errors::MnemosResult;
use mnemos_core::memory::{LinkType, Memory, MemoryLink};
use mnemos_core::traits::{CompressOutcome, ILinkStorage, IMemoryStorage, LinkUpdate};

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries::{compress_ops, link_ops, memory_crud, memory_query};
use crate::tx::with_immediate_tx;

pub struct StorageEngine {
    pool: ConnectionPool,
}

impl StorageEngine {
    /// Open a file-backed database with default pool settings.
    pub fn open(path: &Path) -> MnemosResult<Self> {
        Self::open_with_config(path, &StorageConfig::default())
    }

    /// Open a file-backed database. `config.db_path` is ignored in favor of `path`.
    pub fn open_with_config(path: &Path, config: &StorageConfig) -> MnemosResult<Self> {
        let pool = ConnectionPool::open(path, config.read_pool_size, config.busy_timeout_ms)?;
        let engine = Self { pool };
        engine.initialize()?;
        info!(path = %path.display(), readers = config.read_pool_size, "storage opened");
        Ok(engine)
    }

    /// Private in-memory database. All reads go through the writer.
    pub fn open_in_memory() -> MnemosResult<Self> {
        let engine = Self {
            pool: ConnectionPool::open_in_memory()?,
        };
        engine.initialize()?;
        Ok(engine)
    }

    fn initialize(&self) -> MnemosResult<()> {
        self.pool.writer.with_conn(|conn| {
            migrations::run_migrations(conn)?;
            Ok(())
        })
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Read-only work on a pooled reader, or on the writer when in memory.
    fn with_reader<F, T>(&self, f: F) -> MnemosResult<T>
    where
        F: FnOnce(&Connection) -> MnemosResult<T>,
    {
        match &self.pool.readers {
            Some(readers) => readers.with_conn(f),
            None => self.pool.writer.with_conn(f),
        }
    }

    fn with_write_tx<F, T>(&self, label: &str, f: F) -> MnemosResult<T>
    where
        F: FnOnce(&Connection) -> MnemosResult<T>,
    {
        self.pool
            .writer
            .with_conn(|conn| with_immediate_tx(conn, label, f))
    }

    /// Every memory of the agent, soft-deleted ones included when asked.
    pub fn list_by_agent(
        &self,
        agent_id: &str,
        include_deleted: bool,
    ) -> MnemosResult<Vec<Memory>> {
        self.with_reader(|conn| memory_query::list_by_agent(conn, agent_id, include_deleted))
    }

    /// Number of directed link rows.
    pub fn count_links(&self) -> MnemosResult<usize> {
        self.with_reader(link_ops::count_links)
    }

    pub fn schema_version(&self) -> MnemosResult<u32> {
        self.pool.writer.with_conn(migrations::current_version)
    }
}

impl IMemoryStorage for StorageEngine {
    fn create(&self, memory: &Memory) -> MnemosResult<()> {
        self.with_write_tx("create", |conn| memory_crud::insert_memory(conn, memory))
    }

    fn get(&self, id: &str) -> MnemosResult<Option<Memory>> {
        self.with_reader(|conn| memory_crud::get_memory(conn, id))
    }

    fn get_bulk(&self, ids: &[String]) -> MnemosResult<Vec<Memory>> {
        self.with_reader(|conn| memory_crud::bulk_get(conn, ids))
    }

    fn list_active(&self, agent_id: &str) -> MnemosResult<Vec<Memory>> {
        self.with_reader(|conn| memory_query::list_active(conn, agent_id))
    }

    fn find_by_content_hash(
        &self,
        agent_id: &str,
        content_hash: &str,
    ) -> MnemosResult<Option<Memory>> {
        self.with_reader(|conn| memory_query::find_by_content_hash(conn, agent_id, content_hash))
    }

    fn count_active(&self, agent_id: &str) -> MnemosResult<usize> {
        self.with_reader(|conn| memory_query::count_active(conn, agent_id))
    }

    fn mutate_memory(
        &self,
        id: &str,
        apply: &mut dyn FnMut(&mut Memory) -> MnemosResult<()>,
    ) -> MnemosResult<Memory> {
        self.with_write_tx("mutate_memory", |conn| {
            let mut memory = memory_crud::get_active_memory(conn, id)?;
            apply(&mut memory)?;
            memory_crud::update_mutable_fields(conn, &memory)?;
            Ok(memory)
        })
    }

    fn compress_cluster(
        &self,
        summary: &Memory,
        source_ids: &[String],
    ) -> MnemosResult<CompressOutcome> {
        self.with_write_tx("compress_cluster", |conn| {
            compress_ops::compress_cluster(conn, summary, source_ids)
        })
    }
}

impl ILinkStorage for StorageEngine {
    fn upsert_link_pair(
        &self,
        source_id: &str,
        target_id: &str,
        link_type: LinkType,
        now: DateTime<Utc>,
        next: &mut dyn FnMut(Option<f64>) -> MnemosResult<f64>,
    ) -> MnemosResult<LinkUpdate> {
        self.with_write_tx("upsert_link_pair", |conn| {
            link_ops::upsert_link_pair(conn, source_id, target_id, link_type, now, next)
        })
    }

    fn get_link(&self, source_id: &str, target_id: &str) -> MnemosResult<Option<MemoryLink>> {
        self.with_reader(|conn| link_ops::get_link(conn, source_id, target_id))
    }

    fn links_from(&self, source_id: &str, min_strength: f64) -> MnemosResult<Vec<MemoryLink>> {
        self.with_reader(|conn| link_ops::links_from(conn, source_id, min_strength))
    }
}
