//! Insert, get, and in-place update of memory rows.

use rusqlite::{params, Connection, OptionalExtension, Row};

use mnemos_core::errors::MnemosResult;
use mnemos_core::memory::{Importance, Memory, MemoryType, Stability};

use super::codec::{
    bytes_to_f32_vec, corrupt, decode_list, decode_opt_time, decode_time, encode_list,
    encode_time, f32_vec_to_bytes,
};
use crate::map_sqlite_err;

/// Column list shared by every memory SELECT; [`map_row`] reads in this order.
pub const MEMORY_COLUMNS: &str = "id, agent_id, content, embedding, memory_type, topics, \
     created_at, event_date, expires_at, importance, stability, last_accessed, access_count, \
     source_channel, source_session, is_summary, summarizes, is_deleted, content_hash";

/// Raw row as stored. Decoding into [`Memory`] is separate so a bad value
/// reports which row and column it came from.
pub struct MemoryRow {
    id: String,
    agent_id: String,
    content: String,
    embedding: Vec<u8>,
    memory_type: String,
    topics: String,
    created_at: String,
    event_date: Option<String>,
    expires_at: Option<String>,
    importance: f64,
    stability: f64,
    last_accessed: String,
    access_count: i64,
    source_channel: Option<String>,
    source_session: Option<String>,
    is_summary: bool,
    summarizes: String,
    is_deleted: bool,
    content_hash: String,
}

pub fn map_row(row: &Row<'_>) -> rusqlite::Result<MemoryRow> {
    Ok(MemoryRow {
        id: row.get(0)?,
        agent_id: row.get(1)?,
        content: row.get(2)?,
        embedding: row.get(3)?,
        memory_type: row.get(4)?,
        topics: row.get(5)?,
        created_at: row.get(6)?,
        event_date: row.get(7)?,
        expires_at: row.get(8)?,
        importance: row.get(9)?,
        stability: row.get(10)?,
        last_accessed: row.get(11)?,
        access_count: row.get(12)?,
        source_channel: row.get(13)?,
        source_session: row.get(14)?,
        is_summary: row.get(15)?,
        summarizes: row.get(16)?,
        is_deleted: row.get(17)?,
        content_hash: row.get(18)?,
    })
}

impl MemoryRow {
    pub fn decode(self) -> MnemosResult<Memory> {
        let id = self.id;
        let memory_type: MemoryType = self
            .memory_type
            .parse()
            .map_err(|e| corrupt(&id, format!("memory_type: {e}")))?;
        let importance = Importance::try_new(self.importance)
            .map_err(|e| corrupt(&id, format!("importance: {e}")))?;
        let stability = Stability::try_new(self.stability)
            .map_err(|e| corrupt(&id, format!("stability: {e}")))?;
        let access_count = u64::try_from(self.access_count)
            .map_err(|e| corrupt(&id, format!("access_count: {e}")))?;

        Ok(Memory {
            agent_id: self.agent_id,
            content: self.content,
            embedding: bytes_to_f32_vec(&self.embedding),
            memory_type,
            topics: decode_list(&id, "topics", &self.topics)?,
            created_at: decode_time(&id, "created_at", &self.created_at)?,
            event_date: decode_opt_time(&id, "event_date", self.event_date)?,
            expires_at: decode_opt_time(&id, "expires_at", self.expires_at)?,
            importance,
            stability,
            last_accessed: decode_time(&id, "last_accessed", &self.last_accessed)?,
            access_count,
            source_channel: self.source_channel,
            source_session: self.source_session,
            is_summary: self.is_summary,
            summarizes: decode_list(&id, "summarizes", &self.summarizes)?,
            is_deleted: self.is_deleted,
            content_hash: self.content_hash,
            id,
        })
    }
}

/// Insert a single memory row. Callers own the transaction.
pub fn insert_memory(conn: &Connection, memory: &Memory) -> MnemosResult<()> {
    memory.validate()?;
    conn.execute(
        "INSERT INTO memories (
            id, agent_id, content, embedding, dimensions, memory_type, topics,
            created_at, event_date, expires_at, importance, stability, last_accessed,
            access_count, source_channel, source_session, is_summary, summarizes,
            is_deleted, content_hash, updated_at
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
            ?17, ?18, ?19, ?20, ?8
        )",
        params![
            memory.id,
            memory.agent_id,
            memory.content,
            f32_vec_to_bytes(&memory.embedding),
            memory.embedding.len() as i64,
            memory.memory_type.as_str(),
            encode_list(&memory.topics)?,
            encode_time(memory.created_at),
            memory.event_date.map(encode_time),
            memory.expires_at.map(encode_time),
            memory.importance.value(),
            memory.stability.value(),
            encode_time(memory.last_accessed),
            memory.access_count as i64,
            memory.source_channel,
            memory.source_session,
            memory.is_summary,
            encode_list(&memory.summarizes)?,
            memory.is_deleted,
            memory.content_hash,
        ],
    )
    .map_err(|e| map_sqlite_err("insert_memory", e))?;
    Ok(())
}

/// Get a memory by id, deleted or not.
pub fn get_memory(conn: &Connection, id: &str) -> MnemosResult<Option<Memory>> {
    let row = conn
        .query_row(
            &format!("SELECT {MEMORY_COLUMNS} FROM memories WHERE id = ?1"),
            params![id],
            map_row,
        )
        .optional()
        .map_err(|e| map_sqlite_err("get_memory", e))?;
    row.map(MemoryRow::decode).transpose()
}

/// Get an active memory by id or fail with `MemoryNotFound`.
pub fn get_active_memory(conn: &Connection, id: &str) -> MnemosResult<Memory> {
    get_memory(conn, id)?
        .filter(Memory::is_active)
        .ok_or_else(|| mnemos_core::MnemosError::not_found(id))
}

/// Fetch several memories, preserving the order of `ids`. Unknown ids are skipped.
pub fn bulk_get(conn: &Connection, ids: &[String]) -> MnemosResult<Vec<Memory>> {
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(m) = get_memory(conn, id)? {
            out.push(m);
        }
    }
    Ok(out)
}

/// Persist the fields that reinforcement and re-scoring may change.
pub fn update_mutable_fields(conn: &Connection, memory: &Memory) -> MnemosResult<()> {
    let changed = conn
        .execute(
            "UPDATE memories
             SET stability = ?2, importance = ?3, last_accessed = ?4,
                 access_count = ?5, topics = ?6,
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
             WHERE id = ?1 AND is_deleted = 0",
            params![
                memory.id,
                memory.stability.value(),
                memory.importance.value(),
                encode_time(memory.last_accessed),
                memory.access_count as i64,
                encode_list(&memory.topics)?,
            ],
        )
        .map_err(|e| map_sqlite_err("update_mutable_fields", e))?;
    if changed == 0 {
        return Err(mnemos_core::MnemosError::not_found(&memory.id));
    }
    Ok(())
}

/// Flag a memory as deleted. Returns false when it was already deleted or unknown.
pub fn soft_delete(conn: &Connection, id: &str) -> MnemosResult<bool> {
    let changed = conn
        .execute(
            "UPDATE memories
             SET is_deleted = 1, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
             WHERE id = ?1 AND is_deleted = 0",
            params![id],
        )
        .map_err(|e| map_sqlite_err("soft_delete", e))?;
    Ok(changed == 1)
}
