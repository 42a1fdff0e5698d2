//! Per-agent listing and lookup queries.

use rusqlite::{params, Connection, OptionalExtension};

use mnemos_core::errors::MnemosResult;
use mnemos_core::memory::Memory;

use super::memory_crud::{map_row, MemoryRow, MEMORY_COLUMNS};
use crate::map_sqlite_err;

/// Active memories of one agent, oldest first.
pub fn list_active(conn: &Connection, agent_id: &str) -> MnemosResult<Vec<Memory>> {
    list_by_agent(conn, agent_id, false)
}

/// All memories of one agent, optionally including soft-deleted rows.
pub fn list_by_agent(
    conn: &Connection,
    agent_id: &str,
    include_deleted: bool,
) -> MnemosResult<Vec<Memory>> {
    let sql = if include_deleted {
        format!("SELECT {MEMORY_COLUMNS} FROM memories WHERE agent_id = ?1 ORDER BY created_at, id")
    } else {
        format!(
            "SELECT {MEMORY_COLUMNS} FROM memories \
             WHERE agent_id = ?1 AND is_deleted = 0 ORDER BY created_at, id"
        )
    };
    let mut stmt = conn
        .prepare_cached(&sql)
        .map_err(|e| map_sqlite_err("list_by_agent", e))?;
    let rows = stmt
        .query_map(params![agent_id], map_row)
        .map_err(|e| map_sqlite_err("list_by_agent", e))?;

    let mut out = Vec::new();
    for row in rows {
        let row = row.map_err(|e| map_sqlite_err("list_by_agent", e))?;
        out.push(row.decode()?);
    }
    Ok(out)
}

/// Newest memory of the agent with this content hash, deleted or not.
pub fn find_by_content_hash(
    conn: &Connection,
    agent_id: &str,
    content_hash: &str,
) -> MnemosResult<Option<Memory>> {
    let row = conn
        .query_row(
            &format!(
                "SELECT {MEMORY_COLUMNS} FROM memories \
                 WHERE agent_id = ?1 AND content_hash = ?2 \
                 ORDER BY created_at DESC LIMIT 1"
            ),
            params![agent_id, content_hash],
            map_row,
        )
        .optional()
        .map_err(|e| map_sqlite_err("find_by_content_hash", e))?;
    row.map(MemoryRow::decode).transpose()
}

pub fn count_active(conn: &Connection, agent_id: &str) -> MnemosResult<usize> {
    let n: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM memories WHERE agent_id = ?1 AND is_deleted = 0",
            params![agent_id],
            |row| row.get(0),
        )
        .map_err(|e| map_sqlite_err("count_active", e))?;
    Ok(n.max(0) as usize)
}
