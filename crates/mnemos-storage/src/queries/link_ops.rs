//! Symmetric link writes and directed link reads.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use mnemos_core::errors::{MnemosError, MnemosResult};
use mnemos_core::memory::{LinkType, MemoryLink};
use mnemos_core::traits::LinkUpdate;

use super::codec::{decode_time, encode_time};
use super::memory_crud::get_active_memory;
use crate::map_sqlite_err;

/// Upsert both rows of the pair. Must run inside an immediate transaction.
///
/// The current strength is the larger of the two directions, so a pair left
/// asymmetric by an older writer is repaired by the next update.
pub fn upsert_link_pair(
    conn: &Connection,
    source_id: &str,
    target_id: &str,
    link_type: LinkType,
    now: DateTime<Utc>,
    next: &mut dyn FnMut(Option<f64>) -> MnemosResult<f64>,
) -> MnemosResult<LinkUpdate> {
    if source_id == target_id {
        return Err(MnemosError::validation(
            "target_id",
            format!("cannot link memory {source_id} to itself"),
        ));
    }
    let source = get_active_memory(conn, source_id)?;
    let target = get_active_memory(conn, target_id)?;
    if source.agent_id != target.agent_id {
        return Err(MnemosError::validation(
            "target_id",
            format!(
                "memories belong to different agents ({} / {})",
                source.agent_id, target.agent_id
            ),
        ));
    }

    let current = current_strength(conn, source_id, target_id)?;
    let strength = next(current)?;
    if !(0.0..=1.0).contains(&strength) {
        return Err(MnemosError::validation(
            "strength",
            format!("{strength} is outside [0.0, 1.0]"),
        ));
    }

    let stamp = encode_time(now);
    let mut stmt = conn
        .prepare_cached(
            "INSERT INTO memory_links (source_id, target_id, strength, link_type, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)
             ON CONFLICT(source_id, target_id)
             DO UPDATE SET strength = excluded.strength, updated_at = excluded.updated_at",
        )
        .map_err(|e| map_sqlite_err("upsert_link_pair", e))?;
    for (from, to) in [(source_id, target_id), (target_id, source_id)] {
        stmt.execute(params![from, to, strength, link_type.as_str(), stamp])
            .map_err(|e| map_sqlite_err("upsert_link_pair", e))?;
    }

    Ok(LinkUpdate {
        strength,
        created: current.is_none(),
    })
}

/// Strength of the pair in either direction, `None` if neither row exists.
pub fn current_strength(
    conn: &Connection,
    a: &str,
    b: &str,
) -> MnemosResult<Option<f64>> {
    conn.query_row(
        "SELECT MAX(strength) FROM memory_links
         WHERE (source_id = ?1 AND target_id = ?2) OR (source_id = ?2 AND target_id = ?1)",
        params![a, b],
        |row| row.get::<_, Option<f64>>(0),
    )
    .map_err(|e| map_sqlite_err("current_strength", e))
}

struct LinkRow {
    source_id: String,
    target_id: String,
    strength: f64,
    link_type: String,
    created_at: String,
    updated_at: String,
}

impl LinkRow {
    fn decode(self) -> MnemosResult<MemoryLink> {
        let key = format!("{}->{}", self.source_id, self.target_id);
        Ok(MemoryLink {
            link_type: self.link_type.parse().map_err(|e| {
                super::codec::corrupt(&key, format!("link_type: {e}"))
            })?,
            created_at: decode_time(&key, "created_at", &self.created_at)?,
            updated_at: decode_time(&key, "updated_at", &self.updated_at)?,
            source_id: self.source_id,
            target_id: self.target_id,
            strength: self.strength,
        })
    }
}

fn map_link_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<LinkRow> {
    Ok(LinkRow {
        source_id: row.get(0)?,
        target_id: row.get(1)?,
        strength: row.get(2)?,
        link_type: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

pub fn get_link(
    conn: &Connection,
    source_id: &str,
    target_id: &str,
) -> MnemosResult<Option<MemoryLink>> {
    let row = conn
        .query_row(
            "SELECT source_id, target_id, strength, link_type, created_at, updated_at
             FROM memory_links WHERE source_id = ?1 AND target_id = ?2",
            params![source_id, target_id],
            map_link_row,
        )
        .optional()
        .map_err(|e| map_sqlite_err("get_link", e))?;
    row.map(LinkRow::decode).transpose()
}

/// Outgoing links above `min_strength` whose target is still active.
pub fn links_from(
    conn: &Connection,
    source_id: &str,
    min_strength: f64,
) -> MnemosResult<Vec<MemoryLink>> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT l.source_id, l.target_id, l.strength, l.link_type, l.created_at, l.updated_at
             FROM memory_links l
             JOIN memories m ON m.id = l.target_id
             WHERE l.source_id = ?1 AND l.strength > ?2 AND m.is_deleted = 0
             ORDER BY l.strength DESC, l.target_id",
        )
        .map_err(|e| map_sqlite_err("links_from", e))?;
    let rows = stmt
        .query_map(params![source_id, min_strength], map_link_row)
        .map_err(|e| map_sqlite_err("links_from", e))?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| map_sqlite_err("links_from", e))?.decode()?);
    }
    Ok(out)
}

/// Number of directed link rows. Twice the number of associations.
pub fn count_links(conn: &Connection) -> MnemosResult<usize> {
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM memory_links", [], |row| row.get(0))
        .map_err(|e| map_sqlite_err("count_links", e))?;
    Ok(n.max(0) as usize)
}
