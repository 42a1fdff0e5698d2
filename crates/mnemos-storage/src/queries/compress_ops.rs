//! Replace a cluster of memories with its summary.

use rusqlite::Connection;
use tracing::debug;

use mnemos_core::errors::{MnemosError, MnemosResult};
use mnemos_core::memory::Memory;
use mnemos_core::traits::CompressOutcome;

use super::memory_crud::{get_memory, insert_memory, soft_delete};

/// Claim every source, insert the summary, soft-delete the sources.
/// Must run inside an immediate transaction; on `AlreadyClaimed` nothing
/// has been written.
pub fn compress_cluster(
    conn: &Connection,
    summary: &Memory,
    source_ids: &[String],
) -> MnemosResult<CompressOutcome> {
    if !summary.is_summary {
        return Err(MnemosError::validation(
            "is_summary",
            "compression target must be a summary",
        ));
    }
    if source_ids.is_empty() {
        return Err(MnemosError::validation("source_ids", "cluster is empty"));
    }

    for id in source_ids {
        let claimable = get_memory(conn, id)?
            .is_some_and(|m| m.is_active() && m.agent_id == summary.agent_id);
        if !claimable {
            debug!(memory_id = %id, summary_id = %summary.id, "source already claimed");
            return Ok(CompressOutcome::AlreadyClaimed { id: id.clone() });
        }
    }

    insert_memory(conn, summary)?;
    for id in source_ids {
        soft_delete(conn, id)?;
    }
    Ok(CompressOutcome::Compressed)
}
