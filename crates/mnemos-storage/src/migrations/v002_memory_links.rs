//! v002: memory_links. Two directed rows per association.

use rusqlite::Connection;

use mnemos_core::errors::MnemosResult;

use crate::map_sqlite_err;

pub fn migrate(conn: &Connection) -> MnemosResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS memory_links (
            source_id   TEXT NOT NULL REFERENCES memories(id) ON DELETE CASCADE,
            target_id   TEXT NOT NULL REFERENCES memories(id) ON DELETE CASCADE,
            strength    REAL NOT NULL DEFAULT 0.5
                        CHECK (strength >= 0.0 AND strength <= 1.0),
            link_type   TEXT NOT NULL DEFAULT 'association'
                        CHECK (link_type IN ('association', 'temporal', 'causal')),
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL,
            PRIMARY KEY (source_id, target_id),
            CHECK (source_id <> target_id)
        );

        CREATE INDEX IF NOT EXISTS idx_links_source ON memory_links(source_id);
        CREATE INDEX IF NOT EXISTS idx_links_target ON memory_links(target_id);
        ",
    )
    .map_err(|e| map_sqlite_err("v002", e))
}
