//! v001: memories.

use rusqlite::Connection;

use mnemos_core::errors::MnemosResult;

use crate::map_sqlite_err;

pub fn migrate(conn: &Connection) -> MnemosResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS memories (
            id              TEXT PRIMARY KEY,
            agent_id        TEXT NOT NULL,
            content         TEXT NOT NULL,
            embedding       BLOB NOT NULL,
            dimensions      INTEGER NOT NULL,
            memory_type     TEXT NOT NULL
                            CHECK (memory_type IN ('episodic', 'semantic', 'procedural')),
            topics          TEXT NOT NULL DEFAULT '[]',
            created_at      TEXT NOT NULL,
            event_date      TEXT,
            expires_at      TEXT,
            importance      REAL NOT NULL DEFAULT 0.5
                            CHECK (importance >= 0.0 AND importance <= 1.0),
            stability       REAL NOT NULL DEFAULT 0.3
                            CHECK (stability >= 0.0 AND stability <= 1.0),
            last_accessed   TEXT NOT NULL,
            access_count    INTEGER NOT NULL DEFAULT 0 CHECK (access_count >= 0),
            source_channel  TEXT,
            source_session  TEXT,
            is_summary      INTEGER NOT NULL DEFAULT 0,
            summarizes      TEXT NOT NULL DEFAULT '[]',
            is_deleted      INTEGER NOT NULL DEFAULT 0,
            content_hash    TEXT NOT NULL,
            updated_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_memories_agent_deleted ON memories(agent_id, is_deleted);
        CREATE INDEX IF NOT EXISTS idx_memories_agent_hash ON memories(agent_id, content_hash);
        CREATE INDEX IF NOT EXISTS idx_memories_type ON memories(memory_type);
        CREATE INDEX IF NOT EXISTS idx_memories_created ON memories(created_at);
        ",
    )
    .map_err(|e| map_sqlite_err("v001", e))
}
