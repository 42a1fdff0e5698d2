use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Importance, MemoryType, Stability};
use crate::errors::{MnemosError, MnemosResult};

/// A remembered unit, owned by exactly one agent.
///
/// Memories are never removed from storage. Compression flips `is_deleted`
/// and the summary that replaced them lists their ids in `summarizes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    /// UUID v4.
    pub id: String,
    pub agent_id: String,
    pub content: String,
    /// Fixed-dimension embedding. Opaque to everything except similarity.
    pub embedding: Vec<f32>,
    pub memory_type: MemoryType,
    /// Ordered, de-duplicated.
    pub topics: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub event_date: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub importance: Importance,
    pub stability: Stability,
    pub last_accessed: DateTime<Utc>,
    pub access_count: u64,
    pub source_channel: Option<String>,
    pub source_session: Option<String>,
    pub is_summary: bool,
    /// Ids of the memories this summary replaced. Empty unless `is_summary`.
    pub summarizes: Vec<String>,
    pub is_deleted: bool,
    /// blake3 hex digest of `content`.
    pub content_hash: String,
}

impl Memory {
    /// Fresh UUID v4 identifier.
    pub fn new_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    /// Hash used for ingestion idempotency and duplicate detection.
    pub fn compute_content_hash(content: &str) -> String {
        blake3::hash(content.as_bytes()).to_hex().to_string()
    }

    /// Not soft-deleted.
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }

    /// Whether `expires_at` lies strictly before `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|t| t < now)
    }

    /// Check the structural invariants that the type system can't express.
    pub fn validate(&self) -> MnemosResult<()> {
        if self.agent_id.trim().is_empty() {
            return Err(MnemosError::validation("agent_id", "must not be empty"));
        }
        if self.content.trim().is_empty() {
            return Err(MnemosError::validation("content", "must not be empty"));
        }
        if self.embedding.iter().any(|x| !x.is_finite()) {
            return Err(MnemosError::validation(
                "embedding",
                "components must be finite",
            ));
        }
        if !self.is_summary && !self.summarizes.is_empty() {
            return Err(MnemosError::validation(
                "summarizes",
                "only summary memories may list summarized ids",
            ));
        }
        if self.summarizes.iter().any(|id| id == &self.id) {
            return Err(MnemosError::validation(
                "summarizes",
                "a summary cannot summarize itself",
            ));
        }
        Ok(())
    }
}

/// Drop blanks and case-insensitive duplicates, keeping first-seen order.
pub fn normalize_topics<I, S>(topics: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for t in topics {
        let t = t.as_ref().trim();
        if t.is_empty() {
            continue;
        }
        if !out.iter().any(|existing| existing.eq_ignore_ascii_case(t)) {
            out.push(t.to_string());
        }
    }
    out
}
