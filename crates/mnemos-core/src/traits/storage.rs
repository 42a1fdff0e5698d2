use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::errors::MnemosResult;
use crate::memory::{LinkType, Memory, MemoryLink};

/// Result of an attempt to replace a cluster with its summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompressOutcome {
    /// Summary inserted and every source soft-deleted.
    Compressed,
    /// A source was already deleted, missing, or owned by another agent.
    /// Nothing was written.
    AlreadyClaimed { id: String },
}

/// Outcome of a symmetric link write.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkUpdate {
    /// Strength now stored on both rows.
    pub strength: f64,
    /// Whether the pair did not exist before this call.
    pub created: bool,
}

/// Persistence for memories. Every mutating method is one transaction.
pub trait IMemoryStorage: Send + Sync {
    // --- CRUD ---
    fn create(&self, memory: &Memory) -> MnemosResult<()>;
    /// Returns soft-deleted memories too.
    fn get(&self, id: &str) -> MnemosResult<Option<Memory>>;
    fn get_bulk(&self, ids: &[String]) -> MnemosResult<Vec<Memory>>;

    // --- Query ---
    /// All non-deleted memories of one agent.
    fn list_active(&self, agent_id: &str) -> MnemosResult<Vec<Memory>>;
    /// Any memory of the agent (deleted or not) with this content hash.
    fn find_by_content_hash(&self, agent_id: &str, content_hash: &str)
        -> MnemosResult<Option<Memory>>;
    fn count_active(&self, agent_id: &str) -> MnemosResult<usize>;

    // --- Atomic mutation ---
    /// Load an active memory under an exclusive write lock, let `apply` edit
    /// it, and persist the mutable fields before the lock is released.
    /// `MemoryNotFound` if the id is unknown or soft-deleted.
    fn mutate_memory(
        &self,
        id: &str,
        apply: &mut dyn FnMut(&mut Memory) -> MnemosResult<()>,
    ) -> MnemosResult<Memory>;

    /// In one transaction: verify every source is active and owned by the
    /// summary's agent, insert the summary, soft-delete the sources.
    fn compress_cluster(&self, summary: &Memory, source_ids: &[String])
        -> MnemosResult<CompressOutcome>;
}

/// Persistence for the symmetric associative link relation.
pub trait ILinkStorage: Send + Sync {
    /// Create or update both directions of `(source, target)` in one transaction.
    /// `next` receives the current strength (`None` if the pair is new) and
    /// returns the strength to store on both rows.
    fn upsert_link_pair(
        &self,
        source_id: &str,
        target_id: &str,
        link_type: LinkType,
        now: DateTime<Utc>,
        next: &mut dyn FnMut(Option<f64>) -> MnemosResult<f64>,
    ) -> MnemosResult<LinkUpdate>;

    fn get_link(&self, source_id: &str, target_id: &str) -> MnemosResult<Option<MemoryLink>>;

    /// Outgoing links with strength strictly above `min_strength`, strongest first.
    fn links_from(&self, source_id: &str, min_strength: f64) -> MnemosResult<Vec<MemoryLink>>;
}

/// Blanket impl: `Arc<T>` implements `IMemoryStorage` by delegating to the inner `T`.
impl<T: IMemoryStorage + ?Sized> IMemoryStorage for Arc<T> {
    fn create(&self, memory: &Memory) -> MnemosResult<()> { (**self).create(memory) }
    fn get(&self, id: &str) -> MnemosResult<Option<Memory>> { (**self).get(id) }
    fn get_bulk(&self, ids: &[String]) -> MnemosResult<Vec<Memory>> { (**self).get_bulk(ids) }
    fn list_active(&self, agent_id: &str) -> MnemosResult<Vec<Memory>> { (**self).list_active(agent_id) }
    fn find_by_content_hash(&self, agent_id: &str, content_hash: &str) -> MnemosResult<Option<Memory>> { (**self).find_by_content_hash(agent_id, content_hash) }
    fn count_active(&self, agent_id: &str) -> MnemosResult<usize> { (**self).count_active(agent_id) }
    fn mutate_memory(&self, id: &str, apply: &mut dyn FnMut(&mut Memory) -> MnemosResult<()>) -> MnemosResult<Memory> { (**self).mutate_memory(id, apply) }
    fn compress_cluster(&self, summary: &Memory, source_ids: &[String]) -> MnemosResult<CompressOutcome> { (**self).compress_cluster(summary, source_ids) }
}

impl<T: ILinkStorage + ?Sized> ILinkStorage for Arc<T> {
    fn upsert_link_pair(&self, source_id: &str, target_id: &str, link_type: LinkType, now: DateTime<Utc>, next: &mut dyn FnMut(Option<f64>) -> MnemosResult<f64>) -> MnemosResult<LinkUpdate> { (**self).upsert_link_pair(source_id, target_id, link_type, now, next) }
    fn get_link(&self, source_id: &str, target_id: &str) -> MnemosResult<Option<MemoryLink>> { (**self).get_link(source_id, target_id) }
    fn links_from(&self, source_id: &str, min_strength: f64) -> MnemosResult<Vec<MemoryLink>> { (**self).links_from(source_id, min_strength) }
}
