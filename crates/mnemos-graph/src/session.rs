//! Co-retrieval sessions.
//!
//! A session remembers which memories were reinforced during it. Each newly
//! reinforced memory is linked to every one reinforced earlier in the same
//! session.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::warn;

use mnemos_core::errors::MnemosResult;

use crate::graph::AssociativeGraph;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetrievalSession {
    pub session_id: String,
    reinforced: Vec<String>,
}

impl RetrievalSession {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            reinforced: Vec::new(),
        }
    }

    pub fn reinforced(&self) -> &[String] {
        &self.reinforced
    }

    /// Record a reinforcement and strengthen links to every earlier one
    /// with the default increment. Re-reinforcing a memory already in the
    /// session links nothing new. Returns the number of links strengthened.
    ///
    /// A pair that fails (for example an earlier memory has since been
    /// compressed away) is logged and skipped.
    pub fn record_reinforced(
        &mut self,
        graph: &AssociativeGraph,
        memory_id: &str,
    ) -> MnemosResult<usize> {
        if self.reinforced.iter().any(|id| id == memory_id) {
            return Ok(0);
        }
        let mut linked = 0;
        for earlier in &self.reinforced {
            match graph.strengthen_link(memory_id, earlier, None) {
                Ok(_) => linked += 1,
                Err(e) => warn!(
                    session_id = %self.session_id,
                    memory_id,
                    earlier = %earlier,
                    error = %e,
                    "co-retrieval link skipped"
                ),
            }
        }
        self.reinforced.push(memory_id.to_string());
        Ok(linked)
    }

    /// Append ids from `other` not already recorded here.
    fn absorb(&mut self, other: RetrievalSession) {
        for id in other.reinforced {
            if !self.reinforced.contains(&id) {
                self.reinforced.push(id);
            }
        }
    }
}

/// Thread-safe session store.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: Arc<DashMap<String, RetrievalSession>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` on the session, creating it if absent.
    ///
    /// `f` works on a detached copy, so no shard lock is held while it does
    /// storage I/O. The copy is merged back afterwards; two overlapping calls
    /// on one session keep both sets of reinforcements but don't link to
    /// each other.
    pub fn with_session<T>(
        &self,
        session_id: &str,
        f: impl FnOnce(&mut RetrievalSession) -> T,
    ) -> T {
        let mut session = self
            .get(session_id)
            .unwrap_or_else(|| RetrievalSession::new(session_id));
        let out = f(&mut session);
        self.merge(session);
        out
    }

    fn merge(&self, session: RetrievalSession) {
        match self.sessions.entry(session.session_id.clone()) {
            Entry::Occupied(mut existing) => existing.get_mut().absorb(session),
            Entry::Vacant(slot) => {
                slot.insert(session);
            }
        }
    }

    /// Cloned snapshot.
    pub fn get(&self, session_id: &str) -> Option<RetrievalSession> {
        self.sessions.get(session_id).map(|s| s.value().clone())
    }

    pub fn end(&self, session_id: &str) -> Option<RetrievalSession> {
        self.sessions.remove(session_id).map(|(_, s)| s)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
