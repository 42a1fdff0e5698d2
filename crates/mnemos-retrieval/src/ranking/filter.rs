//! Which of an agent's memories are eligible for ranking at all.

use chrono::{DateTime, Utc};

use mnemos_core::memory::{Memory, MemoryType};

/// Structural eligibility: owner, liveness, type, expiry. Retention is
/// checked separately because it can fail to compute.
#[derive(Debug, Clone)]
pub struct CandidateFilter<'a> {
    pub agent_id: &'a str,
    pub memory_types: &'a [MemoryType],
    pub include_expired: bool,
    pub now: DateTime<Utc>,
}

impl CandidateFilter<'_> {
    pub fn admits(&self, memory: &Memory) -> bool {
        memory.agent_id == self.agent_id
            && memory.is_active()
            && (self.memory_types.is_empty() || self.memory_types.contains(&memory.memory_type))
            && (self.include_expired || !memory.is_expired(self.now))
    }
}
