use serde::{Deserialize, Serialize};

use mnemos_core::config::defaults::DEFAULT_RETRIEVAL_LIMIT;
use mnemos_core::memory::{Memory, MemoryType};

/// What to retrieve for whom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalQuery {
    pub agent_id: String,
    /// `None` when the query could not be embedded; ranking then falls back
    /// to retention alone and nothing is reinforced.
    pub query_embedding: Option<Vec<f32>>,
    pub limit: usize,
    pub include_associations: bool,
    /// Overrides `retrieval.min_retention` when set.
    #[serde(default)]
    pub min_retention: Option<f64>,
    /// Empty means every type.
    #[serde(default)]
    pub memory_types: Vec<MemoryType>,
}

impl RetrievalQuery {
    pub fn new(agent_id: impl Into<String>, query_embedding: Option<Vec<f32>>) -> Self {
        Self {
            agent_id: agent_id.into(),
            query_embedding,
            limit: DEFAULT_RETRIEVAL_LIMIT,
            include_associations: false,
            min_retention: None,
            memory_types: Vec::new(),
        }
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_associations(mut self, include: bool) -> Self {
        self.include_associations = include;
        self
    }

    pub fn min_retention(mut self, min: f64) -> Self {
        self.min_retention = Some(min);
        self
    }

    pub fn memory_types(mut self, types: impl IntoIterator<Item = MemoryType>) -> Self {
        self.memory_types = types.into_iter().collect();
        self
    }
}

/// One ranked hit. `memory` is the snapshot that was scored, taken before
/// any reinforcement this retrieval triggered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMemory {
    pub memory: Memory,
    /// Cosine similarity to the query; `None` in degraded mode.
    pub similarity: Option<f64>,
    pub retention: f64,
    pub score: f64,
}

/// A memory reached through the top hit's links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociatedMemory {
    pub memory: Memory,
    pub strength: f64,
    pub retention: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub memories: Vec<RankedMemory>,
    /// Ordered by link strength, strongest first.
    pub associations: Vec<AssociatedMemory>,
    /// Ids reinforced by this retrieval.
    pub reinforced: Vec<String>,
    /// True when ranking ran without a query embedding.
    pub degraded: bool,
}

impl RetrievalResult {
    pub fn ids(&self) -> Vec<&str> {
        self.memories.iter().map(|r| r.memory.id.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.memories.is_empty()
    }
}
