use chrono::{DateTime, Utc};

use mnemos_core::memory::{Importance, Memory, MemoryType, Stability};

/// Builds a [`Memory`] directly, bypassing ingestion. Timestamps default to
/// `Utc::now()`; pin them with [`MemoryBuilder::at`] for deterministic tests.
#[derive(Debug, Clone)]
pub struct MemoryBuilder {
    memory: Memory,
}

impl MemoryBuilder {
    pub fn new(agent_id: &str, content: &str) -> Self {
        let now = Utc::now();
        Self {
            memory: Memory {
                id: Memory::new_id(),
                agent_id: agent_id.to_string(),
                content: content.to_string(),
                embedding: Vec::new(),
                memory_type: MemoryType::Episodic,
                topics: Vec::new(),
                created_at: now,
                event_date: None,
                expires_at: None,
                importance: Importance::default(),
                stability: Stability::default(),
                last_accessed: now,
                access_count: 0,
                source_channel: None,
                source_session: None,
                is_summary: false,
                summarizes: Vec::new(),
                is_deleted: false,
                content_hash: Memory::compute_content_hash(content),
            },
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.memory.id = id.to_string();
        self
    }

    pub fn embedding(mut self, embedding: Vec<f32>) -> Self {
        self.memory.embedding = embedding;
        self
    }

    pub fn memory_type(mut self, memory_type: MemoryType) -> Self {
        self.memory.memory_type = memory_type;
        self
    }

    pub fn importance(mut self, v: f64) -> Self {
        self.memory.importance = Importance::try_new(v).expect("importance in range");
        self
    }

    pub fn stability(mut self, v: f64) -> Self {
        self.memory.stability = Stability::try_new(v).expect("stability in range");
        self
    }

    /// Set both creation and last access.
    pub fn at(mut self, t: DateTime<Utc>) -> Self {
        self.memory.created_at = t;
        self.memory.last_accessed = t;
        self
    }

    pub fn last_accessed(mut self, t: DateTime<Utc>) -> Self {
        self.memory.last_accessed = t;
        self
    }

    pub fn access_count(mut self, n: u64) -> Self {
        self.memory.access_count = n;
        self
    }

    pub fn topics(mut self, topics: &[&str]) -> Self {
        self.memory.topics = topics.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn expires_at(mut self, t: DateTime<Utc>) -> Self {
        self.memory.expires_at = Some(t);
        self
    }

    pub fn summary_of(mut self, ids: &[String]) -> Self {
        self.memory.is_summary = true;
        self.memory.summarizes = ids.to_vec();
        self
    }

    pub fn build(self) -> Memory {
        self.memory
    }
}

/// Standard basis vector `e_axis` in `dims` dimensions.
pub fn unit_vector(dims: usize, axis: usize) -> Vec<f32> {
    let mut v = vec![0.0; dims];
    v[axis] = 1.0;
    v
}

/// Unit vector whose cosine similarity with `e_toward` is exactly `cos`,
/// with the remainder on `e_away`.
pub fn vector_with_cosine(dims: usize, toward: usize, away: usize, cos: f32) -> Vec<f32> {
    assert_ne!(toward, away);
    let mut v = vec![0.0; dims];
    v[toward] = cos;
    v[away] = (1.0 - cos * cos).max(0.0).sqrt();
    v
}
