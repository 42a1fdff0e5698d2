use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::MnemosResult;
use crate::memory::{normalize_topics, Importance, Memory, MemoryType, Stability};

/// Caller-supplied fields for a memory that does not exist yet.
///
/// `importance` and `stability` stay raw until [`NewMemory::into_memory`]
/// so out-of-range input is reported as a validation error, not clamped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewMemory {
    pub agent_id: String,
    pub content: String,
    pub memory_type: MemoryType,
    /// `None` means "score it if a scorer is configured, else default".
    pub importance: Option<f64>,
    pub stability: Option<f64>,
    pub topics: Vec<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub source_channel: Option<String>,
    pub source_session: Option<String>,
    /// Store even when a near-duplicate already exists.
    pub skip_dedup: bool,
}

impl NewMemory {
    pub fn new(agent_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn with_type(mut self, memory_type: MemoryType) -> Self {
        self.memory_type = memory_type;
        self
    }

    pub fn with_importance(mut self, importance: f64) -> Self {
        self.importance = Some(importance);
        self
    }

    pub fn with_stability(mut self, stability: f64) -> Self {
        self.stability = Some(stability);
        self
    }

    pub fn with_topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topics = topics.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_source(mut self, channel: Option<String>, session: Option<String>) -> Self {
        self.source_channel = channel;
        self.source_session = session;
        self
    }

    pub fn skip_dedup(mut self) -> Self {
        self.skip_dedup = true;
        self
    }

    /// Validate the raw scores without consuming the value.
    pub fn validate(&self) -> MnemosResult<()> {
        if let Some(i) = self.importance {
            Importance::try_new(i)?;
        }
        if let Some(s) = self.stability {
            Stability::try_new(s)?;
        }
        Ok(())
    }

    /// Build the persisted record. `now` stamps creation and last access.
    pub fn into_memory(
        self,
        id: String,
        embedding: Vec<f32>,
        now: DateTime<Utc>,
    ) -> MnemosResult<Memory> {
        let importance = match self.importance {
            Some(i) => Importance::try_new(i)?,
            None => Importance::default(),
        };
        let stability = match self.stability {
            Some(s) => Stability::try_new(s)?,
            None => Stability::default(),
        };
        let memory = Memory {
            id,
            content_hash: Memory::compute_content_hash(&self.content),
            agent_id: self.agent_id,
            content: self.content,
            embedding,
            memory_type: self.memory_type,
            topics: normalize_topics(&self.topics),
            created_at: now,
            event_date: self.event_date,
            expires_at: self.expires_at,
            importance,
            stability,
            last_accessed: now,
            access_count: 0,
            source_channel: self.source_channel,
            source_session: self.source_session,
            is_summary: false,
            summarizes: Vec::new(),
            is_deleted: false,
        };
        memory.validate()?;
        Ok(memory)
    }
}
