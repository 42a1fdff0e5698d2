use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::memory::MemoryType;
use crate::models::NewMemory;

/// A not-yet-persisted candidate read from the short-term log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortTermRecord {
    pub agent_id: String,
    pub content: String,
    #[serde(default)]
    pub memory_type: MemoryType,
    /// Externally supplied salience. Scored during scan when absent.
    #[serde(default)]
    pub importance: Option<f64>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub event_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub source_channel: Option<String>,
    #[serde(default)]
    pub source_session: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

impl ShortTermRecord {
    /// Convert into creation fields with the importance decided by scan.
    pub fn to_new_memory(&self, importance: f64) -> NewMemory {
        NewMemory {
            agent_id: self.agent_id.clone(),
            content: self.content.clone(),
            memory_type: self.memory_type,
            importance: Some(importance),
            stability: None,
            topics: self.topics.clone(),
            event_date: self.event_date.or(Some(self.recorded_at)),
            expires_at: self.expires_at,
            source_channel: self.source_channel.clone(),
            source_session: self.source_session.clone(),
            skip_dedup: true,
        }
    }
}
