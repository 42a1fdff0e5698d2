use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pipeline stage a report entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsolidationStage {
    Scan,
    DecaySweep,
    Cluster,
    Compress,
    Promote,
}

impl std::fmt::Display for ConsolidationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Scan => "scan",
            Self::DecaySweep => "decay_sweep",
            Self::Cluster => "cluster",
            Self::Compress => "compress",
            Self::Promote => "promote",
        };
        f.write_str(s)
    }
}

/// A memory whose retention fell below the fading threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecayedMemory {
    pub id: String,
    pub retention: f64,
}

/// One cluster replaced by one summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressedCluster {
    pub summary_id: String,
    pub source_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromotionCandidate {
    pub id: String,
    pub stability: f64,
    pub access_count: u64,
}

/// A unit of work that failed without stopping the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageError {
    pub stage: ConsolidationStage,
    /// Record, memory, or cluster id when the failure is unit-scoped.
    pub unit: Option<String>,
    pub message: String,
}

/// Result of one consolidation run for one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidationReport {
    pub agent_id: String,
    pub started_at: DateTime<Utc>,
    /// Ids of memories created by the scan stage.
    pub admitted: Vec<String>,
    pub decayed: Vec<DecayedMemory>,
    pub compressed: Vec<CompressedCluster>,
    pub promotion_candidates: Vec<PromotionCandidate>,
    pub errors: Vec<StageError>,
}

impl ConsolidationReport {
    pub fn new(agent_id: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            agent_id: agent_id.into(),
            started_at,
            admitted: Vec::new(),
            decayed: Vec::new(),
            compressed: Vec::new(),
            promotion_candidates: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn record_error(
        &mut self,
        stage: ConsolidationStage,
        unit: Option<&str>,
        message: impl Into<String>,
    ) {
        self.errors.push(StageError {
            stage,
            unit: unit.map(str::to_string),
            message: message.into(),
        });
    }

    pub fn errors_for(&self, stage: ConsolidationStage) -> impl Iterator<Item = &StageError> {
        self.errors.iter().filter(move |e| e.stage == stage)
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}
