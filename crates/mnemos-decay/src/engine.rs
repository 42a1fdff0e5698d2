use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use mnemos_core::config::DecayConfig;
use mnemos_core::errors::MnemosError;
use mnemos_core::memory::Memory;

use crate::retention::RetentionModel;

/// Partition of one agent's memories by current retention.
#[derive(Debug, Default)]
pub struct DecaySweep {
    /// Retention strictly below the fading threshold, with the computed value.
    pub decayed: Vec<(Memory, f64)>,
    pub retained: Vec<(Memory, f64)>,
    /// Memories whose retention could not be computed.
    pub failed: Vec<(String, MnemosError)>,
}

impl DecaySweep {
    pub fn decayed_ids(&self) -> Vec<String> {
        self.decayed.iter().map(|(m, _)| m.id.clone()).collect()
    }
}

/// Applies the retention model to batches of memories.
#[derive(Debug, Clone, Copy)]
pub struct DecayEngine {
    model: RetentionModel,
    fading_threshold: f64,
}

impl DecayEngine {
    /// Uniform decay with the default fading threshold (0.3).
    pub fn new() -> Self {
        Self::from_config(&DecayConfig::default())
    }

    pub fn from_config(config: &DecayConfig) -> Self {
        Self {
            model: RetentionModel::from_config(config),
            fading_threshold: config.fading_threshold,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.fading_threshold = threshold;
        self
    }

    pub fn fading_threshold(&self) -> f64 {
        self.fading_threshold
    }

    pub fn model(&self) -> &RetentionModel {
        &self.model
    }

    /// Compute retention for every active memory and split by the fading
    /// threshold. Soft-deleted input is ignored.
    pub fn sweep(&self, memories: Vec<Memory>, now: DateTime<Utc>) -> DecaySweep {
        let mut out = DecaySweep::default();
        for memory in memories.into_iter().filter(Memory::is_active) {
            match self.model.retention_of(&memory, now) {
                Ok(r) if r < self.fading_threshold => out.decayed.push((memory, r)),
                Ok(r) => out.retained.push((memory, r)),
                Err(e) => {
                    warn!(memory_id = %memory.id, error = %e, "retention not computable");
                    out.failed.push((memory.id, e));
                }
            }
        }
        debug!(
            decayed = out.decayed.len(),
            retained = out.retained.len(),
            failed = out.failed.len(),
            threshold = self.fading_threshold,
            "decay sweep complete"
        );
        out
    }
}

impl Default for DecayEngine {
    fn default() -> Self {
        Self::new()
    }
}
