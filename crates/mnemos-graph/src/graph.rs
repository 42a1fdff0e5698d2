use std::sync::Arc;

use tracing::debug;

use mnemos_core::config::LinkConfig;
use mnemos_core::errors::{MnemosError, MnemosResult};
use mnemos_core::memory::{LinkType, MemoryLink};
use mnemos_core::traits::{Clock, ILinkStorage, LinkUpdate};

/// Strengthens and reads associative links.
///
/// A new pair starts at `initial_strength` (0.5) regardless of the
/// increment; later calls add the increment and saturate at 1.0. Both
/// directions are written by one storage transaction.
pub struct AssociativeGraph {
    storage: Arc<dyn ILinkStorage>,
    clock: Arc<dyn Clock>,
    config: LinkConfig,
}

impl AssociativeGraph {
    pub fn new(storage: Arc<dyn ILinkStorage>, clock: Arc<dyn Clock>) -> Self {
        Self::with_config(storage, clock, LinkConfig::default())
    }

    pub fn with_config(
        storage: Arc<dyn ILinkStorage>,
        clock: Arc<dyn Clock>,
        config: LinkConfig,
    ) -> Self {
        Self {
            storage,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Strengthen the association between two memories. `None` uses the
    /// configured default increment (0.1).
    pub fn strengthen_link(
        &self,
        source_id: &str,
        target_id: &str,
        increment: Option<f64>,
    ) -> MnemosResult<LinkUpdate> {
        self.strengthen_typed(source_id, target_id, LinkType::Association, increment)
    }

    /// As [`strengthen_link`](Self::strengthen_link) with an explicit type.
    /// The type is recorded on creation; updates keep the original type.
    pub fn strengthen_typed(
        &self,
        source_id: &str,
        target_id: &str,
        link_type: LinkType,
        increment: Option<f64>,
    ) -> MnemosResult<LinkUpdate> {
        let increment = increment.unwrap_or(self.config.default_increment);
        if increment.is_nan() || increment < 0.0 {
            return Err(MnemosError::validation(
                "increment",
                format!("{increment} must be a non-negative number"),
            ));
        }
        let initial = self.config.initial_strength;

        let update = self.storage.upsert_link_pair(
            source_id,
            target_id,
            link_type,
            self.clock.now(),
            &mut |current| Ok(next_strength(current, initial, increment)),
        )?;

        debug!(
            source_id,
            target_id,
            strength = update.strength,
            created = update.created,
            "link strengthened"
        );
        Ok(update)
    }

    /// Links from `memory_id` with strength strictly above `min_strength`,
    /// strongest first. Deleted neighbours are omitted.
    pub fn neighbors(&self, memory_id: &str, min_strength: f64) -> MnemosResult<Vec<MemoryLink>> {
        self.storage.links_from(memory_id, min_strength)
    }

    pub fn get_link(&self, source_id: &str, target_id: &str) -> MnemosResult<Option<MemoryLink>> {
        self.storage.get_link(source_id, target_id)
    }
}

/// `initial` for a new pair, else `min(1, current + increment)`.
pub fn next_strength(current: Option<f64>, initial: f64, increment: f64) -> f64 {
    match current {
        None => initial.clamp(0.0, 1.0),
        Some(s) => (s + increment).min(1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_pair_uses_initial_strength() {
        assert_eq!(next_strength(None, 0.5, 0.3), 0.5);
    }

    #[test]
    fn existing_pair_adds_and_saturates() {
        assert!((next_strength(Some(0.5), 0.5, 0.1) - 0.6).abs() < 1e-12);
        assert_eq!(next_strength(Some(0.95), 0.5, 0.1), 1.0);
        assert_eq!(next_strength(Some(0.7), 0.5, 0.0), 0.7);
    }
}
