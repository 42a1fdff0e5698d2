//! Spaced-repetition reinforcement.
//!
//! The arithmetic is pure ([`compute`]); the read-modify-write runs inside
//! [`IMemoryStorage::mutate_memory`], which holds an exclusive write lock for
//! the whole update.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use mnemos_core::config::ReinforcementConfig;
use mnemos_core::errors::{MnemosError, MnemosResult};
use mnemos_core::memory::{Memory, Stability};
use mnemos_core::traits::{Clock, IMemoryStorage};

use crate::retention::days_between;

/// Tunables of the spacing bonus. Defaults: 7-day interval, bonus cap 2.0,
/// gain 0.1 per unit of bonus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReinforcementParams {
    pub spacing_interval_days: f64,
    pub max_spacing_bonus: f64,
    pub stability_gain: f64,
}

impl Default for ReinforcementParams {
    fn default() -> Self {
        Self::from(&ReinforcementConfig::default())
    }
}

impl From<&ReinforcementConfig> for ReinforcementParams {
    fn from(c: &ReinforcementConfig) -> Self {
        Self {
            spacing_interval_days: c.spacing_interval_days,
            max_spacing_bonus: c.max_spacing_bonus,
            stability_gain: c.stability_gain,
        }
    }
}

/// What one reinforcement changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReinforcementOutcome {
    pub days_since_access: f64,
    pub spacing_bonus: f64,
    pub old_stability: f64,
    pub new_stability: f64,
    pub access_count: u64,
}

/// `spacing_bonus = min(max_bonus, days / interval)` with days clamped at zero.
pub fn spacing_bonus(params: &ReinforcementParams, days_since_access: f64) -> f64 {
    let days = days_since_access.max(0.0);
    (days / params.spacing_interval_days).min(params.max_spacing_bonus)
}

/// New stability after a reinforcement `days_since_access` days after the last one.
/// Never lower than `stability`, never above 1.0.
pub fn compute(
    params: &ReinforcementParams,
    stability: Stability,
    days_since_access: f64,
) -> (f64, Stability) {
    let bonus = spacing_bonus(params, days_since_access);
    let next = (stability.value() + params.stability_gain * bonus).min(1.0);
    (bonus, Stability::clamped(next.max(stability.value())))
}

/// Applies reinforcement to stored memories.
pub struct ReinforcementEngine {
    storage: Arc<dyn IMemoryStorage>,
    clock: Arc<dyn Clock>,
    params: ReinforcementParams,
}

impl ReinforcementEngine {
    pub fn new(storage: Arc<dyn IMemoryStorage>, clock: Arc<dyn Clock>) -> Self {
        Self {
            storage,
            clock,
            params: ReinforcementParams::default(),
        }
    }

    pub fn with_params(mut self, params: ReinforcementParams) -> Self {
        self.params = params;
        self
    }

    pub fn params(&self) -> &ReinforcementParams {
        &self.params
    }

    /// Reinforce one memory atomically: bump stability by the spacing bonus,
    /// stamp `last_accessed`, increment `access_count`.
    ///
    /// `MemoryNotFound` for unknown or soft-deleted ids. Lock contention past
    /// the storage busy timeout surfaces as `ConflictError`.
    pub fn reinforce(&self, memory_id: &str) -> MnemosResult<ReinforcementOutcome> {
        let now = self.clock.now();
        let params = self.params;
        let mut outcome = None;

        self.storage.mutate_memory(memory_id, &mut |memory| {
            let applied = apply(&params, memory, now);
            outcome = Some(applied);
            Ok(())
        })?;

        let outcome = outcome.ok_or_else(|| MnemosError::not_found(memory_id))?;
        debug!(
            memory_id,
            old_stability = outcome.old_stability,
            new_stability = outcome.new_stability,
            spacing_bonus = outcome.spacing_bonus,
            access_count = outcome.access_count,
            "memory reinforced"
        );
        Ok(outcome)
    }
}

/// Mutate `memory` in place. Exposed for storage-free callers and tests.
pub fn apply(
    params: &ReinforcementParams,
    memory: &mut Memory,
    now: DateTime<Utc>,
) -> ReinforcementOutcome {
    let days = days_between(memory.last_accessed, now).max(0.0);
    let old = memory.stability;
    let (bonus, new) = compute(params, old, days);
    memory.stability = new;
    // A clock behind the stored timestamp must not move last_accessed backwards.
    memory.last_accessed = memory.last_accessed.max(now);
    memory.access_count = memory.access_count.saturating_add(1);
    ReinforcementOutcome {
        days_since_access: days,
        spacing_bonus: bonus,
        old_stability: old.value(),
        new_stability: new.value(),
        access_count: memory.access_count,
    }
}
