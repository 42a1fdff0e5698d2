//! Exponential forgetting curve.
//!
//! ```text
//! importance_boost = 1 + 2 × importance
//! decay_constant   = max(1, stability × importance_boost × 30)
//! retention        = clamp(exp(−days_elapsed / decay_constant), 0, 1)
//! ```

use chrono::{DateTime, Utc};
use tracing::debug;

use mnemos_core::config::DecayConfig;
use mnemos_core::errors::{MnemosError, MnemosResult};
use mnemos_core::memory::{Importance, Memory, MemoryType, Stability};

/// Days of decay constant per unit of boosted stability.
pub const BASE_DECAY_DAYS: f64 = 30.0;
/// Multiplier applied to importance inside the boost.
pub const IMPORTANCE_BOOST_FACTOR: f64 = 2.0;
/// Floor for the decay constant so zero-stability memories still decay smoothly.
pub const MIN_DECAY_CONSTANT: f64 = 1.0;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Fractional days from `from` to `to`. Negative when `to` precedes `from`.
pub fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / MILLIS_PER_DAY
}

/// `max(1, stability × (1 + 2 × importance) × 30)`, in days.
pub fn decay_constant(stability: Stability, importance: Importance) -> f64 {
    let boost = 1.0 + IMPORTANCE_BOOST_FACTOR * importance.value();
    (stability.value() * boost * BASE_DECAY_DAYS).max(MIN_DECAY_CONSTANT)
}

/// Retention after `days_elapsed` days. Fails on negative or NaN elapsed time.
pub fn retention_after_days(
    stability: Stability,
    importance: Importance,
    days_elapsed: f64,
) -> MnemosResult<f64> {
    if days_elapsed.is_nan() || days_elapsed < 0.0 {
        return Err(MnemosError::validation(
            "days_elapsed",
            format!("{days_elapsed} is negative"),
        ));
    }
    let k = decay_constant(stability, importance);
    Ok((-days_elapsed / k).exp().clamp(0.0, 1.0))
}

/// Retention of a memory last accessed at `last_accessed`, evaluated at `now`.
pub fn retention(
    stability: Stability,
    importance: Importance,
    last_accessed: DateTime<Utc>,
    now: DateTime<Utc>,
) -> MnemosResult<f64> {
    if last_accessed > now {
        return Err(MnemosError::validation(
            "last_accessed",
            format!("{last_accessed} is after {now}"),
        ));
    }
    retention_after_days(stability, importance, days_between(last_accessed, now))
}

/// Elapsed days at which retention drops to `target` (in (0, 1]).
pub fn days_until(stability: Stability, importance: Importance, target: f64) -> MnemosResult<f64> {
    if target.is_nan() || target <= 0.0 || target > 1.0 {
        return Err(MnemosError::validation(
            "target",
            format!("{target} is outside (0, 1]"),
        ));
    }
    Ok(decay_constant(stability, importance) * -target.ln())
}

/// Retention with the per-type policy applied.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetentionModel {
    /// Procedural memories never decay when set.
    exempt_procedural: bool,
}

impl RetentionModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &DecayConfig) -> Self {
        Self {
            exempt_procedural: config.exempt_procedural,
        }
    }

    pub fn with_procedural_exemption(mut self, exempt: bool) -> Self {
        self.exempt_procedural = exempt;
        self
    }

    pub fn exempts_procedural(&self) -> bool {
        self.exempt_procedural
    }

    /// A `last_accessed` ahead of `now` (another process's clock running
    /// fast) counts as accessed just now.
    pub fn retention_of(&self, memory: &Memory, now: DateTime<Utc>) -> MnemosResult<f64> {
        if self.exempt_procedural && memory.memory_type == MemoryType::Procedural {
            return Ok(1.0);
        }
        if memory.last_accessed > now {
            debug!(
                memory_id = %memory.id,
                ahead_ms = (memory.last_accessed - now).num_milliseconds(),
                "last access ahead of clock, treating as fresh"
            );
        }
        let at = now.max(memory.last_accessed);
        retention(memory.stability, memory.importance, memory.last_accessed, at)
    }
}
