use serde::{Deserialize, Serialize};

use super::defaults;

/// Decay subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecayConfig {
    /// Retention below which a memory counts as fading.
    pub fading_threshold: f64,
    /// Treat procedural memories as non-decaying (retention pinned at 1.0).
    pub exempt_procedural: bool,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            fading_threshold: defaults::DEFAULT_FADING_THRESHOLD,
            exempt_procedural: defaults::DEFAULT_EXEMPT_PROCEDURAL,
        }
    }
}

/// Reinforcement (spaced repetition) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReinforcementConfig {
    /// Days of spacing worth one unit of bonus.
    pub spacing_interval_days: f64,
    /// Upper bound on the spacing bonus.
    pub max_spacing_bonus: f64,
    /// Stability gained per unit of spacing bonus.
    pub stability_gain: f64,
}

impl Default for ReinforcementConfig {
    fn default() -> Self {
        Self {
            spacing_interval_days: defaults::DEFAULT_SPACING_INTERVAL_DAYS,
            max_spacing_bonus: defaults::DEFAULT_MAX_SPACING_BONUS,
            stability_gain: defaults::DEFAULT_STABILITY_GAIN,
        }
    }
}

/// Associative link configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Strength given to a link on first creation.
    pub initial_strength: f64,
    /// Increment applied when no explicit increment is passed.
    pub default_increment: f64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            initial_strength: defaults::DEFAULT_INITIAL_LINK_STRENGTH,
            default_increment: defaults::DEFAULT_LINK_INCREMENT,
        }
    }
}
