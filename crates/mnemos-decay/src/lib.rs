//! # mnemos-decay
//!
//! Retention model (exponential forgetting curve scaled by stability and
//! importance), spaced-repetition reinforcement, and the decay sweep that
//! partitions an agent's memories into fading and retained.

pub mod engine;
pub mod reinforcement;
pub mod retention;

pub use engine::{DecayEngine, DecaySweep};
pub use reinforcement::{ReinforcementEngine, ReinforcementOutcome, ReinforcementParams};
pub use retention::{days_between, RetentionModel};
