//! Periodic consolidation on the tokio runtime.

pub mod scheduler;

pub use scheduler::{ConsolidationScheduler, SchedulerHandle};
