//! # mnemos-core
//!
//! Foundation crate for the Mnemos memory store.
//! Defines the memory model, capability traits, errors, and config.
//! Every other crate in the workspace depends on this.

pub mod bounded;
pub mod config;
pub mod errors;
pub mod memory;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::MnemosConfig;
pub use errors::{MnemosError, MnemosResult};
pub use memory::{Importance, LinkType, Memory, MemoryLink, MemoryType, Stability};
pub use models::{ConsolidationReport, NewMemory, ShortTermRecord};
pub use traits::{Clock, SystemClock};
