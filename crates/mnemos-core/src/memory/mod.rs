//! Memory model: the memory record, its type, score newtypes, and links.

pub mod base;
pub mod links;
pub mod memory_type;
pub mod scores;

pub use base::{normalize_topics, Memory};
pub use links::{LinkType, MemoryLink};
pub use memory_type::MemoryType;
pub use scores::{Importance, Stability};
