//! # mnemos-retrieval
//!
//! Ranks an agent's active memories by `similarity × retention`, reinforces
//! strong matches, and expands the top hit along its associative links.

pub mod engine;
pub mod query;
pub mod ranking;

pub use engine::RetrievalRanker;
pub use query::{AssociatedMemory, RankedMemory, RetrievalQuery, RetrievalResult};
