//! Candidate filtering, scoring and ordering. Pure functions over memories.

pub mod filter;
pub mod scorer;

pub use filter::CandidateFilter;
pub use scorer::{compare_ranked, rank, score_candidate};
