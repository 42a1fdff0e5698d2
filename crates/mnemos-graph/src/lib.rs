//! # mnemos-graph
//!
//! Associative links: a flat, symmetric, weighted relation between memories
//! of one agent. Links are strengthened explicitly or by co-retrieval within
//! a session.

pub mod graph;
pub mod session;

pub use graph::AssociativeGraph;
pub use session::{RetrievalSession, SessionRegistry};
