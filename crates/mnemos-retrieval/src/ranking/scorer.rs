//! `score = similarity × retention`.
//!
//! Without a query embedding the similarity factor is dropped and retention
//! alone orders the candidates.

use std::cmp::Ordering;

use mnemos_core::memory::Memory;
use mnemos_embeddings::cosine_similarity;

use crate::query::RankedMemory;

/// Score one candidate whose retention is already known. A similarity that
/// isn't finite (a corrupt stored vector) counts as 0.0.
pub fn score_candidate(memory: Memory, query: Option<&[f32]>, retention: f64) -> RankedMemory {
    let similarity = query.map(|q| {
        let s = cosine_similarity(q, &memory.embedding);
        if s.is_finite() {
            s
        } else {
            0.0
        }
    });
    let score = similarity.map_or(retention, |s| s * retention);
    RankedMemory {
        memory,
        similarity,
        retention,
        score,
    }
}

/// Score descending, then most recently accessed, then id for a total order.
pub fn compare_ranked(a: &RankedMemory, b: &RankedMemory) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.memory.last_accessed.cmp(&a.memory.last_accessed))
        .then_with(|| a.memory.id.cmp(&b.memory.id))
}

/// Sort and keep the best `limit`.
pub fn rank(mut scored: Vec<RankedMemory>, limit: usize) -> Vec<RankedMemory> {
    scored.sort_by(compare_ranked);
    scored.truncate(limit);
    scored
}
