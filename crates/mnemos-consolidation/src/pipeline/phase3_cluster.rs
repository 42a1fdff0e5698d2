//! Stage 3: group fading memories by embedding similarity.
//!
//! Pairs above the similarity threshold are joined; clusters are the
//! connected components of that graph. Summaries never re-enter a cluster.

use mnemos_core::memory::Memory;
use mnemos_embeddings::cosine_similarity;

use super::StageContext;

/// Union-find with path halving and union by size.
struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        let (big, small) = if self.size[ra] >= self.size[rb] {
            (ra, rb)
        } else {
            (rb, ra)
        };
        self.parent[small] = big;
        self.size[big] += self.size[small];
    }
}

/// Connected components of the "cosine > threshold" graph with at least
/// `min_size` members. Members are in input order; components are ordered by
/// their first member.
pub fn cluster_indices(embeddings: &[&[f32]], threshold: f64, min_size: usize) -> Vec<Vec<usize>> {
    let n = embeddings.len();
    let mut set = DisjointSet::new(n);
    for i in 0..n {
        for j in (i + 1)..n {
            if cosine_similarity(embeddings[i], embeddings[j]) > threshold {
                set.union(i, j);
            }
        }
    }

    let mut by_root: Vec<Vec<usize>> = vec![Vec::new(); n];
    for i in 0..n {
        let root = set.find(i);
        by_root[root].push(i);
    }
    let mut clusters: Vec<Vec<usize>> = by_root
        .into_iter()
        .filter(|members| !members.is_empty() && members.len() >= min_size.max(1))
        .collect();
    clusters.sort_by_key(|members| members[0]);
    clusters
}

pub(crate) fn run(ctx: &StageContext<'_>, decayed: Vec<(Memory, f64)>) -> Vec<Vec<Memory>> {
    let candidates: Vec<Memory> = decayed
        .into_iter()
        .map(|(m, _)| m)
        .filter(|m| !m.is_summary)
        .collect();
    let embeddings: Vec<&[f32]> = candidates.iter().map(|m| m.embedding.as_slice()).collect();
    let groups = cluster_indices(
        &embeddings,
        ctx.config.similarity_threshold,
        ctx.config.min_cluster_size,
    );

    let mut slots: Vec<Option<Memory>> = candidates.into_iter().map(Some).collect();
    groups
        .into_iter()
        .map(|members| members.into_iter().filter_map(|i| slots[i].take()).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, y: f32) -> Vec<f32> {
        vec![x, y, 0.0]
    }

    #[test]
    fn chains_join_through_intermediate_members() {
        // a~b and b~c but not a~c: still one component.
        let a = v(1.0, 0.0);
        let b = v(0.97, 0.243);
        let c = v(0.883, 0.469);
        let d = vec![0.0, 0.0, 1.0];
        let e: Vec<&[f32]> = vec![&a, &b, &c, &d];
        assert_eq!(cluster_indices(&e, 0.95, 1), vec![vec![0, 1, 2], vec![3]]);
        assert_eq!(cluster_indices(&e, 0.95, 2), vec![vec![0, 1, 2]]);
    }

    #[test]
    fn threshold_is_strict() {
        let a = v(1.0, 0.0);
        let b = v(1.0, 0.0);
        let e: Vec<&[f32]> = vec![&a, &b];
        assert!(cluster_indices(&e, 1.0, 2).is_empty());
        assert_eq!(cluster_indices(&e, 0.99, 2), vec![vec![0, 1]]);
    }

    #[test]
    fn empty_or_missing_embeddings_never_join() {
        let a: Vec<f32> = vec![];
        let b: Vec<f32> = vec![];
        let e: Vec<&[f32]> = vec![&a, &b];
        assert!(cluster_indices(&e, 0.5, 2).is_empty());
        assert!(cluster_indices(&[], 0.5, 1).is_empty());
    }
}
