//! TextRank: sentences as nodes, TF-IDF cosine as edge weights, PageRank
//! iteration over the weighted graph.

use super::tfidf::{document_vectors, sparse_cosine, tokenize};

const DAMPING: f64 = 0.85;
const CONVERGENCE: f64 = 1e-6;
const MAX_ITERATIONS: usize = 100;

/// Score every sentence. Sentences with no edges keep the teleport mass only.
pub fn rank_sentences(sentences: &[String]) -> Vec<f64> {
    let n = sentences.len();
    match n {
        0 => return Vec::new(),
        1 => return vec![1.0],
        _ => {}
    }

    let tokens: Vec<Vec<String>> = sentences.iter().map(|s| tokenize(s)).collect();
    let vectors = document_vectors(&tokens);

    let mut weights = vec![vec![0.0f64; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let w = sparse_cosine(&vectors[i], &vectors[j]);
            weights[i][j] = w;
            weights[j][i] = w;
        }
    }
    let out_sums: Vec<f64> = weights.iter().map(|row| row.iter().sum()).collect();

    let base = (1.0 - DAMPING) / n as f64;
    let mut scores = vec![1.0 / n as f64; n];
    for _ in 0..MAX_ITERATIONS {
        let next: Vec<f64> = (0..n)
            .map(|i| {
                let inbound: f64 = (0..n)
                    .filter(|&j| j != i && out_sums[j] > f64::EPSILON)
                    .map(|j| weights[j][i] * scores[j] / out_sums[j])
                    .sum();
                base + DAMPING * inbound
            })
            .collect();
        let delta = next
            .iter()
            .zip(&scores)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);
        scores = next;
        if delta < CONVERGENCE {
            break;
        }
    }
    scores
}

/// Indices of the `k` best sentences, returned in their original order.
/// Equal scores prefer the earlier sentence.
pub fn top_sentences(sentences: &[String], k: usize) -> Vec<usize> {
    if sentences.len() <= k {
        return (0..sentences.len()).collect();
    }
    let scores = rank_sentences(sentences);
    let mut order: Vec<usize> = (0..sentences.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]).then(a.cmp(&b)));
    let mut top: Vec<usize> = order.into_iter().take(k).collect();
    top.sort_unstable();
    top
}
