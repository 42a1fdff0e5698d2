//! Property tests for clustering, promotion and TextRank.

use proptest::prelude::*;

use mnemos_consolidation::algorithms::textrank::{rank_sentences, top_sentences};
use mnemos_consolidation::pipeline::phase3_cluster::cluster_indices;
use mnemos_consolidation::pipeline::phase5_promote::promotion_candidates;
use mnemos_embeddings::cosine_similarity;
use test_fixtures::MemoryBuilder;

fn embeddings() -> impl Strategy<Value = Vec<Vec<f32>>> {
    prop::collection::vec(prop::collection::vec(-1.0f32..1.0, 4), 0..24)
}

proptest! {
    #[test]
    fn clusters_partition_and_respect_min_size(
        vectors in embeddings(),
        threshold in 0.0f64..0.99,
        min_size in 1usize..6,
    ) {
        let refs: Vec<&[f32]> = vectors.iter().map(Vec::as_slice).collect();
        let clusters = cluster_indices(&refs, threshold, min_size);

        let mut seen = vec![false; vectors.len()];
        for members in &clusters {
            prop_assert!(members.len() >= min_size);
            prop_assert!(members.windows(2).all(|w| w[0] < w[1]));
            for &i in members {
                prop_assert!(!seen[i], "index {} in two clusters", i);
                seen[i] = true;
            }
        }
        prop_assert!(clusters.windows(2).all(|w| w[0][0] < w[1][0]));

        // No edge crosses two different clusters.
        for (a, ca) in clusters.iter().enumerate() {
            for cb in clusters.iter().skip(a + 1) {
                for &i in ca {
                    for &j in cb {
                        prop_assert!(cosine_similarity(refs[i], refs[j]) <= threshold);
                    }
                }
            }
        }
    }

    #[test]
    fn min_size_one_covers_every_index(vectors in embeddings(), threshold in 0.0f64..0.99) {
        let refs: Vec<&[f32]> = vectors.iter().map(Vec::as_slice).collect();
        let total: usize = cluster_indices(&refs, threshold, 1).iter().map(Vec::len).sum();
        prop_assert_eq!(total, vectors.len());
    }

    #[test]
    fn promotion_candidates_satisfy_thresholds(
        cases in prop::collection::vec((0.0f64..=1.0, 0u64..10, any::<bool>()), 0..20),
    ) {
        let memories: Vec<_> = cases
            .iter()
            .enumerate()
            .map(|(i, (stability, hits, summary))| {
                let mut b = MemoryBuilder::new("agent", &format!("m{i}"))
                    .stability(*stability)
                    .access_count(*hits);
                if *summary {
                    b = b.summary_of(&["src".to_string()]);
                }
                b.build()
            })
            .collect();
        let picked = promotion_candidates(&memories, 0.9, 3);
        for c in &picked {
            prop_assert!(c.stability > 0.9);
            prop_assert!(c.access_count > 3);
        }
        let expected = memories
            .iter()
            .filter(|m| !m.is_summary && m.stability.value() > 0.9 && m.access_count > 3)
            .count();
        prop_assert_eq!(picked.len(), expected);
        prop_assert!(picked.windows(2).all(|w| w[0].stability >= w[1].stability));
    }

    #[test]
    fn textrank_scores_every_sentence(
        words in prop::collection::vec("[a-z]{3,8}( [a-z]{3,8}){0,6}", 0..10),
        k in 1usize..5,
    ) {
        let scores = rank_sentences(&words);
        prop_assert_eq!(scores.len(), words.len());
        prop_assert!(scores.iter().all(|s| s.is_finite() && *s > 0.0));

        let top = top_sentences(&words, k);
        prop_assert_eq!(top.len(), k.min(words.len()));
        prop_assert!(top.windows(2).all(|w| w[0] < w[1]));
    }
}
