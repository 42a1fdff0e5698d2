//! Property tests: ranking output is ordered, bounded by `limit`, and
//! independent of candidate input order.

use chrono::{DateTime, Utc};
use proptest::prelude::*;

use mnemos_retrieval::ranking::{rank, score_candidate};
use mnemos_retrieval::RankedMemory;
use test_fixtures::{unit_vector, MemoryBuilder};

const DIMS: usize = 6;

fn candidates(specs: &[(Vec<f32>, f64)]) -> Vec<RankedMemory> {
    let query = unit_vector(DIMS, 0);
    let at: DateTime<Utc> = "2026-03-01T00:00:00Z".parse().unwrap();
    specs
        .iter()
        .enumerate()
        .map(|(i, (embedding, retention))| {
            let m = MemoryBuilder::new("agent-p", &format!("m{i}"))
                .id(&format!("m{i:02}"))
                .embedding(embedding.clone())
                .at(at)
                .build();
            score_candidate(m, Some(&query), *retention)
        })
        .collect()
}

fn spec_strategy() -> impl Strategy<Value = Vec<(Vec<f32>, f64)>> {
    prop::collection::vec(
        (prop::collection::vec(-1.0f32..1.0, DIMS), 0.0f64..=1.0),
        0..20,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_score_bounded_by_retention(specs in spec_strategy()) {
        for r in candidates(&specs) {
            prop_assert!(r.score.abs() <= r.retention + 1e-12);
            prop_assert!((-1.0..=1.0).contains(&r.similarity.unwrap()));
        }
    }

    #[test]
    fn prop_rank_sorted_and_truncated(specs in spec_strategy(), limit in 1usize..10) {
        let n = specs.len();
        let ranked = rank(candidates(&specs), limit);
        prop_assert_eq!(ranked.len(), n.min(limit));
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn prop_rank_ignores_input_order(specs in spec_strategy(), limit in 1usize..10) {
        let forward = rank(candidates(&specs), limit);
        let mut reversed_input = candidates(&specs);
        reversed_input.reverse();
        let backward = rank(reversed_input, limit);
        let ids = |v: &[RankedMemory]| v.iter().map(|r| r.memory.id.clone()).collect::<Vec<_>>();
        prop_assert_eq!(ids(&forward), ids(&backward));
    }
}
