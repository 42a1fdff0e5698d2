//! Property tests: links stay symmetric and within [0, 1] under any
//! sequence of strengthenings.

use std::sync::Arc;

use proptest::prelude::*;

use mnemos_core::traits::IMemoryStorage;
use mnemos_core::SystemClock;
use mnemos_graph::AssociativeGraph;
use mnemos_storage::StorageEngine;
use test_fixtures::MemoryBuilder;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_links_symmetric_and_bounded(
        ops in prop::collection::vec((0usize..4, 0usize..4, prop::option::of(0.0f64..0.5)), 1..30),
    ) {
        let storage = Arc::new(StorageEngine::open_in_memory().unwrap());
        let ids: Vec<String> = (0..4)
            .map(|i| {
                let m = MemoryBuilder::new("agent-p", &format!("m{i}")).build();
                storage.create(&m).unwrap();
                m.id
            })
            .collect();
        let graph = AssociativeGraph::new(storage.clone(), Arc::new(SystemClock));

        for (a, b, inc) in ops {
            let result = graph.strengthen_link(&ids[a], &ids[b], inc);
            prop_assert_eq!(result.is_err(), a == b);
        }

        for a in &ids {
            for b in &ids {
                if a == b {
                    continue;
                }
                let ab = graph.get_link(a, b).unwrap().map(|l| l.strength);
                let ba = graph.get_link(b, a).unwrap().map(|l| l.strength);
                prop_assert_eq!(ab, ba);
                if let Some(s) = ab {
                    prop_assert!((0.0..=1.0).contains(&s));
                }
            }
        }
    }
}
