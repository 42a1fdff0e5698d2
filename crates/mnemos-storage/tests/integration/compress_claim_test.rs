//! Integration test: cluster compression claims its sources exactly once.

use std::thread;

use mnemos_core::errors::MnemosError;
use mnemos_core::memory::Memory;
use mnemos_core::traits::{CompressOutcome, IMemoryStorage};
use mnemos_storage::StorageEngine;
use test_fixtures::MemoryBuilder;

fn cluster(engine: &StorageEngine, agent: &str, n: usize) -> Vec<String> {
    (0..n)
        .map(|i| {
            let m = MemoryBuilder::new(agent, &format!("standup note {i}")).build();
            engine.create(&m).unwrap();
            m.id
        })
        .collect()
}

fn summary_for(agent: &str, ids: &[String]) -> Memory {
    MemoryBuilder::new(agent, "standups covered the release checklist")
        .summary_of(ids)
        .build()
}

#[test]
fn compress_inserts_summary_and_deletes_sources() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let ids = cluster(&engine, "agent-a", 6);
    let summary = summary_for("agent-a", &ids);

    let outcome = engine.compress_cluster(&summary, &ids).unwrap();
    assert_eq!(outcome, CompressOutcome::Compressed);

    let active = engine.list_active("agent-a").unwrap();
    assert_eq!(active.len(), 1);
    assert!(active[0].is_summary);
    assert_eq!(active[0].summarizes.len(), 6);
    for id in &ids {
        assert!(engine.get(id).unwrap().unwrap().is_deleted);
    }
}

#[test]
fn overlapping_second_compression_is_already_claimed() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let ids = cluster(&engine, "agent-a", 3);
    engine
        .compress_cluster(&summary_for("agent-a", &ids), &ids)
        .unwrap();

    let extra = cluster(&engine, "agent-a", 1);
    let overlap = vec![extra[0].clone(), ids[1].clone()];
    let late = summary_for("agent-a", &overlap);
    let outcome = engine.compress_cluster(&late, &overlap).unwrap();
    assert_eq!(
        outcome,
        CompressOutcome::AlreadyClaimed {
            id: ids[1].clone()
        }
    );

    // Nothing written: the late summary is absent and the fresh source untouched.
    assert!(engine.get(&late.id).unwrap().is_none());
    assert!(engine.get(&extra[0]).unwrap().unwrap().is_active());
}

#[test]
fn foreign_or_unknown_source_is_already_claimed() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let mine = cluster(&engine, "agent-a", 2);
    let theirs = cluster(&engine, "agent-b", 1);

    let ids = vec![mine[0].clone(), theirs[0].clone()];
    let outcome = engine
        .compress_cluster(&summary_for("agent-a", &ids), &ids)
        .unwrap();
    assert!(matches!(outcome, CompressOutcome::AlreadyClaimed { id } if id == theirs[0]));

    let ids = vec![mine[1].clone(), "ghost".to_string()];
    let outcome = engine
        .compress_cluster(&summary_for("agent-a", &ids), &ids)
        .unwrap();
    assert!(matches!(outcome, CompressOutcome::AlreadyClaimed { id } if id == "ghost"));
    assert_eq!(engine.count_active("agent-a").unwrap(), 2);
}

#[test]
fn non_summary_or_empty_cluster_is_rejected() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let ids = cluster(&engine, "agent-a", 2);
    let plain = MemoryBuilder::new("agent-a", "not a summary").build();
    assert!(matches!(
        engine.compress_cluster(&plain, &ids).unwrap_err(),
        MnemosError::ValidationError { .. }
    ));
    assert!(matches!(
        engine
            .compress_cluster(&summary_for("agent-a", &ids), &[])
            .unwrap_err(),
        MnemosError::ValidationError { .. }
    ));
}

#[test]
fn racing_compressions_claim_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("race.db");
    let ids = cluster(&StorageEngine::open(&path).unwrap(), "agent-a", 5);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let path = path.clone();
            let ids = ids.clone();
            thread::spawn(move || {
                let engine = StorageEngine::open(&path).unwrap();
                engine
                    .compress_cluster(&summary_for("agent-a", &ids), &ids)
                    .unwrap()
            })
        })
        .collect();
    let outcomes: Vec<CompressOutcome> = handles
        .into_iter()
        .map(|h| h.join().expect("compressor should not panic"))
        .collect();

    let won = outcomes
        .iter()
        .filter(|o| **o == CompressOutcome::Compressed)
        .count();
    assert_eq!(won, 1);

    let engine = StorageEngine::open(&path).unwrap();
    let active = engine.list_active("agent-a").unwrap();
    assert_eq!(active.len(), 1);
    assert!(active[0].is_summary);
}
