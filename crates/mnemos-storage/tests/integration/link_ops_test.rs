//! Integration test: symmetric link pairs.

use chrono::Utc;

use mnemos_core::errors::MnemosError;
use mnemos_core::memory::{LinkType, Memory};
use mnemos_core::traits::{ILinkStorage, IMemoryStorage};
use mnemos_storage::StorageEngine;
use test_fixtures::MemoryBuilder;

fn seeded(n: usize, agent: &str) -> (StorageEngine, Vec<Memory>) {
    let engine = StorageEngine::open_in_memory().unwrap();
    let memories: Vec<Memory> = (0..n)
        .map(|i| MemoryBuilder::new(agent, &format!("memory {i}")).build())
        .collect();
    for m in &memories {
        engine.create(m).unwrap();
    }
    (engine, memories)
}

fn bump(by: f64) -> impl FnMut(Option<f64>) -> mnemos_core::MnemosResult<f64> {
    move |current| Ok(current.map_or(0.5, |s| (s + by).min(1.0)))
}

#[test]
fn new_pair_writes_both_directions() {
    let (engine, m) = seeded(2, "agent-a");
    let update = engine
        .upsert_link_pair(&m[0].id, &m[1].id, LinkType::Association, Utc::now(), &mut bump(0.1))
        .unwrap();
    assert!(update.created);
    assert_eq!(update.strength, 0.5);

    let forward = engine.get_link(&m[0].id, &m[1].id).unwrap().unwrap();
    let backward = engine.get_link(&m[1].id, &m[0].id).unwrap().unwrap();
    assert_eq!(forward.strength, 0.5);
    assert_eq!(backward.strength, 0.5);
    assert_eq!(forward.link_type, LinkType::Association);
    assert_eq!(engine.count_links().unwrap(), 2);
}

#[test]
fn update_from_either_side_stays_symmetric() {
    let (engine, m) = seeded(2, "agent-a");
    let now = Utc::now();
    engine
        .upsert_link_pair(&m[0].id, &m[1].id, LinkType::Association, now, &mut bump(0.1))
        .unwrap();
    let update = engine
        .upsert_link_pair(&m[1].id, &m[0].id, LinkType::Association, now, &mut bump(0.2))
        .unwrap();
    assert!(!update.created);
    assert!((update.strength - 0.7).abs() < 1e-9);

    let a = engine.get_link(&m[0].id, &m[1].id).unwrap().unwrap();
    let b = engine.get_link(&m[1].id, &m[0].id).unwrap().unwrap();
    assert_eq!(a.strength, b.strength);
    assert_eq!(engine.count_links().unwrap(), 2);
}

#[test]
fn asymmetric_pair_is_healed_on_next_update() {
    let (engine, m) = seeded(2, "agent-a");
    let now = Utc::now();
    engine
        .upsert_link_pair(&m[0].id, &m[1].id, LinkType::Association, now, &mut bump(0.1))
        .unwrap();
    engine
        .pool()
        .writer
        .with_conn(|conn| {
            conn.execute(
                "UPDATE memory_links SET strength = 0.8 WHERE source_id = ?1",
                [&m[1].id],
            )
            .unwrap();
            Ok(())
        })
        .unwrap();

    let update = engine
        .upsert_link_pair(&m[0].id, &m[1].id, LinkType::Association, now, &mut bump(0.1))
        .unwrap();
    assert!((update.strength - 0.9).abs() < 1e-9);
    let a = engine.get_link(&m[0].id, &m[1].id).unwrap().unwrap();
    let b = engine.get_link(&m[1].id, &m[0].id).unwrap().unwrap();
    assert_eq!(a.strength, b.strength);
}

#[test]
fn self_link_is_rejected() {
    let (engine, m) = seeded(1, "agent-a");
    let err = engine
        .upsert_link_pair(&m[0].id, &m[0].id, LinkType::Association, Utc::now(), &mut bump(0.1))
        .unwrap_err();
    assert!(matches!(err, MnemosError::ValidationError { .. }));
    assert_eq!(engine.count_links().unwrap(), 0);
}

#[test]
fn missing_or_deleted_endpoint_is_not_found() {
    let (engine, m) = seeded(3, "agent-a");
    let err = engine
        .upsert_link_pair(&m[0].id, "ghost", LinkType::Association, Utc::now(), &mut bump(0.1))
        .unwrap_err();
    assert!(matches!(err, MnemosError::MemoryNotFound { .. }));

    let summary = MemoryBuilder::new("agent-a", "gist")
        .summary_of(&[m[2].id.clone()])
        .build();
    engine.compress_cluster(&summary, &[m[2].id.clone()]).unwrap();
    let err = engine
        .upsert_link_pair(&m[0].id, &m[2].id, LinkType::Association, Utc::now(), &mut bump(0.1))
        .unwrap_err();
    assert!(matches!(err, MnemosError::MemoryNotFound { .. }));
}

#[test]
fn cross_agent_link_is_rejected() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let a = MemoryBuilder::new("agent-a", "mine").build();
    let b = MemoryBuilder::new("agent-b", "theirs").build();
    engine.create(&a).unwrap();
    engine.create(&b).unwrap();
    let err = engine
        .upsert_link_pair(&a.id, &b.id, LinkType::Association, Utc::now(), &mut bump(0.1))
        .unwrap_err();
    assert!(matches!(err, MnemosError::ValidationError { .. }));
}

#[test]
fn out_of_range_strength_is_rejected_and_rolled_back() {
    let (engine, m) = seeded(2, "agent-a");
    let err = engine
        .upsert_link_pair(&m[0].id, &m[1].id, LinkType::Association, Utc::now(), &mut |_| {
            Ok(1.5)
        })
        .unwrap_err();
    assert!(matches!(err, MnemosError::ValidationError { .. }));
    assert_eq!(engine.count_links().unwrap(), 0);
}

#[test]
fn links_from_filters_strictly_and_orders_strongest_first() {
    let (engine, m) = seeded(4, "agent-a");
    let now = Utc::now();
    for (target, strength) in [(1, 0.5), (2, 0.9), (3, 0.7)] {
        engine
            .upsert_link_pair(&m[0].id, &m[target].id, LinkType::Association, now, &mut |_| {
                Ok(strength)
            })
            .unwrap();
    }

    let links = engine.links_from(&m[0].id, 0.5).unwrap();
    let targets: Vec<&str> = links.iter().map(|l| l.target_id.as_str()).collect();
    assert_eq!(targets, vec![m[2].id.as_str(), m[3].id.as_str()]);
}

#[test]
fn links_from_skips_deleted_targets() {
    let (engine, m) = seeded(3, "agent-a");
    let now = Utc::now();
    for target in [1, 2] {
        engine
            .upsert_link_pair(&m[0].id, &m[target].id, LinkType::Temporal, now, &mut bump(0.1))
            .unwrap();
    }
    let summary = MemoryBuilder::new("agent-a", "gist")
        .summary_of(&[m[1].id.clone()])
        .build();
    engine.compress_cluster(&summary, &[m[1].id.clone()]).unwrap();

    let links = engine.links_from(&m[0].id, 0.0).unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].target_id, m[2].id);
    assert_eq!(links[0].link_type, LinkType::Temporal);
}
