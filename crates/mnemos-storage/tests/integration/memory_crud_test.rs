//! Integration test: create, get, query and atomic mutation of memories.

use chrono::{Duration, Utc};

use mnemos_core::errors::MnemosError;
use mnemos_core::memory::{Memory, MemoryType, Stability};
use mnemos_core::traits::IMemoryStorage;
use mnemos_storage::migrations::LATEST_VERSION;
use mnemos_storage::StorageEngine;
use test_fixtures::MemoryBuilder;

#[test]
fn create_then_get_roundtrips_every_field() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let now = Utc::now();
    let memory = MemoryBuilder::new("agent-a", "prefers window seats on long flights")
        .embedding(vec![0.25, -0.5, 1.0])
        .memory_type(MemoryType::Semantic)
        .importance(0.8)
        .stability(0.45)
        .topics(&["travel", "preferences"])
        .at(now - Duration::days(3))
        .expires_at(now + Duration::days(30))
        .access_count(2)
        .build();

    engine.create(&memory).unwrap();
    let loaded = engine.get(&memory.id).unwrap().expect("memory exists");
    assert_eq!(loaded, memory);
}

#[test]
fn get_unknown_is_none() {
    let engine = StorageEngine::open_in_memory().unwrap();
    assert!(engine.get("nope").unwrap().is_none());
}

#[test]
fn invalid_memory_is_rejected() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let memory = MemoryBuilder::new("agent-a", "").build();
    let err = engine.create(&memory).unwrap_err();
    assert!(matches!(err, MnemosError::ValidationError { .. }));
    assert_eq!(engine.count_active("agent-a").unwrap(), 0);
}

#[test]
fn duplicate_id_is_storage_error() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let memory = MemoryBuilder::new("agent-a", "first").id("dup").build();
    engine.create(&memory).unwrap();
    let again = MemoryBuilder::new("agent-a", "second").id("dup").build();
    assert!(matches!(
        engine.create(&again).unwrap_err(),
        MnemosError::StorageError(_)
    ));
}

#[test]
fn queries_are_scoped_to_agent() {
    let engine = StorageEngine::open_in_memory().unwrap();
    for i in 0..3 {
        engine
            .create(&MemoryBuilder::new("agent-a", &format!("a note {i}")).build())
            .unwrap();
    }
    engine
        .create(&MemoryBuilder::new("agent-b", "b note").build())
        .unwrap();

    assert_eq!(engine.count_active("agent-a").unwrap(), 3);
    assert_eq!(engine.list_active("agent-b").unwrap().len(), 1);
    assert!(engine.list_active("agent-c").unwrap().is_empty());
}

#[test]
fn find_by_content_hash_matches_agent_and_hash() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let memory = MemoryBuilder::new("agent-a", "the wifi password is on the fridge").build();
    engine.create(&memory).unwrap();

    let hash = Memory::compute_content_hash("the wifi password is on the fridge");
    let found = engine.find_by_content_hash("agent-a", &hash).unwrap();
    assert_eq!(found.map(|m| m.id), Some(memory.id));
    assert!(engine.find_by_content_hash("agent-b", &hash).unwrap().is_none());
}

#[test]
fn mutate_memory_persists_changes() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let memory = MemoryBuilder::new("agent-a", "gym on tuesdays").stability(0.3).build();
    engine.create(&memory).unwrap();

    let later = memory.last_accessed + Duration::days(7);
    let updated = engine
        .mutate_memory(&memory.id, &mut |m| {
            m.stability = Stability::try_new(0.4)?;
            m.access_count += 1;
            m.last_accessed = later;
            Ok(())
        })
        .unwrap();
    assert_eq!(updated.access_count, 1);

    let loaded = engine.get(&memory.id).unwrap().unwrap();
    assert_eq!(loaded.stability.value(), 0.4);
    assert_eq!(loaded.access_count, 1);
    assert_eq!(loaded.last_accessed, later);
    assert_eq!(loaded.content, memory.content);
}

#[test]
fn mutate_memory_error_rolls_back() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let memory = MemoryBuilder::new("agent-a", "rollback me").build();
    engine.create(&memory).unwrap();

    let err = engine
        .mutate_memory(&memory.id, &mut |m| {
            m.access_count = 99;
            Err(MnemosError::validation("access_count", "rejected"))
        })
        .unwrap_err();
    assert!(matches!(err, MnemosError::ValidationError { .. }));
    assert_eq!(engine.get(&memory.id).unwrap().unwrap().access_count, 0);
}

#[test]
fn mutate_unknown_or_deleted_is_not_found() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let err = engine.mutate_memory("ghost", &mut |_| Ok(())).unwrap_err();
    assert!(matches!(err, MnemosError::MemoryNotFound { .. }));

    let sources: Vec<Memory> = (0..2)
        .map(|i| MemoryBuilder::new("agent-a", &format!("old fact {i}")).build())
        .collect();
    for m in &sources {
        engine.create(m).unwrap();
    }
    let ids: Vec<String> = sources.iter().map(|m| m.id.clone()).collect();
    let summary = MemoryBuilder::new("agent-a", "old facts").summary_of(&ids).build();
    engine.compress_cluster(&summary, &ids).unwrap();

    let err = engine.mutate_memory(&ids[0], &mut |_| Ok(())).unwrap_err();
    assert!(matches!(err, MnemosError::MemoryNotFound { .. }));
}

#[test]
fn file_database_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("persist.db");
    let memory = MemoryBuilder::new("agent-a", "persisted across restarts").build();
    {
        let engine = StorageEngine::open(&path).unwrap();
        engine.create(&memory).unwrap();
    }
    let engine = StorageEngine::open(&path).unwrap();
    assert_eq!(engine.schema_version().unwrap(), LATEST_VERSION);
    assert_eq!(engine.get(&memory.id).unwrap().unwrap().content, memory.content);
}

#[test]
fn list_by_agent_can_include_deleted() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let a = MemoryBuilder::new("agent-a", "a").build();
    engine.create(&a).unwrap();
    let summary = MemoryBuilder::new("agent-a", "gist of a")
        .summary_of(&[a.id.clone()])
        .build();
    engine.compress_cluster(&summary, &[a.id.clone()]).unwrap();

    assert_eq!(engine.list_by_agent("agent-a", false).unwrap().len(), 1);
    assert_eq!(engine.list_by_agent("agent-a", true).unwrap().len(), 2);
    assert!(engine.get(&a.id).unwrap().unwrap().is_deleted);
}
