//! Integration test: concurrent read-modify-write through separate engines
//! on one database file.

use std::sync::Arc;
use std::thread;

use mnemos_core::traits::IMemoryStorage;
use mnemos_storage::StorageEngine;
use test_fixtures::MemoryBuilder;

#[test]
fn concurrent_mutations_from_many_engines_lose_no_updates() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("concurrent.db");
    let memory = MemoryBuilder::new("agent-a", "shared counter").build();
    StorageEngine::open(&db_path).unwrap().create(&memory).unwrap();

    const ENGINES: usize = 4;
    const PER_ENGINE: usize = 25;
    let handles: Vec<_> = (0..ENGINES)
        .map(|_| {
            let path = db_path.clone();
            let id = memory.id.clone();
            thread::spawn(move || {
                // Each engine owns its own writer connection, as a separate process would.
                let engine = StorageEngine::open(&path).unwrap();
                for _ in 0..PER_ENGINE {
                    engine
                        .mutate_memory(&id, &mut |m| {
                            m.access_count += 1;
                            Ok(())
                        })
                        .unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().expect("writer should not panic");
    }

    let engine = StorageEngine::open(&db_path).unwrap();
    let loaded = engine.get(&memory.id).unwrap().unwrap();
    assert_eq!(loaded.access_count, (ENGINES * PER_ENGINE) as u64);
}

#[test]
fn reads_proceed_during_writes() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("readers.db");
    let engine = Arc::new(StorageEngine::open(&db_path).unwrap());

    for i in 0..10 {
        engine
            .create(&MemoryBuilder::new("agent-a", &format!("initial {i}")).build())
            .unwrap();
    }

    let mut readers = vec![];
    for _ in 0..4 {
        let engine = Arc::clone(&engine);
        readers.push(thread::spawn(move || {
            for _ in 0..20 {
                let n = engine.count_active("agent-a").unwrap();
                assert!((10..=20).contains(&n));
            }
        }));
    }

    let writer_engine = Arc::clone(&engine);
    let writer = thread::spawn(move || {
        for i in 0..10 {
            writer_engine
                .create(&MemoryBuilder::new("agent-a", &format!("later {i}")).build())
                .unwrap();
        }
    });

    writer.join().expect("writer should not panic");
    for r in readers {
        r.join().expect("reader should not panic");
    }
    assert_eq!(engine.count_active("agent-a").unwrap(), 20);
}

#[test]
fn file_database_runs_in_wal_mode() {
    let dir = tempfile::tempdir().unwrap();
    let engine = StorageEngine::open(&dir.path().join("wal.db")).unwrap();
    let wal = engine
        .pool()
        .writer
        .with_conn(mnemos_storage::pool::pragmas::verify_wal_mode)
        .unwrap();
    assert!(wal);
}
