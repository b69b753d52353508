// Copyright (c) 2025 Oak Authors
//
// Licensed under the MIT License (LICENSE or https://opensource.org/licenses/MIT)

//! Integration tests for concurrent access to the path tree.
//! Many threads share one root through an `Arc` and hammer it with
//! overlapping and disjoint operations.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use oak_lib::config::{RouteEntry, TableConfig};
use oak_lib::routes::RouteTable;
use oak_lib::Node;

const THREAD_COUNT: usize = 8;
const OPS_PER_THREAD: usize = 200;

fn path(segments: &[&str]) -> Vec<String> {
    segments.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_disjoint_top_level_writers_lose_nothing() {
    let tree = Arc::new(Node::new());
    let barrier = Arc::new(Barrier::new(THREAD_COUNT));

    let handles: Vec<_> = (0..THREAD_COUNT)
        .map(|thread_id| {
            let tree = Arc::clone(&tree);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let top = format!("writer-{thread_id}");
                for op in 0..OPS_PER_THREAD {
                    let leaf = op.to_string();
                    tree.set(&[top.as_str(), "items", leaf.as_str()], (thread_id, op));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("writer panicked");
    }

    assert_eq!(tree.len(), THREAD_COUNT * OPS_PER_THREAD);
    assert_eq!(tree.child_count(), THREAD_COUNT);
    for thread_id in 0..THREAD_COUNT {
        let top = format!("writer-{thread_id}");
        for op in 0..OPS_PER_THREAD {
            let leaf = op.to_string();
            assert_eq!(
                tree.get(&[top.as_str(), "items", leaf.as_str()]),
                Some((thread_id, op))
            );
        }
    }
}

#[test]
fn test_racing_creation_of_shared_intermediate_nodes() {
    // Every writer creates the same missing intermediate nodes at the same
    // moment; none of the values written beneath them may be dropped.
    for _ in 0..20 {
        let tree = Arc::new(Node::new());
        let barrier = Arc::new(Barrier::new(THREAD_COUNT));

        let handles: Vec<_> = (0..THREAD_COUNT)
            .map(|thread_id| {
                let tree = Arc::clone(&tree);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    let leaf = thread_id.to_string();
                    tree.set(&["shared", "fresh", leaf.as_str()], thread_id);
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("writer panicked");
        }

        assert_eq!(tree.len(), THREAD_COUNT);
        for thread_id in 0..THREAD_COUNT {
            let leaf = thread_id.to_string();
            assert_eq!(tree.get(&["shared", "fresh", leaf.as_str()]), Some(thread_id));
        }
    }
}

#[test]
fn test_same_path_writers_last_writer_wins() {
    let tree = Arc::new(Node::new());
    let barrier = Arc::new(Barrier::new(THREAD_COUNT));
    let target = path(&["contended", "slot"]);

    let handles: Vec<_> = (0..THREAD_COUNT)
        .map(|thread_id| {
            let tree = Arc::clone(&tree);
            let barrier = Arc::clone(&barrier);
            let target = target.clone();
            thread::spawn(move || {
                barrier.wait();
                for op in 0..OPS_PER_THREAD {
                    // Value is internally consistent: both halves come from the same write.
                    let value = format!("{thread_id}:{op}");
                    tree.set(&target, (value.clone(), value));
                }
                format!("{thread_id}:{}", OPS_PER_THREAD - 1)
            })
        })
        .collect();

    let finals: HashSet<String> = handles
        .into_iter()
        .map(|handle| handle.join().expect("writer panicked"))
        .collect();

    let (left, right) = tree.get(&target).expect("value must be present");
    assert_eq!(left, right, "torn value observed");
    assert!(finals.contains(&left), "{left} was not the final write of any thread");
    assert_eq!(tree.len(), 1);
}

#[test]
fn test_readers_never_see_torn_values_during_writes() {
    let tree = Arc::new(Node::new());
    tree.set(&["cat"], (0usize, 0usize));
    let done = Arc::new(AtomicBool::new(false));

    let writer = {
        let tree = Arc::clone(&tree);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            for i in 0..5_000usize {
                tree.set(&["cat", "news", "headlines"], (i, i));
                tree.set(&["cat"], (i, i));
                if i % 7 == 0 {
                    tree.remove(&["cat", "news"]);
                }
            }
            done.store(true, Ordering::SeqCst);
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let tree = Arc::clone(&tree);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut observed = 0usize;
                while !done.load(Ordering::SeqCst) {
                    // "cat" always holds a value, so the longest match never misses.
                    let (a, b) = tree
                        .longest_match(&["cat", "news", "headlines", "today"])
                        .expect("ancestor value must be visible");
                    assert_eq!(a, b);
                    if let Some((a, b)) = tree.get(&["cat", "news", "headlines"]) {
                        assert_eq!(a, b);
                    }
                    observed += 1;
                }
                observed
            })
        })
        .collect();

    writer.join().expect("writer panicked");
    for reader in readers {
        reader.join().expect("reader panicked");
    }

    assert!(tree.contains(&["cat"]));
}

#[test]
fn test_concurrent_removal_and_reads() {
    let tree = Arc::new(Node::new());
    let keys: Vec<String> = (0..THREAD_COUNT * OPS_PER_THREAD)
        .map(|i| format!("key_{i}"))
        .collect();
    for key in &keys {
        tree.set(&["keys", key.as_str()], key.clone());
    }

    let remove_keys: Vec<String> = keys.iter().step_by(2).cloned().collect();
    let read_keys: Vec<String> = keys.iter().skip(1).step_by(2).cloned().collect();

    let remover = {
        let tree = Arc::clone(&tree);
        thread::spawn(move || {
            for key in remove_keys {
                assert!(tree.remove(&["keys", key.as_str()]), "failed to remove {key}");
            }
        })
    };
    let reader = {
        let tree = Arc::clone(&tree);
        thread::spawn(move || {
            for key in read_keys {
                assert_eq!(tree.get(&["keys", key.as_str()]), Some(key.clone()));
            }
        })
    };

    remover.join().expect("remover panicked");
    reader.join().expect("reader panicked");

    assert_eq!(tree.len(), keys.len() / 2);
}

#[test]
fn test_root_replacement_under_load() {
    let table = RouteTable::from_routes(
        &TableConfig::default(),
        &[RouteEntry::new("/", "v0"), RouteEntry::new("/api", "api-v0")],
    )
    .unwrap();
    let root = table.root();
    let done = Arc::new(AtomicBool::new(false));

    let reloader = {
        let table = table.clone();
        let done = Arc::clone(&done);
        thread::spawn(move || {
            for generation in 1..=200 {
                table
                    .reload(&[
                        RouteEntry::new("/", format!("v{generation}")),
                        RouteEntry::new("/api", format!("api-v{generation}")),
                    ])
                    .unwrap();
            }
            done.store(true, Ordering::SeqCst);
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let root = Arc::clone(&root);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                while !done.load(Ordering::SeqCst) {
                    // The root is never without a value across swaps.
                    let target = root
                        .longest_match(&["api", "users"])
                        .expect("a route must always match");
                    assert!(target.starts_with("api-v") || target.starts_with('v'));
                }
            })
        })
        .collect();

    reloader.join().expect("reloader panicked");
    for reader in readers {
        reader.join().expect("reader panicked");
    }

    assert_eq!(root.get(&["api"]).as_deref(), Some("api-v200"));
    assert_eq!(table.resolve("/").unwrap().as_deref(), Some("v200"));
}

#[test]
fn test_subtree_replacement_races_with_writers() {
    let tree = Arc::new(Node::new());
    tree.set(&["zone"], 0u64);
    let barrier = Arc::new(Barrier::new(2));

    let writer = {
        let tree = Arc::clone(&tree);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            for i in 0..1_000u64 {
                tree.set(&["zone", "leaf"], i);
            }
        })
    };
    let replacer = {
        let tree = Arc::clone(&tree);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            for i in 0..1_000u64 {
                assert!(tree.replace(&["zone"], Node::with_value(i)));
            }
        })
    };

    writer.join().expect("writer panicked");
    replacer.join().expect("replacer panicked");

    // Whatever the interleaving, "zone" exists with the replacer's last value
    // and holds at most the one leaf the writer targets.
    assert_eq!(tree.get(&["zone"]), Some(999));
    assert!(tree.len() <= 2);
    assert_eq!(tree.child_count(), 1);
}
