//! Integration tests for sharing RRB-Trees across threads.
//!
//! With the `arc` feature the nodes are reference counted atomically, so
//! immutable trees and their derived versions can cross thread boundaries.

#![cfg(feature = "arc")]

use lambars_rrb::persistent::RrbTree;
use rstest::rstest;
use std::sync::Arc;
use std::thread;

static_assertions::assert_impl_all!(RrbTree<i32>: Send, Sync);

#[rstest]
fn test_cross_thread_structural_sharing() {
    let original: Arc<RrbTree<usize>> = Arc::new((0..5000).collect());

    let handles: Vec<_> = (0..4)
        .map(|index| {
            let shared = Arc::clone(&original);
            thread::spawn(move || {
                let edited = shared
                    .insert(index * 1000, usize::MAX)
                    .unwrap()
                    .replace(0, index)
                    .unwrap();
                assert_eq!(shared.len(), 5000);
                assert_eq!(shared.get(0), Some(&0));
                edited
            })
        })
        .collect();

    for (index, handle) in handles.into_iter().enumerate() {
        let edited = handle.join().unwrap();
        assert_eq!(edited.len(), 5001);
        assert_eq!(edited.get(0), Some(&index));
        assert_eq!(edited.check_invariants(), Ok(()));
    }
    assert!(original.iter().copied().eq(0..5000));
}

#[rstest]
fn test_split_on_worker_threads_and_join_on_main() {
    let tree: RrbTree<usize> = (0..8000).collect();
    let (left, right) = tree.split(3000).unwrap();

    let left_handle = thread::spawn(move || left.append(usize::MAX));
    let right_handle = thread::spawn(move || right.reverse());

    let left = left_handle.join().unwrap();
    let right = right_handle.join().unwrap();
    let joined = left.join(&right);

    assert_eq!(joined.len(), 8001);
    assert_eq!(joined.get(3000), Some(&usize::MAX));
    assert_eq!(joined.get(3001), Some(&7999));
    assert_eq!(joined.last(), Some(&3000));
    assert_eq!(joined.check_invariants(), Ok(()));
}
