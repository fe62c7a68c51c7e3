//! Fuzz target for tree hash operations
//!
//! Checks that streaming, reader-based and leaf-level hashing agree on
//! arbitrary input and arbitrary split points.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;
use treehash_core::tree_hash::{
    compute_tree_hash_from_data, compute_tree_root, reduce_level, IncrementalTreeHasher,
};
use treehash_core::{leaf_count, ChunkDigester, TreeReducer};

#[derive(Debug, Arbitrary)]
struct TreeHashInput {
    data: Vec<u8>,
    splits: Vec<u16>,
    chunk_index: usize,
    leaf_data: Vec<u8>,
}

fuzz_target!(|input: TreeHashInput| {
    let tree = compute_tree_hash_from_data(&input.data);
    assert_eq!(tree.chunk_count() as u64, leaf_count(input.data.len() as u64));

    // Reader path must agree with the in-memory path
    let leaves = ChunkDigester::new()
        .digest_reader(Cursor::new(&input.data))
        .expect("in-memory reads cannot fail");
    assert_eq!(leaves, tree.leaves);
    assert_eq!(TreeReducer::new().reduce(&leaves), tree.root);

    // Split points must not matter
    let mut hasher = IncrementalTreeHasher::new();
    let mut rest = &input.data[..];
    for split in input.splits {
        let take = (split as usize).min(rest.len());
        hasher.update(&rest[..take]);
        rest = &rest[take..];
    }
    hasher.update(rest);
    assert_eq!(hasher.finalize(), tree);

    // Verifying an arbitrary index must never panic
    let _ = tree.verify_chunk(input.chunk_index, &input.data);

    // Reduce arbitrary leaf digests
    let leaves: Vec<[u8; 32]> = input
        .leaf_data
        .chunks(32)
        .map(|chunk| {
            let mut hash = [0u8; 32];
            hash[..chunk.len()].copy_from_slice(chunk);
            hash
        })
        .collect();

    match compute_tree_root(&leaves) {
        Ok(_) => assert_eq!(reduce_level(&leaves).len(), leaves.len().div_ceil(2)),
        Err(_) => assert!(leaves.is_empty()),
    }
});
