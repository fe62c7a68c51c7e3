//! Integration tests for file-level tree hashing.
//!
//! Exercises the chunk digester and tree reducer together on real files,
//! checking chunk boundaries, the odd-node carry and the hex output against
//! digests computed independently with `sha2`.

use std::io::Cursor;
use treehash_core::tree_hash::{
    IncrementalTreeHasher, compute_tree_hash, compute_tree_hash_from_data, compute_tree_root,
    reduce_level,
};
use treehash_core::{
    CHUNK_SIZE, ChunkDigester, LeafSequence, TreeHashError, TreeReducer, from_hex, leaf_count,
    primitive_for, to_hex,
};
use treehash_integration_tests::{
    combine, patterned, reference_leaves, reference_root, sha256, write_temp,
};

const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

// ============================================================================
// Chunk Boundary Scenarios
// ============================================================================

#[test]
fn test_empty_file_root_is_empty_digest() {
    let file = write_temp(&[]);
    let tree = compute_tree_hash(file.path()).unwrap();

    assert_eq!(tree.chunk_count(), 1);
    assert_eq!(tree.root, sha256(&[]));
    assert_eq!(tree.root_hex(), EMPTY_SHA256);
}

#[test]
fn test_single_chunk_root_is_chunk_digest() {
    for len in [1, 4096, CHUNK_SIZE - 1, CHUNK_SIZE] {
        let data = patterned(len, 7);
        let file = write_temp(&data);
        let tree = compute_tree_hash(file.path()).unwrap();

        assert_eq!(tree.chunk_count(), 1, "len {len}");
        assert_eq!(tree.root, sha256(&data), "len {len}");
    }
}

#[test]
fn test_two_equal_chunks() {
    let data = patterned(2 * CHUNK_SIZE, 3);
    let file = write_temp(&data);
    let tree = compute_tree_hash(file.path()).unwrap();

    let d0 = sha256(&data[..CHUNK_SIZE]);
    let d1 = sha256(&data[CHUNK_SIZE..]);
    assert_eq!(tree.leaves.as_slice(), &[d0, d1]);
    assert_eq!(tree.root, combine(&d0, &d1));
}

#[test]
fn test_one_byte_past_chunk_boundary() {
    let data = patterned(CHUNK_SIZE + 1, 9);
    let file = write_temp(&data);
    let tree = compute_tree_hash(file.path()).unwrap();

    assert_eq!(tree.chunk_count(), 2);
    assert_eq!(tree.get_chunk_hash(1), Some(&sha256(&data[CHUNK_SIZE..])));
}

/// 2 MiB + 1 byte: two full chunks and a one-byte chunk.
#[test]
fn test_two_mib_plus_one_byte() {
    let data = patterned(2_097_153, 1);
    assert_eq!(data.len() as u64, 2 * CHUNK_SIZE as u64 + 1);

    let file = write_temp(&data);
    let mut digester = ChunkDigester::new();
    let leaves = digester.digest_file(file.path()).unwrap();
    assert_eq!(leaves.count(), 3);

    let d0 = sha256(&data[..CHUNK_SIZE]);
    let d1 = sha256(&data[CHUNK_SIZE..2 * CHUNK_SIZE]);
    let d2 = sha256(&data[2 * CHUNK_SIZE..]);
    assert_eq!(leaves.as_slice(), &[d0, d1, d2]);

    let reducer = TreeReducer::new();
    let levels = reducer.levels(&leaves);
    assert_eq!(levels.len(), 3);
    assert_eq!(levels[1], vec![combine(&d0, &d1), d2]);
    assert_eq!(levels[2], vec![combine(&combine(&d0, &d1), &d2)]);
    assert_eq!(reducer.reduce(&leaves), levels[2][0]);
}

#[test]
fn test_many_chunks_match_reference() {
    let data = patterned(7 * CHUNK_SIZE + 12_345, 0x5A);
    let file = write_temp(&data);
    let tree = compute_tree_hash(file.path()).unwrap();

    let leaves = reference_leaves(&data);
    assert_eq!(tree.leaves.as_slice(), leaves.as_slice());
    assert_eq!(tree.root, reference_root(&leaves));
    assert_eq!(tree.chunk_count() as u64, leaf_count(data.len() as u64));
}

// ============================================================================
// Reducer Scenarios
// ============================================================================

#[test]
fn test_single_leaf_needs_no_combine() {
    let leaf = sha256(b"only");
    let leaves = LeafSequence::single(leaf);

    assert_eq!(TreeReducer::new().reduce(&leaves), leaf);
    assert_eq!(TreeReducer::new().levels(&leaves), vec![vec![leaf]]);
}

#[test]
fn test_carry_is_not_rehashed() {
    let leaves: Vec<_> = (0..3u8).map(|b| sha256(&[b])).collect();
    let level = reduce_level(&leaves);

    assert_eq!(level[1], leaves[2]);
    assert_ne!(level[1], sha256(&leaves[2]));
    assert_ne!(level[1], combine(&leaves[2], &leaves[2]));
}

#[test]
fn test_pairing_is_order_sensitive() {
    let a = sha256(b"a");
    let b = sha256(b"b");

    assert_ne!(
        compute_tree_root(&[a, b]).unwrap(),
        compute_tree_root(&[b, a]).unwrap()
    );
}

#[test]
fn test_empty_leaf_slice_is_an_error() {
    assert!(matches!(
        compute_tree_root(&[]),
        Err(TreeHashError::EmptyLeafSequence)
    ));
}

// ============================================================================
// Determinism and Sensitivity
// ============================================================================

#[test]
fn test_repeated_hashing_is_identical() {
    let data = patterned(3 * CHUNK_SIZE + 17, 2);
    let file = write_temp(&data);

    let first = compute_tree_hash(file.path()).unwrap();
    let second = compute_tree_hash(file.path()).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.root_hex(), second.root_hex());
}

#[test]
fn test_reordering_bytes_changes_root() {
    let data = patterned(2 * CHUNK_SIZE + 100, 4);
    let mut swapped = data.clone();
    swapped.swap(10, CHUNK_SIZE + 10);
    assert_ne!(data[10], data[CHUNK_SIZE + 10]);

    let original = compute_tree_hash_from_data(&data);
    let reordered = compute_tree_hash_from_data(&swapped);

    assert_ne!(original.leaves.as_slice()[0], reordered.leaves.as_slice()[0]);
    assert_ne!(original.leaves.as_slice()[1], reordered.leaves.as_slice()[1]);
    assert_eq!(original.leaves.as_slice()[2], reordered.leaves.as_slice()[2]);
    assert_ne!(original.root, reordered.root);
}

// ============================================================================
// Streaming and Readers
// ============================================================================

#[test]
fn test_reader_file_and_incremental_agree() {
    let data = patterned(4 * CHUNK_SIZE + 1, 8);
    let file = write_temp(&data);

    let from_file = compute_tree_hash(file.path()).unwrap();

    let leaves = ChunkDigester::new().digest_reader(Cursor::new(&data)).unwrap();
    assert_eq!(&leaves, &from_file.leaves);

    let mut hasher = IncrementalTreeHasher::new();
    for piece in data.chunks(CHUNK_SIZE / 3) {
        hasher.update(piece);
    }
    assert_eq!(hasher.finalize(), from_file);
}

#[test]
fn test_chunk_verification_against_file_tree() {
    let data = patterned(3 * CHUNK_SIZE, 6);
    let file = write_temp(&data);
    let tree = compute_tree_hash(file.path()).unwrap();

    for (index, chunk) in data.chunks(CHUNK_SIZE).enumerate() {
        assert!(tree.verify_chunk(index, chunk));
    }
    assert!(!tree.verify_chunk(0, &data[CHUNK_SIZE..2 * CHUNK_SIZE]));
    assert!(!tree.verify_chunk(3, &data[..CHUNK_SIZE]));
}

// ============================================================================
// Hex Encoding and Primitive Lookup
// ============================================================================

#[test]
fn test_hex_output_shape() {
    let tree = compute_tree_hash_from_data(&patterned(CHUNK_SIZE + 5, 0));
    let hex = tree.root_hex();

    assert_eq!(hex.len(), 64);
    assert!(hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    assert_eq!(from_hex(&hex).unwrap(), tree.root);

    assert_eq!(to_hex(&[0x00; 32]), "00".repeat(32));
    assert_eq!(to_hex(&[0xff; 32]), "ff".repeat(32));
    assert_eq!(hex::encode(tree.root), hex);
}

#[test]
fn test_unavailable_primitive_is_distinct_error() {
    let err = primitive_for("SHA-1").unwrap_err();
    assert!(matches!(err, TreeHashError::UnsupportedAlgorithm(_)));
    assert!(err.to_string().contains("SHA-1"));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = compute_tree_hash(dir.path().join("nope.bin"));
    assert!(matches!(result, Err(TreeHashError::Io(_))));
}
