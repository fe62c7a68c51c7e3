//! # treehash-core
//!
//! SHA-256 tree hashing for archival-storage integrity checks.
//!
//! This crate provides:
//! - Fixed 1 MiB chunking with per-chunk SHA-256 leaf digests
//! - Pairwise Merkle reduction with odd-node carry
//! - Lowercase hex encoding of the root digest
//! - An incremental hasher for data that arrives in pieces
//!
//! ```
//! use treehash_core::{to_hex, tree_hash::compute_tree_hash_from_data};
//!
//! let tree = compute_tree_hash_from_data(b"abc");
//! assert_eq!(
//!     to_hex(&tree.root),
//!     "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
//! );
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chunker;
pub mod encoding;
pub mod error;
pub mod hasher;
pub mod tree_hash;

pub use chunker::{ChunkDigester, LeafSequence, leaf_count};
pub use encoding::{from_hex, to_hex};
pub use error::{Result, TreeHashError};
pub use hasher::{DigestPrimitive, Sha256Primitive, primitive_for};
pub use tree_hash::{IncrementalTreeHasher, TreeHash, TreeReducer};

/// Chunk size in bytes (1 MiB).
///
/// Fixed by the verification scheme; changing it changes every root digest.
pub const CHUNK_SIZE: usize = 1024 * 1024;

/// Size of a digest in bytes.
pub const DIGEST_SIZE: usize = 32;

/// SHA-256 digest output.
pub type Digest = [u8; DIGEST_SIZE];
