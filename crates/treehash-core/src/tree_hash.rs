//! SHA-256 tree hashing.
//!
//! A file is divided into 1 MiB chunks and each chunk is hashed on its own.
//! The chunk hashes form the leaf level of a binary tree. Each following
//! level pairs adjacent nodes left to right and hashes their concatenation;
//! an unpaired last node is carried up unchanged. The single node left at
//! the top is the root.

use std::path::Path;

use crate::chunker::{ChunkDigester, LeafSequence};
use crate::encoding::to_hex;
use crate::error::Result;
use crate::hasher::{DigestPrimitive, Sha256Primitive};
use crate::{CHUNK_SIZE, Digest};

/// Computed tree hash
///
/// Contains the root digest (for whole-file comparison) and all leaf
/// digests (for verifying individual chunks).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeHash {
    /// Root digest
    pub root: Digest,
    /// Leaf digests, one per chunk
    pub leaves: LeafSequence,
}

impl TreeHash {
    /// Create a new tree hash
    #[must_use]
    pub fn new(root: Digest, leaves: LeafSequence) -> Self {
        Self { root, leaves }
    }

    /// Root digest as 64 lowercase hex characters
    #[must_use]
    pub fn root_hex(&self) -> String {
        to_hex(&self.root)
    }

    /// Get number of chunks
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.leaves.count()
    }

    /// Verify a chunk against its stored leaf digest
    #[must_use]
    pub fn verify_chunk(&self, chunk_index: usize, chunk_data: &[u8]) -> bool {
        match self.leaves.get(chunk_index) {
            Some(expected) => Sha256Primitive.digest(chunk_data) == *expected,
            None => false,
        }
    }

    /// Get chunk hash
    #[must_use]
    pub fn get_chunk_hash(&self, chunk_index: usize) -> Option<&Digest> {
        self.leaves.get(chunk_index)
    }
}

/// Folds a leaf sequence into its root digest.
#[derive(Debug, Clone, Default)]
pub struct TreeReducer<P = Sha256Primitive> {
    primitive: P,
}

impl TreeReducer<Sha256Primitive> {
    /// Create a SHA-256 reducer
    #[must_use]
    pub fn new() -> Self {
        Self {
            primitive: Sha256Primitive,
        }
    }
}

impl<P: DigestPrimitive> TreeReducer<P> {
    /// Create a reducer over a specific primitive
    pub fn with_primitive(primitive: P) -> Self {
        Self { primitive }
    }

    /// Build the next level from `prev`.
    ///
    /// The result has `ceil(prev.len() / 2)` entries. Pairs are taken by
    /// adjacent index from the start; an odd last entry is copied as is.
    pub fn reduce_level(&self, prev: &[Digest]) -> Vec<Digest> {
        let mut next = Vec::with_capacity(prev.len().div_ceil(2));

        for pair in prev.chunks(2) {
            let node = match pair {
                [left, right] => self.primitive.digest_pair(left, right),
                [carried] => *carried,
                _ => unreachable!("chunks(2) yields one or two elements"),
            };
            next.push(node);
        }

        next
    }

    /// Reduce `leaves` to the root digest.
    ///
    /// A single leaf is returned unchanged.
    pub fn reduce(&self, leaves: &LeafSequence) -> Digest {
        let mut level = leaves.as_slice().to_vec();
        let mut depth = 0usize;

        while level.len() > 1 {
            level = self.reduce_level(&level);
            depth += 1;
        }

        tracing::debug!(leaves = leaves.count(), depth, "tree reduced");
        level[0]
    }

    /// Every level from the leaves (index 0) up to the root (last).
    pub fn levels(&self, leaves: &LeafSequence) -> Vec<Vec<Digest>> {
        let mut levels = vec![leaves.as_slice().to_vec()];

        while let Some(prev) = levels.last().filter(|level| level.len() > 1) {
            let next = self.reduce_level(prev);
            levels.push(next);
        }

        levels
    }
}

/// Build the next tree level with SHA-256
///
/// # Example
///
/// ```
/// use treehash_core::tree_hash::reduce_level;
///
/// let level = reduce_level(&[[1u8; 32], [2u8; 32], [3u8; 32]]);
/// assert_eq!(level.len(), 2);
/// assert_eq!(level[1], [3u8; 32]);
/// ```
#[must_use]
pub fn reduce_level(prev: &[Digest]) -> Vec<Digest> {
    TreeReducer::new().reduce_level(prev)
}

/// Compute the SHA-256 tree root from leaf digests
///
/// # Errors
///
/// Returns [`TreeHashError::EmptyLeafSequence`] if `leaves` is empty.
///
/// # Example
///
/// ```
/// use treehash_core::tree_hash::compute_tree_root;
///
/// let leaf = [9u8; 32];
/// assert_eq!(compute_tree_root(&[leaf])?, leaf);
/// assert!(compute_tree_root(&[]).is_err());
/// # Ok::<(), treehash_core::TreeHashError>(())
/// ```
pub fn compute_tree_root(leaves: &[Digest]) -> Result<Digest> {
    let leaves = LeafSequence::new(leaves.to_vec())?;
    Ok(TreeReducer::new().reduce(&leaves))
}

/// Compute the tree hash of a file
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
///
/// # Example
///
/// ```no_run
/// use treehash_core::tree_hash::compute_tree_hash;
///
/// let tree = compute_tree_hash("/path/to/archive.tar")?;
/// println!("{} *archive.tar", tree.root_hex());
/// # Ok::<(), treehash_core::TreeHashError>(())
/// ```
pub fn compute_tree_hash<P: AsRef<Path>>(path: P) -> Result<TreeHash> {
    let leaves = ChunkDigester::new().digest_file(path)?;
    let root = TreeReducer::new().reduce(&leaves);
    Ok(TreeHash::new(root, leaves))
}

/// Compute the tree hash of in-memory data
///
/// # Example
///
/// ```
/// use treehash_core::tree_hash::compute_tree_hash_from_data;
///
/// let tree = compute_tree_hash_from_data(&vec![0xAA; 3 * 1024 * 1024]);
/// assert_eq!(tree.chunk_count(), 3);
/// ```
#[must_use]
pub fn compute_tree_hash_from_data(data: &[u8]) -> TreeHash {
    let mut hasher = IncrementalTreeHasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Verify chunk data against tree
#[must_use]
pub fn verify_chunk(chunk_index: usize, chunk_data: &[u8], tree: &TreeHash) -> bool {
    tree.verify_chunk(chunk_index, chunk_data)
}

/// Incremental tree hasher for streaming data
///
/// Produces the same leaves and root as [`compute_tree_hash`] for the same
/// bytes, however the input is split across `update` calls.
///
/// # Example
///
/// ```
/// use treehash_core::tree_hash::IncrementalTreeHasher;
///
/// let mut hasher = IncrementalTreeHasher::new();
/// hasher.update(&[0xAA; 1024]);
/// hasher.update(&[0xBB; 1024]);
///
/// let tree = hasher.finalize();
/// assert_eq!(tree.chunk_count(), 1);
/// ```
pub struct IncrementalTreeHasher<P = Sha256Primitive> {
    primitive: P,
    leaves: Vec<Digest>,
    buffer: Vec<u8>,
}

impl IncrementalTreeHasher<Sha256Primitive> {
    /// Create a new SHA-256 incremental hasher
    #[must_use]
    pub fn new() -> Self {
        Self::with_primitive(Sha256Primitive)
    }
}

impl Default for IncrementalTreeHasher<Sha256Primitive> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: DigestPrimitive> IncrementalTreeHasher<P> {
    /// Create an incremental hasher over a specific primitive
    pub fn with_primitive(primitive: P) -> Self {
        Self {
            primitive,
            leaves: Vec::new(),
            buffer: Vec::with_capacity(CHUNK_SIZE),
        }
    }

    /// Update with new data
    ///
    /// Complete chunks are hashed as soon as they are available; the
    /// remainder is buffered.
    pub fn update(&mut self, mut data: &[u8]) {
        if !self.buffer.is_empty() {
            let take = (CHUNK_SIZE - self.buffer.len()).min(data.len());
            self.buffer.extend_from_slice(&data[..take]);
            data = &data[take..];

            if self.buffer.len() < CHUNK_SIZE {
                return;
            }
            let leaf = self.primitive.digest(&self.buffer);
            self.leaves.push(leaf);
            self.buffer.clear();
        }

        // Hash whole chunks straight from the input
        let mut chunks = data.chunks_exact(CHUNK_SIZE);
        for chunk in &mut chunks {
            let leaf = self.primitive.digest(chunk);
            self.leaves.push(leaf);
        }
        self.buffer.extend_from_slice(chunks.remainder());
    }

    /// Get number of complete chunks processed
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.leaves.len()
    }

    /// Get buffered byte count (not yet hashed)
    #[must_use]
    pub fn buffered_bytes(&self) -> usize {
        self.buffer.len()
    }

    /// Finalize and get tree hash
    ///
    /// Hashes any buffered data. With no input at all the single leaf is
    /// the digest of zero bytes.
    #[must_use]
    pub fn finalize(mut self) -> TreeHash {
        if !self.buffer.is_empty() || self.leaves.is_empty() {
            let leaf = self.primitive.digest(&self.buffer);
            self.leaves.push(leaf);
        }

        let leaves = LeafSequence::from_nonempty(self.leaves);
        let root = TreeReducer::with_primitive(self.primitive).reduce(&leaves);
        TreeHash::new(root, leaves)
    }
}
