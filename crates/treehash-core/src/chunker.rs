//! Fixed-size chunking and per-chunk leaf digests.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::error::{Result, TreeHashError};
use crate::hasher::{DigestPrimitive, Sha256Primitive};
use crate::{CHUNK_SIZE, Digest};

/// Number of leaves produced for an input of `total_len` bytes.
///
/// An empty input still has one leaf, the digest of zero bytes.
#[must_use]
pub fn leaf_count(total_len: u64) -> u64 {
    total_len.div_ceil(CHUNK_SIZE as u64).max(1)
}

/// Ordered chunk digests, one per chunk. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafSequence(Vec<Digest>);

impl LeafSequence {
    /// Build a leaf sequence from chunk digests.
    ///
    /// # Errors
    ///
    /// Returns [`TreeHashError::EmptyLeafSequence`] if `leaves` is empty.
    pub fn new(leaves: Vec<Digest>) -> Result<Self> {
        if leaves.is_empty() {
            return Err(TreeHashError::EmptyLeafSequence);
        }
        Ok(Self(leaves))
    }

    /// A sequence holding exactly one leaf.
    #[must_use]
    pub fn single(leaf: Digest) -> Self {
        Self(vec![leaf])
    }

    pub(crate) fn from_nonempty(leaves: Vec<Digest>) -> Self {
        debug_assert!(!leaves.is_empty());
        Self(leaves)
    }

    /// Number of leaves (always at least one).
    #[must_use]
    pub fn count(&self) -> usize {
        self.0.len()
    }

    /// Leaf digests in chunk order.
    #[must_use]
    pub fn as_slice(&self) -> &[Digest] {
        &self.0
    }

    /// Get a leaf by chunk index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Digest> {
        self.0.get(index)
    }

    /// Consume into the underlying digests.
    #[must_use]
    pub fn into_vec(self) -> Vec<Digest> {
        self.0
    }
}

impl TryFrom<Vec<Digest>> for LeafSequence {
    type Error = TreeHashError;

    fn try_from(leaves: Vec<Digest>) -> Result<Self> {
        Self::new(leaves)
    }
}

impl AsRef<[Digest]> for LeafSequence {
    fn as_ref(&self) -> &[Digest] {
        &self.0
    }
}

/// Reads a byte source in 1 MiB chunks and digests each one.
///
/// The scratch buffer is allocated once and reused for every chunk and
/// every call.
pub struct ChunkDigester<P = Sha256Primitive> {
    primitive: P,
    buffer: Vec<u8>,
}

impl ChunkDigester<Sha256Primitive> {
    /// Create a SHA-256 chunk digester
    #[must_use]
    pub fn new() -> Self {
        Self::with_primitive(Sha256Primitive)
    }
}

impl Default for ChunkDigester<Sha256Primitive> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: DigestPrimitive> ChunkDigester<P> {
    /// Create a chunk digester over a specific primitive
    pub fn with_primitive(primitive: P) -> Self {
        Self {
            primitive,
            buffer: vec![0u8; CHUNK_SIZE],
        }
    }

    /// Primitive used for leaf digests
    pub fn primitive(&self) -> &P {
        &self.primitive
    }

    /// Digest every chunk of the file at `path`.
    ///
    /// The file is closed before returning, on success and on error.
    ///
    /// # Errors
    ///
    /// Returns [`TreeHashError::Io`] if the file cannot be opened or read.
    /// No partial leaf sequence is returned.
    pub fn digest_file<Q: AsRef<Path>>(&mut self, path: Q) -> Result<LeafSequence> {
        self.digest_file_with_progress(path, |_| {})
    }

    /// Like [`digest_file`](Self::digest_file), reporting bytes consumed
    /// after each chunk.
    ///
    /// # Errors
    ///
    /// Returns [`TreeHashError::Io`] if the file cannot be opened or read.
    pub fn digest_file_with_progress<Q, F>(&mut self, path: Q, on_progress: F) -> Result<LeafSequence>
    where
        Q: AsRef<Path>,
        F: FnMut(u64),
    {
        let path = path.as_ref();
        let file = File::open(path)?;
        let expected = leaf_count(file.metadata()?.len());

        let leaves = self.digest_reader_with_progress(file, on_progress)?;
        if leaves.count() as u64 != expected {
            tracing::warn!(
                path = %path.display(),
                expected,
                actual = leaves.count(),
                "file length changed while hashing"
            );
        }
        Ok(leaves)
    }

    /// Digest every chunk of `reader` until it is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`TreeHashError::Io`] on any read error.
    pub fn digest_reader<R: Read>(&mut self, reader: R) -> Result<LeafSequence> {
        self.digest_reader_with_progress(reader, |_| {})
    }

    /// Like [`digest_reader`](Self::digest_reader), reporting bytes consumed
    /// after each chunk.
    ///
    /// # Errors
    ///
    /// Returns [`TreeHashError::Io`] on any read error.
    pub fn digest_reader_with_progress<R, F>(
        &mut self,
        mut reader: R,
        mut on_progress: F,
    ) -> Result<LeafSequence>
    where
        R: Read,
        F: FnMut(u64),
    {
        let mut leaves = Vec::new();
        let mut consumed = 0u64;

        loop {
            let bytes_read = fill_chunk(&mut reader, &mut self.buffer)?;
            if bytes_read == 0 {
                break;
            }

            let leaf = self.primitive.digest(&self.buffer[..bytes_read]);
            tracing::trace!(index = leaves.len(), len = bytes_read, "chunk digested");
            leaves.push(leaf);

            consumed += bytes_read as u64;
            on_progress(consumed);

            if bytes_read < self.buffer.len() {
                break;
            }
        }

        if leaves.is_empty() {
            leaves.push(self.primitive.digest(&[]));
        }

        tracing::debug!(bytes = consumed, leaves = leaves.len(), "leaf sequence complete");
        Ok(LeafSequence::from_nonempty(leaves))
    }
}

/// Read until `buf` is full or the source is exhausted.
fn fill_chunk<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
